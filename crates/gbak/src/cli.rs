//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the gbak CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// gbak - Personal Google Drive backup tool
#[derive(Parser, Debug)]
#[command(name = "gbak")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authorize gbak with your Google account
    Auth,

    /// List files matching filters
    #[command(alias = "ls")]
    List {
        /// Filter as key=value, e.g. title_contains=report (repeatable)
        #[arg(short, long = "filter", value_parser = parse_filter, action = clap::ArgAction::Append)]
        filters: Vec<(String, String)>,

        /// Search folders only
        #[arg(long)]
        folders: bool,

        /// Reject unknown filter fields instead of skipping them
        #[arg(long)]
        strict: bool,

        /// Print the compiled query without calling Drive
        #[arg(long)]
        dry_run: bool,

        /// Maximum number of files to list
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List the contents of each configured backup folder
    Folders,

    /// Upload a file
    Upload {
        /// Local file to upload
        file: PathBuf,

        /// Parent folder ID
        #[arg(short, long)]
        parent: Option<String>,

        /// Title on Drive (default: file name)
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Download a file's content
    Download {
        /// Drive file ID
        file_id: String,

        /// Output path (default: the file's title)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// View or create the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Print config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Parses a `key=value` filter argument.
///
/// Only the first `=` splits, so values may contain `=`.
fn parse_filter(arg: &str) -> Result<(String, String), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{arg}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing filter key in '{arg}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
