//! List command implementation.
//!
//! Compiles `-f key=value` filters into a Drive query and lists the matching
//! files.

use gdrive_api::query::{
    compile, compile_folders, CompiledQuery, FieldRegistry, FilterValidator, RawFilterInput,
};

use super::config::{load_config, Config};
use super::credentials;
use super::{CommandContext, Result};
use crate::output::{format_files_json, format_files_table, format_query_json};

/// Options for the list command.
#[derive(Debug, Default)]
pub struct ListOptions {
    /// Filters as `(key, value)` pairs, in command-line order.
    pub filters: Vec<(String, String)>,
    /// Restrict to folders.
    pub folders: bool,
    /// Reject unknown fields.
    pub strict: bool,
    /// Print the query only.
    pub dry_run: bool,
    /// Maximum number of files.
    pub limit: Option<usize>,
}

/// Executes the list command.
pub async fn execute(ctx: &CommandContext, opts: &ListOptions) -> Result<()> {
    let config = load_config()?;
    let query = build_query(&config, opts)?;

    if opts.dry_run {
        if ctx.json_output {
            println!("{}", format_query_json(&query)?);
        } else {
            println!("{}", query);
        }
        return Ok(());
    }

    let client = credentials::client(&config, opts.strict).await?;
    let files = client.list_files_up_to(&query, opts.limit).await?;

    if ctx.json_output {
        println!("{}", format_files_json(&query, &files)?);
    } else if !ctx.quiet {
        print!("{}", format_files_table(&files, ctx.use_colors));
    }

    Ok(())
}

/// Validates and compiles the filters in `opts`.
fn build_query(config: &Config, opts: &ListOptions) -> Result<CompiledQuery> {
    let validator =
        FilterValidator::new(FieldRegistry::drive()).with_mode(config.parse_mode(opts.strict));
    let input: RawFilterInput = opts
        .filters
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();

    let query = if opts.folders {
        compile_folders(&validator, &input)?
    } else {
        compile(&validator, &input)?
    };
    tracing::debug!(query = %query, "compiled filters");
    Ok(query)
}
