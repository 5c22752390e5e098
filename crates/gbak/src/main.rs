use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod logging;
mod output;

use cli::{Cli, Commands, ConfigCommands};
use commands::config::load_config;
use commands::download::DownloadOptions;
use commands::list::ListOptions;
use commands::upload::UploadOptions;
use commands::{CommandContext, CommandError};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config errors surface when the command loads it; logging falls back to stderr.
    let log_file = load_config().ok().and_then(|config| config.log_file);
    if let Err(e) = logging::init_logging(cli.verbose, cli.quiet, log_file.as_deref()) {
        eprintln!("Warning: could not open log file: {e}");
        let _ = logging::init_logging(cli.verbose, cli.quiet, None);
    }

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": e.code(),
                        "message": e.to_string(),
                    }
                });
                eprintln!("{error_json:#}");
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> commands::Result<()> {
    let ctx = CommandContext::from_cli(cli);

    match &cli.command {
        Commands::Auth => commands::auth::execute(&ctx).await,
        Commands::List {
            filters,
            folders,
            strict,
            dry_run,
            limit,
        } => {
            let opts = ListOptions {
                filters: filters.clone(),
                folders: *folders,
                strict: *strict,
                dry_run: *dry_run,
                limit: *limit,
            };
            commands::list::execute(&ctx, &opts).await
        }
        Commands::Folders => commands::folders::execute(&ctx).await,
        Commands::Upload {
            file,
            parent,
            title,
        } => {
            let opts = UploadOptions {
                file: file.clone(),
                parent: parent.clone(),
                title: title.clone(),
            };
            commands::upload::execute(&ctx, &opts).await
        }
        Commands::Download { file_id, output } => {
            let opts = DownloadOptions {
                file_id: file_id.clone(),
                output: output.clone(),
            };
            commands::download::execute(&ctx, &opts).await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::execute_show(&ctx),
            ConfigCommands::Path => commands::config::execute_path(&ctx),
            ConfigCommands::Init { force } => commands::config::execute_init(&ctx, *force),
        },
        Commands::Completions { shell } => {
            commands::completions::execute(shell).map_err(CommandError::Io)
        }
    }
}
