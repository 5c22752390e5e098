//! Logging setup.
//!
//! Log level comes from `GBAK_LOG`, then `RUST_LOG`, then the CLI flags
//! (`warn` by default, `debug` with `--verbose`). Logs go to stderr unless
//! the config names a `log_file`.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "GBAK_LOG";

/// Returns the log filter directive.
pub fn filter_directive(verbose: bool, quiet: bool) -> String {
    if let Ok(filter) = std::env::var(LOG_ENV).or_else(|_| std::env::var("RUST_LOG")) {
        return filter;
    }
    default_directive(verbose, quiet).to_string()
}

fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if `log_file` cannot be opened for appending.
pub fn init_logging(verbose: bool, quiet: bool, log_file: Option<&Path>) -> io::Result<()> {
    let filter = filter_directive(verbose, quiet);

    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .compact()
        .with_env_filter(filter);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => builder.with_writer(io::stderr).init(),
    }

    Ok(())
}
