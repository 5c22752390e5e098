//! Command implementations for the gbak CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod auth;
pub mod completions;
pub mod config;
pub mod credentials;
pub mod download;
pub mod folders;
pub mod keyring;
pub mod list;
pub mod upload;

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Local store error.
    #[error("store error: {0}")]
    Store(#[from] gdrive_cache::StoreError),

    /// Filter compilation error.
    #[error("filter error: {0}")]
    Query(#[from] gdrive_api::query::QueryError),

    /// API error.
    #[error("API error: {0}")]
    Api(#[from] gdrive_api::error::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandError {
    /// Returns the error code string for JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::Store(_) => "STORE_ERROR",
            CommandError::Query(_) => "FILTER_ERROR",
            CommandError::Api(gdrive_api::error::Error::Query(_)) => "FILTER_ERROR",
            CommandError::Api(_) => "API_ERROR",
            CommandError::Config(_) => "CONFIG_ERROR",
            CommandError::Io(_) => "IO_ERROR",
            CommandError::Json(_) => "JSON_ERROR",
        }
    }

    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CommandError::Config(_) => 5,
            CommandError::Store(_) => 5,
            CommandError::Query(_) => 1,
            CommandError::Api(e) => u8::try_from(e.exit_code()).unwrap_or(2),
            CommandError::Io(_) => 3,
            CommandError::Json(_) => 1,
        }
    }
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && std::env::var_os("NO_COLOR").is_none(),
            quiet: cli.quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdrive_api::error::{ApiError, Error};
    use gdrive_api::query::QueryError;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CommandError::Query(QueryError::EmptyResult).exit_code(), 1);
        assert_eq!(
            CommandError::Api(Error::Query(QueryError::EmptyResult)).exit_code(),
            1
        );
        assert_eq!(
            CommandError::Api(Error::Api(ApiError::Auth {
                message: "expired".to_string()
            }))
            .exit_code(),
            2
        );
        assert_eq!(
            CommandError::Io(std::io::Error::other("disk full")).exit_code(),
            3
        );
        assert_eq!(CommandError::Config("bad".to_string()).exit_code(), 5);
        assert_eq!(
            CommandError::Store(gdrive_cache::StoreError::NoDataDir).exit_code(),
            5
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CommandError::Api(Error::Query(QueryError::EmptyResult)).code(),
            "FILTER_ERROR"
        );
        assert_eq!(CommandError::Config("x".to_string()).code(), "CONFIG_ERROR");
    }
}
