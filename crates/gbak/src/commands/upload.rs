//! Upload command implementation.

use std::path::PathBuf;

use super::config::load_config;
use super::credentials;
use super::{CommandContext, CommandError, Result};
use crate::output::format_uploaded_file;

/// Options for the upload command.
#[derive(Debug)]
pub struct UploadOptions {
    /// Local file to upload.
    pub file: PathBuf,
    /// Parent folder ID.
    pub parent: Option<String>,
    /// Title on Drive.
    pub title: Option<String>,
}

/// Executes the upload command.
pub async fn execute(ctx: &CommandContext, opts: &UploadOptions) -> Result<()> {
    if !opts.file.is_file() {
        return Err(CommandError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("not a file: {}", opts.file.display()),
        )));
    }

    let config = load_config()?;
    let client = credentials::client(&config, false).await?;
    let record = client
        .upload_file(&opts.file, opts.title.as_deref(), opts.parent.as_deref())
        .await?;
    tracing::debug!(id = ?record.id(), "upload complete");

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else if !ctx.quiet {
        println!("{}", format_uploaded_file(&record, ctx.use_colors));
    }

    Ok(())
}
