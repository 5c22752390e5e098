//! Download command implementation.

use std::path::{Path, PathBuf};

use gdrive_api::query::Record;

use super::config::load_config;
use super::credentials;
use super::{CommandContext, Result};
use crate::output::format_download_result;

/// Options for the download command.
#[derive(Debug)]
pub struct DownloadOptions {
    /// Drive file ID.
    pub file_id: String,
    /// Output path.
    pub output: Option<PathBuf>,
}

/// Executes the download command.
pub async fn execute(ctx: &CommandContext, opts: &DownloadOptions) -> Result<()> {
    let config = load_config()?;
    let client = credentials::client(&config, false).await?;

    let dest = match &opts.output {
        Some(path) => path.clone(),
        None => {
            let metadata = client.get_file(&opts.file_id).await?;
            default_destination(&metadata, &opts.file_id)
        }
    };

    let bytes = client.download_file(&opts.file_id, &dest).await?;

    if ctx.json_output {
        let output = serde_json::json!({
            "id": opts.file_id,
            "path": dest.display().to_string(),
            "bytes": bytes,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("{}", format_download_result(&dest, bytes, ctx.use_colors));
    }

    Ok(())
}

/// Picks a local file name from the file's title.
///
/// Path separators in the title are replaced so the file lands in the
/// current directory. Falls back to the file ID.
fn default_destination(metadata: &Record, file_id: &str) -> PathBuf {
    let name = metadata
        .get_str("title")
        .map(|title| title.replace(['/', '\\'], "_"))
        .filter(|title| !title.is_empty() && title != "." && title != "..")
        .unwrap_or_else(|| file_id.to_string());
    Path::new(".").join(name)
}
