//! Folders command implementation.
//!
//! Walks the configured backup folders: resolves each folder's Drive ID
//! (cached in the path store) and lists its children. A folder that cannot be
//! found or listed is reported and skipped; the walk continues.

use std::path::PathBuf;

use gdrive_api::client::GDriveClient;
use gdrive_api::error::{ApiError, Error};
use gdrive_api::query::{QueryError, RecordSet};
use gdrive_cache::{PathStore, PathTable};
use serde::Serialize;

use super::config::load_config;
use super::credentials;
use super::{CommandContext, Result};
use crate::output::{format_folders_json, format_folders_table};

/// Outcome for one backup folder.
#[derive(Debug, Serialize)]
pub struct FolderReport {
    /// Folder title on Drive.
    pub gdrive_path: String,
    /// Local directory, if configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
    /// Resolved Drive folder ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    /// Child references of the folder.
    pub children: RecordSet,
    /// Why the folder was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Executes the folders command.
pub async fn execute(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let store = PathStore::new()?;
    let mut table = store.load_or_default()?;
    let added = table.merge_paths(config.folder_paths());
    if added > 0 {
        tracing::debug!(added, "merged configured paths into path store");
    }

    let client = credentials::client(&config, false).await?;
    let result = walk_folders(&client, &mut table).await;

    // IDs resolved before an abort are still worth keeping.
    store.save(&table)?;
    let reports = result?;

    if ctx.json_output {
        println!("{}", format_folders_json(&reports)?);
    } else if !ctx.quiet {
        print!("{}", format_folders_table(&reports, ctx.use_colors));
    }

    Ok(())
}

/// Resolves and lists every folder in `table`, caching new folder IDs.
///
/// Not-found folders and HTTP failures are logged as warnings and recorded
/// in the folder's report. Authentication failures abort the walk.
pub async fn walk_folders(
    client: &GDriveClient,
    table: &mut PathTable,
) -> std::result::Result<Vec<FolderReport>, Error> {
    let mut reports = Vec::with_capacity(table.entries.len());

    for entry in table.entries.clone() {
        let mut report = FolderReport {
            gdrive_path: entry.gdrive_path.clone(),
            local_path: entry.local_path.clone(),
            folder_id: entry.folder_id.clone(),
            children: RecordSet::default(),
            error: None,
        };

        let folder_id = match entry.folder_id {
            Some(id) => id,
            None => match client.folder_id(&entry.gdrive_path).await {
                Ok(id) => {
                    table.set_folder_id(&entry.gdrive_path, id.clone());
                    report.folder_id = Some(id.clone());
                    id
                }
                Err(e) if is_fatal(&e) => return Err(e),
                Err(e) => {
                    skip(&mut report, &e);
                    reports.push(report);
                    continue;
                }
            },
        };

        match client.list_children(&folder_id).await {
            Ok(children) => report.children = children,
            Err(e) if is_fatal(&e) => return Err(e),
            Err(e) => skip(&mut report, &e),
        }
        reports.push(report);
    }

    Ok(reports)
}

fn is_fatal(error: &Error) -> bool {
    matches!(error, Error::Api(ApiError::Auth { .. }))
}

fn skip(report: &mut FolderReport, error: &Error) {
    match error {
        Error::Query(QueryError::EmptyResult) => {
            tracing::warn!(gdrive_path = %report.gdrive_path, "folder not found on Drive");
            report.error = Some("folder not found".to_string());
        }
        _ => {
            tracing::warn!(gdrive_path = %report.gdrive_path, error = %error, "failed to read folder");
            report.error = Some(error.to_string());
        }
    }
}
