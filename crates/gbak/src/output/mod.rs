//! Output formatting utilities for the gbak CLI.
//!
//! - [`files`] - File list output (list, upload, download)
//! - [`folders`] - Backup folder report output
//! - [`helpers`] - Common formatting utilities (truncation, MIME types, dates)

mod files;
mod folders;
pub mod helpers;

pub use files::{
    format_download_result, format_files_json, format_files_table, format_query_json,
    format_uploaded_file,
};
pub use folders::{format_folders_json, format_folders_table};
