//! File output formatting.

use std::path::Path;

use gdrive_api::query::{CompiledQuery, Record, RecordSet};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::{format_mime, format_modified, truncate_str};

/// JSON output structure for the list command.
#[derive(Serialize)]
pub struct FilesListOutput<'a> {
    pub query: &'a str,
    pub count: usize,
    pub files: &'a RecordSet,
}

/// Formats a file list as JSON, including the query that produced it.
pub fn format_files_json(
    query: &CompiledQuery,
    files: &RecordSet,
) -> Result<String, serde_json::Error> {
    let output = FilesListOutput {
        query: query.as_str(),
        count: files.len(),
        files,
    };
    serde_json::to_string_pretty(&output)
}

/// Formats a compiled query as JSON (for `--dry-run`).
pub fn format_query_json(query: &CompiledQuery) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({ "query": query.as_str() }))
}

/// Formats files as a table.
///
/// Records are displayed by whichever of `title`, `mimeType` and
/// `modifiedDate` they carry; absent keys leave the column blank.
pub fn format_files_table(files: &RecordSet, use_colors: bool) -> String {
    if files.is_empty() {
        return "No files found.\n".to_string();
    }

    let mut output = String::new();

    let header = format!(
        "{:<34} {:<40} {:<20} {}",
        "ID", "Title", "Type", "Modified"
    );
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for file in files {
        output.push_str(&format_file_row(file, use_colors));
        output.push('\n');
    }

    output
}

fn format_file_row(file: &Record, use_colors: bool) -> String {
    let id = file.id().unwrap_or("");
    let title = truncate_str(file.get_str("title").unwrap_or(""), 40);
    let mime = file.get_str("mimeType").map(format_mime).unwrap_or_default();
    let modified = file
        .get_str("modifiedDate")
        .map(format_modified)
        .unwrap_or_default();

    let title = if use_colors && mime == "folder" {
        format!("{:<40}", title).blue().bold().to_string()
    } else {
        format!("{:<40}", title)
    };

    format!("{:<34} {} {:<20} {}", id, title, truncate_str(&mime, 20), modified)
        .trim_end()
        .to_string()
}

/// Formats the result of an upload.
pub fn format_uploaded_file(file: &Record, use_colors: bool) -> String {
    let title = file.get_str("title").unwrap_or("(untitled)");
    let id = file.id().unwrap_or("?");
    if use_colors {
        format!("{} {} ({})", "Uploaded".green(), title, id.dimmed())
    } else {
        format!("Uploaded {} ({})", title, id)
    }
}

/// Formats the result of a download.
pub fn format_download_result(dest: &Path, bytes: u64, use_colors: bool) -> String {
    if use_colors {
        format!("{} {} ({} bytes)", "Downloaded".green(), dest.display(), bytes)
    } else {
        format!("Downloaded {} ({} bytes)", dest.display(), bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdrive_api::query::adapt_values;
    use serde_json::json;

    fn files() -> RecordSet {
        adapt_values(vec![
            json!({"id": "F1", "title": "Grad School", "mimeType": "application/vnd.google-apps.folder"}),
            json!({"id": "F2", "title": "notes.txt", "mimeType": "text/plain"}),
            json!({"id": "F3"}),
        ])
    }

    #[test]
    fn test_files_table_rows() {
        let table = format_files_table(&files(), false);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("Grad School") && lines[1].contains("folder"));
        assert!(lines[2].contains("notes.txt") && lines[2].contains("text/plain"));
        assert_eq!(lines[3], "F3");
    }

    #[test]
    fn test_files_table_empty() {
        assert_eq!(
            format_files_table(&RecordSet::default(), false),
            "No files found.\n"
        );
    }

    #[test]
    fn test_download_result_plain() {
        assert_eq!(
            format_download_result(Path::new("out.bin"), 42, false),
            "Downloaded out.bin (42 bytes)"
        );
    }
}
