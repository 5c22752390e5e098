//! Backup folder report formatting.

use owo_colors::OwoColorize;

use crate::commands::folders::FolderReport;

/// Formats folder reports as JSON.
pub fn format_folders_json(reports: &[FolderReport]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({ "folders": reports }))
}

/// Formats folder reports as a listing of each folder's children.
pub fn format_folders_table(reports: &[FolderReport], use_colors: bool) -> String {
    if reports.is_empty() {
        return "No backup folders configured. Add [[paths]] entries to the config file.\n"
            .to_string();
    }

    let mut output = String::new();
    for report in reports {
        let heading = match &report.folder_id {
            Some(id) => format!("{} ({})", report.gdrive_path, id),
            None => report.gdrive_path.clone(),
        };
        if use_colors {
            output.push_str(&format!("{}\n", heading.bold()));
        } else {
            output.push_str(&heading);
            output.push('\n');
        }

        if let Some(error) = &report.error {
            let line = format!("  skipped: {}", error);
            if use_colors {
                output.push_str(&format!("{}\n", line.yellow()));
            } else {
                output.push_str(&line);
                output.push('\n');
            }
            continue;
        }

        if report.children.is_empty() {
            output.push_str("  (empty)\n");
        }
        for child in &report.children {
            output.push_str(&format!(
                "  {}\n",
                child.get_str("title").or(child.id()).unwrap_or("?")
            ));
        }
    }
    output
}
