//! Common helper functions for output formatting.

use chrono::{DateTime, Local};
use gdrive_api::query::FOLDER_MIME_TYPE;

/// Prefix of Google-native document MIME types.
const GOOGLE_APPS_PREFIX: &str = "application/vnd.google-apps.";

/// Truncates a string to at most `max_len` characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Shortens a MIME type for display.
///
/// Google-native types lose their vendor prefix, so the folder type is shown
/// as `folder`.
pub fn format_mime(mime: &str) -> String {
    if mime == FOLDER_MIME_TYPE {
        return "folder".to_string();
    }
    mime.strip_prefix(GOOGLE_APPS_PREFIX)
        .map(|kind| format!("google-{kind}"))
        .unwrap_or_else(|| mime.to_string())
}

/// Formats an RFC 3339 timestamp in local time, or returns it unchanged.
pub fn format_modified(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => timestamp.to_string(),
    }
}
