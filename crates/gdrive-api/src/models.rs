//! Wire types for Drive v2 responses and request bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of a `files.list` or `children.list` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage {
    /// The records on this page, as raw JSON objects.
    #[serde(default)]
    pub items: Vec<Value>,

    /// Token for the next page, absent on the last page.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// A reference to a parent folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentReference {
    /// The parent folder's ID.
    pub id: String,
}

/// Metadata patch applied after a media upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileMetadata {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Parent folders; replaces the default (root).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<ParentReference>,
}

impl FileMetadata {
    /// Returns true if there is nothing to patch.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.parents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_page_defaults() {
        let page: ListPage = serde_json::from_str(r#"{"kind":"drive#fileList"}"#).unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_list_page_with_token() {
        let page: ListPage = serde_json::from_str(
            r#"{"items":[{"id":"a"}],"nextPageToken":"tok"}"#,
        )
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.next_page_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_file_metadata_serialization_skips_empty() {
        let metadata = FileMetadata {
            title: Some("notes.txt".to_string()),
            parents: vec![],
        };
        assert_eq!(
            serde_json::to_string(&metadata).unwrap(),
            r#"{"title":"notes.txt"}"#
        );
        assert!(FileMetadata::default().is_empty());
    }
}
