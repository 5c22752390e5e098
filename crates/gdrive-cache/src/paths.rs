//! Persistent table of backup folder paths.
//!
//! Each entry pairs a Drive folder title with a local directory. The Drive
//! folder ID is looked up once and cached here so later runs skip the search.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::store::{self, Result};

/// Default paths filename.
const PATHS_FILENAME: &str = "paths.json";

/// A configured backup folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderPath {
    /// Title of the folder on Drive.
    pub gdrive_path: String,

    /// Local directory mirrored to the folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,

    /// Resolved Drive folder ID, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}

impl FolderPath {
    /// Creates an entry with no local path and no resolved ID.
    pub fn new(gdrive_path: impl Into<String>) -> Self {
        Self {
            gdrive_path: gdrive_path.into(),
            local_path: None,
            folder_id: None,
        }
    }

    /// Sets the local directory.
    pub fn with_local_path(mut self, local_path: impl Into<PathBuf>) -> Self {
        self.local_path = Some(local_path.into());
        self
    }
}

/// The folder path table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathTable {
    /// Entries in insertion order.
    #[serde(default)]
    pub entries: Vec<FolderPath>,
}

impl PathTable {
    /// Looks up an entry by Drive path.
    pub fn get(&self, gdrive_path: &str) -> Option<&FolderPath> {
        self.entries.iter().find(|e| e.gdrive_path == gdrive_path)
    }

    /// Adds entries whose `gdrive_path` is not already present.
    ///
    /// Existing entries, including their cached folder IDs, are untouched.
    /// Returns the number of entries added.
    pub fn merge_paths<I>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = FolderPath>,
    {
        let mut added = 0;
        for path in paths {
            if self.get(&path.gdrive_path).is_none() {
                tracing::debug!(gdrive_path = %path.gdrive_path, "adding folder path");
                self.entries.push(path);
                added += 1;
            }
        }
        added
    }

    /// Records the resolved folder ID for `gdrive_path`.
    ///
    /// Returns false if there is no such entry.
    pub fn set_folder_id(&mut self, gdrive_path: &str, folder_id: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|e| e.gdrive_path == gdrive_path) {
            Some(entry) => {
                entry.folder_id = Some(folder_id.into());
                true
            }
            None => false,
        }
    }

    /// Entries that still need a folder ID lookup.
    pub fn unresolved(&self) -> impl Iterator<Item = &FolderPath> {
        self.entries.iter().filter(|e| e.folder_id.is_none())
    }
}

/// Reads and writes the [`PathTable`] on disk.
///
/// # Example
///
/// ```no_run
/// use gdrive_cache::{FolderPath, PathStore};
///
/// let store = PathStore::new()?;
/// let mut table = store.load_or_default()?;
/// table.merge_paths([FolderPath::new("Grad School")]);
/// store.save(&table)?;
/// # Ok::<(), gdrive_cache::StoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PathStore {
    path: PathBuf,
}

impl PathStore {
    /// Creates a store at the default XDG data path.
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: store::data_path(PATHS_FILENAME)?,
        })
    }

    /// Creates a store at a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the table, or an empty one if the file does not exist.
    pub fn load_or_default(&self) -> Result<PathTable> {
        Ok(store::read_json(&self.path)?.unwrap_or_default())
    }

    /// Saves the table.
    pub fn save(&self, table: &PathTable) -> Result<()> {
        store::write_json(&self.path, table)
    }
}
