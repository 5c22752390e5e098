//! File storage for OAuth credentials.

use std::path::{Path, PathBuf};

use gdrive_api::auth::Credentials;

use crate::store::{self, Result};

/// Default credentials filename.
const CREDENTIALS_FILENAME: &str = "credentials.json";

/// Stores [`Credentials`] as JSON.
///
/// On Unix the file is created with mode `0600`.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Creates a store at the default XDG data path.
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: store::data_path(CREDENTIALS_FILENAME)?,
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

    /// Loads stored credentials, or `None` if none were saved.
    pub fn load(&self) -> Result<Option<Credentials>> {
        store::read_json(&self.path)
    }

    /// Saves credentials, replacing any previous ones.
    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        store::write_json(&self.path, credentials)?;
        restrict_permissions(&self.path)
    }

    /// Deletes stored credentials.
    pub fn delete(&self) -> Result<()> {
        store::delete_file(&self.path)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).map_err(|e| {
        store::StoreError::WriteError {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
