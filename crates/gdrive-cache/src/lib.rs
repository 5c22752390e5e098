//! Local state for gdrive-backup.
//!
//! This crate keeps the two pieces of state the backup tool needs between
//! runs: the configured folder paths with their resolved Drive IDs
//! ([`PathStore`]) and the OAuth credentials ([`CredentialStore`]).

mod credentials;
mod paths;
mod store;

pub use credentials::CredentialStore;
pub use paths::{FolderPath, PathStore, PathTable};
pub use store::{data_path, Result, StoreError};
