//! Integration tests for the path and credential stores.
//!
//! These tests verify that the stores correctly read and write to disk.

use chrono::{TimeZone, Utc};
use gdrive_api::auth::Credentials;
use gdrive_cache::{CredentialStore, FolderPath, PathStore, PathTable};
use tempfile::tempdir;

fn credentials() -> Credentials {
    Credentials {
        access_token: "access-token".to_string(),
        refresh_token: Some("refresh-token".to_string()),
        token_type: "Bearer".to_string(),
        expires_at: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
    }
}

#[test]
fn test_path_store_save_and_load_roundtrip() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let store = PathStore::with_path(temp_dir.path().join("paths.json"));

    let mut table = PathTable::default();
    table.merge_paths([
        FolderPath::new("Grad School").with_local_path("/home/me/grad"),
        FolderPath::new("Photos"),
    ]);
    table.set_folder_id("Photos", "folder-photos");
    store.save(&table).expect("failed to save paths");

    let loaded = store.load_or_default().expect("failed to load paths");
    assert_eq!(loaded, table);
    assert_eq!(
        loaded.get("Photos").unwrap().folder_id.as_deref(),
        Some("folder-photos")
    );
}

#[test]
fn test_path_store_missing_file_is_empty_table() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let store = PathStore::with_path(temp_dir.path().join("nope.json"));

    let table = store.load_or_default().expect("missing file should load");
    assert!(table.entries.is_empty());
}

#[test]
fn test_path_store_rejects_corrupt_file() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let path = temp_dir.path().join("paths.json");
    std::fs::write(&path, "{ entries: ").unwrap();

    let result = PathStore::with_path(path).load_or_default();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("JSON error"));
}

#[test]
fn test_credential_store_roundtrip_and_delete() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let store = CredentialStore::with_path(temp_dir.path().join("credentials.json"));

    assert!(store.load().unwrap().is_none());

    store.save(&credentials()).expect("failed to save credentials");
    assert_eq!(store.load().unwrap(), Some(credentials()));

    store.delete().expect("failed to delete credentials");
    assert!(store.load().unwrap().is_none());
    store.delete().expect("deleting twice should be fine");
}

#[cfg(unix)]
#[test]
fn test_credential_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = tempdir().expect("failed to create temp dir");
    let store = CredentialStore::with_path(temp_dir.path().join("credentials.json"));
    store.save(&credentials()).unwrap();

    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
