//! Keyring operations for secure credential storage.
//!
//! Stores the OAuth credentials as a JSON blob in the OS-native credential
//! manager:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service API (requires libsecret)

use gdrive_api::auth::Credentials;
use keyring::Entry;

use super::{CommandError, Result};

/// Service name for keyring entries.
const SERVICE: &str = "gbak-gdrive-backup";

/// Username for the credentials entry.
const USERNAME: &str = "oauth_credentials";

/// Appends a platform hint to keyring errors that usually mean the
/// credential service is unreachable.
fn platform_hint(error: &keyring::Error) -> String {
    match error {
        keyring::Error::NoStorageAccess(_) | keyring::Error::PlatformFailure(_) => format!(
            "{}\n\nHint: {}\nAlternative: set credential_storage = \"file\" in the config file",
            error,
            platform_access_hint()
        ),
        _ => error.to_string(),
    }
}

#[cfg(target_os = "linux")]
fn platform_access_hint() -> &'static str {
    "gbak uses the Secret Service API (libsecret). Make sure gnome-keyring or \
     kwallet is installed and running, and that a D-Bus session is available."
}

#[cfg(target_os = "macos")]
fn platform_access_hint() -> &'static str {
    "gbak uses the Keychain. Unlock your login keychain and allow gbak to access it."
}

#[cfg(target_os = "windows")]
fn platform_access_hint() -> &'static str {
    "gbak uses Credential Manager. Check that the Credential Manager service is running."
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn platform_access_hint() -> &'static str {
    "Your platform's credential storage is not accessible."
}

fn entry() -> Result<Entry> {
    Entry::new(SERVICE, USERNAME)
        .map_err(|e| CommandError::Config(format!("Keyring error: {}", platform_hint(&e))))
}

/// Stores credentials in the OS keyring.
pub fn store_credentials(credentials: &Credentials) -> Result<()> {
    let json = serde_json::to_string(credentials)?;
    entry()?.set_password(&json).map_err(|e| {
        CommandError::Config(format!("Failed to store credentials: {}", platform_hint(&e)))
    })
}

/// Retrieves credentials from the OS keyring.
///
/// Returns `Ok(None)` if nothing is stored.
pub fn get_credentials() -> Result<Option<Credentials>> {
    match entry()?.get_password() {
        Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(keyring::Error::Ambiguous(_)) => Ok(None),
        Err(e) => Err(CommandError::Config(format!(
            "Failed to read credentials: {}",
            platform_hint(&e)
        ))),
    }
}
