//! Loading, saving and refreshing OAuth credentials.
//!
//! Credentials live in the credential file under the XDG data directory, or in
//! the OS keyring when `credential_storage = "keyring"`.

use chrono::Utc;
use gdrive_api::auth::{Credentials, OAuthClient};
use gdrive_api::client::GDriveClient;
use gdrive_api::query::{FieldRegistry, FilterValidator};
use gdrive_cache::CredentialStore;

use super::config::Config;
use super::keyring;
use super::{CommandError, Result};

/// Reads stored credentials from the configured backend.
pub fn load(config: &Config) -> Result<Option<Credentials>> {
    if config.uses_keyring() {
        keyring::get_credentials()
    } else {
        Ok(CredentialStore::new()?.load()?)
    }
}

/// Writes credentials to the configured backend.
pub fn save(config: &Config, credentials: &Credentials) -> Result<()> {
    if config.uses_keyring() {
        keyring::store_credentials(credentials)
    } else {
        Ok(CredentialStore::new()?.save(credentials)?)
    }
}

/// Returns valid credentials, refreshing and persisting them if expired.
///
/// # Errors
///
/// Returns `CommandError::Config` if the user has not run `gbak auth`.
pub async fn resolve(config: &Config) -> Result<Credentials> {
    let credentials = load(config)?.ok_or_else(|| {
        CommandError::Config("Not authorized. Run 'gbak auth' first.".to_string())
    })?;

    if !credentials.is_expired(Utc::now()) {
        return Ok(credentials);
    }

    tracing::debug!("access token expired, refreshing");
    let oauth = OAuthClient::new(config.oauth_config()?);
    let refreshed = oauth.refresh(&credentials).await?;
    save(config, &refreshed)?;
    Ok(refreshed)
}

/// Builds a Drive client from the config and stored credentials.
pub async fn client(config: &Config, strict: bool) -> Result<GDriveClient> {
    let credentials = resolve(config).await?;
    build_client(config, &credentials.access_token, strict)
}

/// Builds a Drive client for `token` using the query settings in `config`.
pub fn build_client(config: &Config, token: &str, strict: bool) -> Result<GDriveClient> {
    let validator = FilterValidator::new(FieldRegistry::drive()).with_mode(config.parse_mode(strict));
    let mut builder = GDriveClient::builder(token).validator(validator);
    if let Some(page_size) = config.query.page_size {
        builder = builder.page_size(page_size);
    }
    Ok(builder.build()?)
}
