//! OAuth2 authorization-code flow for installed applications.
//!
//! The user opens [`OAuthConfig::authorize_url`] in a browser, approves
//! access, and pastes the returned code back; [`OAuthClient::exchange_code`]
//! trades it for [`Credentials`].

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Error, Result};
use crate::retry::parse_error_response;

/// Google's authorization endpoint.
pub const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";

/// Google's token endpoint.
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Full read/write access to the user's Drive.
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// Redirect URI that shows the code on screen instead of redirecting.
pub const OOB_REDIRECT_URL: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Credentials are treated as expired this long before they actually expire.
const EXPIRY_SKEW_SECS: i64 = 60;

/// Client registration used for the authorization flow.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthConfig {
    /// OAuth client ID.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Requested scopes.
    pub scopes: Vec<String>,
    /// Redirect URI registered for the client.
    pub redirect_url: String,
}

impl OAuthConfig {
    /// Creates a config with the Drive scope and the out-of-band redirect.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scopes: vec![DRIVE_SCOPE.to_string()],
            redirect_url: OOB_REDIRECT_URL.to_string(),
        }
    }

    /// Builds the URL the user must visit to authorize access.
    ///
    /// `state` is echoed back by the provider and should be checked by
    /// callers that receive the redirect themselves.
    pub fn authorize_url(&self, state: &str) -> String {
        let scope = self.scopes.join(" ");
        let params = [
            ("response_type", "code"),
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_url.as_str()),
            ("scope", scope.as_str()),
            ("access_type", "offline"),
            ("state", state),
        ];
        // Encoding a slice of string pairs cannot fail.
        let query = serde_urlencoded::to_string(params).unwrap_or_default();
        format!("{AUTH_URL}?{query}")
    }
}

impl fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .field("redirect_url", &self.redirect_url)
            .finish()
    }
}

/// Tokens obtained from the authorization flow.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Bearer token for API calls.
    pub access_token: String,
    /// Long-lived token used to obtain new access tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Token type, normally `Bearer`.
    pub token_type: String,
    /// When the access token expires.
    pub expires_at: DateTime<Utc>,
}

impl Credentials {
    /// Returns true if the access token is expired (or about to be) at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_SKEW_SECS) >= self.expires_at
    }

    fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            token_type: response.token_type.unwrap_or_else(|| "Bearer".to_string()),
            expires_at: now + Duration::seconds(response.expires_in.unwrap_or(3600)),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Performs token requests against the provider.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    http_client: reqwest::Client,
    token_url: String,
}

impl OAuthClient {
    /// Creates a client for `config` using Google's token endpoint.
    pub fn new(config: OAuthConfig) -> Self {
        Self::with_token_url(config, TOKEN_URL)
    }

    /// Creates a client with a custom token endpoint (for testing).
    pub fn with_token_url(config: OAuthConfig, token_url: impl Into<String>) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
            token_url: token_url.into(),
        }
    }

    /// Returns the client registration.
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Exchanges an authorization code for credentials.
    pub async fn exchange_code(&self, code: &str) -> Result<Credentials> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code.trim()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_url.as_str()),
        ];
        let response = self.request_token(&form).await?;
        if response.refresh_token.is_none() {
            tracing::warn!("token response has no refresh token; re-authorization will be needed");
        }
        Ok(Credentials::from_response(response, Utc::now()))
    }

    /// Obtains a fresh access token from a refresh token.
    ///
    /// The returned credentials keep the old refresh token when the provider
    /// does not issue a new one.
    pub async fn refresh(&self, credentials: &Credentials) -> Result<Credentials> {
        let refresh_token = credentials.refresh_token.as_deref().ok_or_else(|| {
            Error::Api(ApiError::Auth {
                message: "no refresh token stored; run the auth command again".to_string(),
            })
        })?;
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];
        let response = self.request_token(&form).await?;
        let mut refreshed = Credentials::from_response(response, Utc::now());
        if refreshed.refresh_token.is_none() {
            refreshed.refresh_token = credentials.refresh_token.clone();
        }
        tracing::debug!(expires_at = %refreshed.expires_at, "refreshed access token");
        Ok(refreshed)
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let response = self
            .http_client
            .post(&self.token_url)
            .form(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(match parse_error_response(response).await {
                // The token endpoint reports bad codes and revoked grants as 400.
                Error::Api(ApiError::Validation { message, .. }) => {
                    Error::Api(ApiError::Auth { message })
                }
                other => other,
            });
        }
        Ok(response.json().await?)
    }
}
