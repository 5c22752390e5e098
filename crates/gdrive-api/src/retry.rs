//! Retry logic for HTTP requests with exponential backoff.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::error::{ApiError, Error, Result};

/// Default initial backoff duration for retries (1 second).
pub(crate) const DEFAULT_INITIAL_BACKOFF_SECS: u64 = 1;

/// Default maximum backoff duration for retries (30 seconds).
pub(crate) const DEFAULT_MAX_BACKOFF_SECS: u64 = 30;

/// Default maximum number of retry attempts.
pub(crate) const DEFAULT_MAX_RETRIES: u32 = 3;

/// Configuration for retry behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts.
    pub max_retries: u32,
    /// Initial backoff duration for retries.
    pub initial_backoff: Duration,
    /// Maximum backoff duration for retries.
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_secs(DEFAULT_INITIAL_BACKOFF_SECS),
            max_backoff: Duration::from_secs(DEFAULT_MAX_BACKOFF_SECS),
        }
    }
}

impl RetryConfig {
    /// A configuration that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Calculates the backoff duration for a retry attempt.
    ///
    /// If `retry_after` is provided (from a 429 response), uses that value.
    /// Otherwise, uses exponential backoff: initial * 2^attempt, capped at max_backoff.
    pub fn calculate_backoff(&self, attempt: u32, retry_after: Option<u64>) -> Duration {
        let max_backoff_secs = self.max_backoff.as_secs();
        if let Some(secs) = retry_after {
            Duration::from_secs(secs.min(max_backoff_secs))
        } else {
            let initial_secs = self.initial_backoff.as_secs();
            let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
            let backoff_secs = initial_secs.saturating_mul(factor);
            Duration::from_secs(backoff_secs.min(max_backoff_secs))
        }
    }
}

/// Decision type for retry logic.
pub(crate) enum RetryDecision {
    /// Request succeeded; the response is ready to be consumed.
    Success(reqwest::Response),
    /// Request should be retried.
    Retry { retry_after: Option<u64> },
}

/// Classifies a response as success, retryable, or a terminal error.
///
/// 429 is always retryable. 5xx is retryable only when `retry_server_errors`
/// is set.
pub(crate) async fn classify_response(
    response: reqwest::Response,
    attempt: u32,
    max_retries: u32,
    retry_server_errors: bool,
) -> Result<RetryDecision> {
    let status = response.status();

    if status.is_success() {
        return Ok(RetryDecision::Success(response));
    }

    let retryable =
        status.as_u16() == 429 || (retry_server_errors && status.is_server_error());
    if retryable && attempt < max_retries {
        return Ok(RetryDecision::Retry {
            retry_after: retry_after_header(&response),
        });
    }

    Err(parse_error_response(response).await)
}

fn retry_after_header(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
}

/// Parses an error response into our error types.
pub(crate) async fn parse_error_response(response: reqwest::Response) -> Error {
    let status = response.status();
    let status_code = status.as_u16();
    let retry_after = retry_after_header(&response);
    let url_path = response.url().path().to_string();

    let message = response.text().await.unwrap_or_default();

    let api_error = match status_code {
        401 | 403 => ApiError::Auth {
            message: if message.is_empty() {
                "Authentication failed".to_string()
            } else {
                message
            },
        },
        404 => ApiError::NotFound {
            resource: "file".to_string(),
            id: not_found_id(&url_path).to_string(),
        },
        429 => ApiError::RateLimit { retry_after },
        400 => ApiError::Validation {
            field: None,
            message: if message.is_empty() {
                "Bad request".to_string()
            } else {
                message
            },
        },
        _ => ApiError::Http {
            status: status_code,
            message: if message.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                message
            },
        },
    };

    Error::Api(api_error)
}

/// Picks the file ID out of a request path.
///
/// `/files/{id}/children` names `{id}`, not `children`. Paths without a
/// `files` segment fall back to the last segment.
fn not_found_id(url_path: &str) -> &str {
    let after_files = url_path
        .split('/')
        .filter(|s| !s.is_empty())
        .skip_while(|s| *s != "files")
        .nth(1);
    if let Some(id) = after_files {
        return id;
    }
    url_path
        .rsplit('/')
        .find(|s| !s.is_empty())
        .unwrap_or("unknown")
}

/// Executes a request with retry logic, returning the successful response.
///
/// Rate limits and server errors are both retried. Use
/// [`execute_create_with_retry`] for requests that create resources.
pub(crate) async fn execute_with_retry<F, Fut>(
    config: &RetryConfig,
    make_request: F,
) -> Result<reqwest::Response>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<reqwest::Response>>,
{
    run_with_retry(config, true, make_request).await
}

/// Executes a request that creates a resource.
///
/// Only rate limits are retried. A 5xx may arrive after the server already
/// created the resource, so it is returned as an error instead.
pub(crate) async fn execute_create_with_retry<F, Fut>(
    config: &RetryConfig,
    make_request: F,
) -> Result<reqwest::Response>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<reqwest::Response>>,
{
    run_with_retry(config, false, make_request).await
}

async fn run_with_retry<F, Fut>(
    config: &RetryConfig,
    retry_server_errors: bool,
    mut make_request: F,
) -> Result<reqwest::Response>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<reqwest::Response>>,
{
    for attempt in 0..=config.max_retries {
        let response = make_request().await?;

        let decision =
            classify_response(response, attempt, config.max_retries, retry_server_errors).await?;
        match decision {
            RetryDecision::Success(response) => return Ok(response),
            RetryDecision::Retry { retry_after } => {
                let backoff = config.calculate_backoff(attempt, retry_after);
                tracing::debug!(attempt, ?backoff, "retrying request");
                sleep(backoff).await;
            }
        }
    }

    // All retries exhausted, return rate limit error
    Err(Error::Api(ApiError::RateLimit { retry_after: None }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_backoff_with_retry_after() {
        let config = RetryConfig::default();
        assert_eq!(config.calculate_backoff(0, Some(5)), Duration::from_secs(5));
        assert_eq!(
            config.calculate_backoff(0, Some(60)),
            Duration::from_secs(DEFAULT_MAX_BACKOFF_SECS)
        );
    }

    #[test]
    fn test_calculate_backoff_exponential() {
        let config = RetryConfig::default();
        assert_eq!(config.calculate_backoff(0, None), Duration::from_secs(1));
        assert_eq!(config.calculate_backoff(1, None), Duration::from_secs(2));
        assert_eq!(config.calculate_backoff(2, None), Duration::from_secs(4));
        assert_eq!(config.calculate_backoff(3, None), Duration::from_secs(8));
    }

    #[test]
    fn test_calculate_backoff_caps_at_max() {
        let config = RetryConfig::default();
        assert_eq!(
            config.calculate_backoff(10, None),
            Duration::from_secs(DEFAULT_MAX_BACKOFF_SECS)
        );
        assert_eq!(
            config.calculate_backoff(200, None),
            Duration::from_secs(DEFAULT_MAX_BACKOFF_SECS)
        );
    }

    #[test]
    fn test_retry_config_none() {
        assert_eq!(RetryConfig::none().max_retries, 0);
    }

    #[test]
    fn test_not_found_id_uses_segment_after_files() {
        assert_eq!(not_found_id("/files/missing-id"), "missing-id");
        assert_eq!(not_found_id("/files/F-gone/children"), "F-gone");
        assert_eq!(not_found_id("/drive/v2/files/F-gone/children"), "F-gone");
        assert_eq!(not_found_id("/about"), "about");
        assert_eq!(not_found_id("/"), "unknown");
    }
}
