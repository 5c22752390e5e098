//! Error types for the Drive API client.

use std::fmt;

use thiserror::Error as ThisError;

use crate::query::QueryError;

/// Errors reported by the Drive API itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP-level error with status code.
    Http { status: u16, message: String },
    /// Authentication failure (expired or revoked credentials).
    Auth { message: String },
    /// Rate limit exceeded.
    RateLimit { retry_after: Option<u64> },
    /// Resource not found.
    NotFound { resource: String, id: String },
    /// API validation error (usually a rejected query).
    Validation {
        field: Option<String>,
        message: String,
    },
    /// Network/connection error.
    Network { message: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http { status, message } => write!(f, "HTTP error {}: {}", status, message),
            ApiError::Auth { message } => write!(f, "Auth error: {}", message),
            ApiError::RateLimit { retry_after } => match retry_after {
                Some(secs) => write!(f, "Rate limited, retry after {} seconds", secs),
                None => write!(f, "Rate limited"),
            },
            ApiError::NotFound { resource, id } => {
                write!(f, "{} not found: {}", resource, id)
            }
            ApiError::Validation { field, message } => match field {
                Some(f_name) => write!(f, "Validation error on {}: {}", f_name, message),
                None => write!(f, "Validation error: {}", message),
            },
            ApiError::Network { message } => write!(f, "Network error: {}", message),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Returns true if this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::RateLimit { .. } | ApiError::Network { .. } => true,
            ApiError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns the appropriate CLI exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ApiError::Network { .. } => 3,
            ApiError::RateLimit { .. } => 4,
            _ => 2,
        }
    }
}

/// Top-level error for client operations.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The API returned an error response.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The HTTP request could not be completed.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filters could not be compiled, or an empty result was indexed.
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    /// Local file I/O failed during upload or download.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true if retrying the request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Api(api) => api.is_retryable(),
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns the appropriate CLI exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Api(api) => api.exit_code(),
            Error::Http(_) => 3,
            Error::Json(_) => 2,
            Error::Query(_) => 1,
            Error::Io(_) => 3,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_http() {
        let error = ApiError::Http {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(error.to_string(), "HTTP error 503: Service Unavailable");
    }

    #[test]
    fn test_api_error_display_rate_limit() {
        let error = ApiError::RateLimit {
            retry_after: Some(60),
        };
        assert_eq!(error.to_string(), "Rate limited, retry after 60 seconds");
        assert_eq!(ApiError::RateLimit { retry_after: None }.to_string(), "Rate limited");
    }

    #[test]
    fn test_api_error_display_validation() {
        let error = ApiError::Validation {
            field: Some("q".to_string()),
            message: "Invalid query".to_string(),
        };
        assert_eq!(error.to_string(), "Validation error on q: Invalid query");
    }

    #[test]
    fn test_api_error_is_retryable() {
        assert!(ApiError::RateLimit { retry_after: Some(5) }.is_retryable());
        assert!(ApiError::Network {
            message: "Connection reset".to_string()
        }
        .is_retryable());
        assert!(ApiError::Http {
            status: 502,
            message: "Bad Gateway".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_api_error_is_not_retryable() {
        assert!(!ApiError::Auth {
            message: "Invalid credentials".to_string()
        }
        .is_retryable());
        assert!(!ApiError::NotFound {
            resource: "file".to_string(),
            id: "123".to_string()
        }
        .is_retryable());
        assert!(!ApiError::Validation {
            field: None,
            message: "Invalid request".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_api_error_exit_codes() {
        assert_eq!(ApiError::Network { message: "Timeout".to_string() }.exit_code(), 3);
        assert_eq!(ApiError::RateLimit { retry_after: None }.exit_code(), 4);
        assert_eq!(
            ApiError::Auth {
                message: "Unauthorized".to_string()
            }
            .exit_code(),
            2
        );
    }

    #[test]
    fn test_error_from_query_error() {
        let error: Error = QueryError::EmptyResult.into();
        assert!(matches!(error, Error::Query(QueryError::EmptyResult)));
        assert_eq!(error.exit_code(), 1);
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_error_api_is_transparent() {
        let error: Error = ApiError::Auth {
            message: "Token expired".to_string(),
        }
        .into();
        assert_eq!(error.to_string(), "Auth error: Token expired");
    }
}
