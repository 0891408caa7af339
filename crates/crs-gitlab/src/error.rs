//! GitLab client error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when talking to the GitLab REST API.
#[derive(Debug, Error)]
pub enum GitLabError {
    /// HTTP transport error (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GitLab returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// Failed to parse a response body.
    #[error("parse error: {0}")]
    Parse(String),

    /// GitLab returned 429 Too Many Requests.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },
}

impl GitLabError {
    /// Whether the same request may succeed if repeated later.
    ///
    /// Timeouts, connection failures, 5xx, 408 and 429 are transient;
    /// 4xx access errors and parse failures are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
            Self::Api { status, .. } => *status >= 500 || *status == 408,
            Self::RateLimited { .. } => true,
            Self::Parse(_) => false,
        }
    }

    /// Server-requested wait before the next attempt.
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after_secs } => Some(Duration::from_secs(*retry_after_secs)),
            _ => None,
        }
    }

    /// HTTP status of an API error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Parse(_) => None,
        }
    }

    /// 401: the token is missing, expired or revoked.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> GitLabError {
        GitLabError::Api {
            status,
            message: String::new(),
        }
    }

    #[test]
    fn server_errors_are_transient() {
        assert!(api(500).is_transient());
        assert!(api(502).is_transient());
        assert!(api(503).is_transient());
        assert!(api(408).is_transient());
    }

    #[test]
    fn access_errors_are_not_transient() {
        assert!(!api(401).is_transient());
        assert!(!api(403).is_transient());
        assert!(!api(404).is_transient());
        assert!(!GitLabError::Parse("bad json".into()).is_transient());
    }

    #[test]
    fn rate_limit_carries_retry_after() {
        let err = GitLabError::RateLimited {
            retry_after_secs: 12,
        };
        assert!(err.is_transient());
        assert_eq!(err.retry_after(), Some(Duration::from_secs(12)));
        assert_eq!(err.status(), Some(429));
        assert_eq!(api(503).retry_after(), None);
    }

    #[test]
    fn unauthorized_is_detected() {
        assert!(api(401).is_unauthorized());
        assert!(!api(403).is_unauthorized());
    }
}
