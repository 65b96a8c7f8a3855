//! Error types for octoflow

use std::time::Duration;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by octoflow
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// GitHub API failure without a usable status code (transport, decode, ...)
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// GitHub API call rejected with an HTTP status
    ///
    /// Carries the status and any server-provided retry-after hint so the
    /// throttle layer can classify the failure without knowing which HTTP
    /// client produced it.
    #[error("github api {operation} failed with status {status}: {message}")]
    ApiStatus {
        /// Label of the remote operation that failed
        operation: String,
        /// HTTP status code from the response
        status: u16,
        /// Server-indicated wait before retrying, if the response carried one
        retry_after: Option<Duration>,
        /// Response body (truncated) or error message
        message: String,
    },

    /// No usable authentication token found
    #[error("authentication error: {0}")]
    Auth(String),

    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Analytics store could not be persisted
    #[error("analytics storage error: {0}")]
    Analytics(String),

    /// Internal invariant violation
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// HTTP status code carried by this error, if any
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ApiStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-indicated retry delay carried by this error, if any
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::ApiStatus { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => Self::ApiStatus {
                operation: "github".to_string(),
                status: source.status_code.as_u16(),
                // octocrab surfaces the error body, not the response headers
                retry_after: None,
                message: source.message,
            },
            other => Self::GitHubApi(other.to_string()),
        }
    }
}
