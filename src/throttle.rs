//! Rate-limit-aware execution of remote calls
//!
//! Wraps any remote operation so a throttling rejection (HTTP 403/429) is
//! absorbed by sleeping for the server-indicated interval and retrying
//! exactly once. Everything else propagates untouched.

use crate::error::{Error, Result};
use std::time::Duration;
use tracing::warn;

/// Default wait when the server gives no retry-after hint
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Throttling classification and retry-delay policy
///
/// Keeps the executor independent of any particular HTTP client's error
/// shape: detection and delay extraction go through [`Error::status`] and
/// [`Error::retry_after`] only.
#[derive(Debug, Clone)]
pub struct ThrottlePolicy {
    /// Wait applied when a throttled response carries no retry-after hint
    pub default_delay: Duration,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            default_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl ThrottlePolicy {
    /// Whether this failure is a throttling signal from the remote
    #[must_use]
    pub fn is_throttled(&self, err: &Error) -> bool {
        matches!(err.status(), Some(403 | 429))
    }

    /// How long to wait before the single retry
    #[must_use]
    pub fn retry_delay(&self, err: &Error) -> Duration {
        err.retry_after().unwrap_or(self.default_delay)
    }
}

/// Execute a remote operation, retrying exactly once on a throttling signal
///
/// The operation runs once; if it fails with a throttling signal, the
/// executor sleeps for [`ThrottlePolicy::retry_delay`] and runs it one more
/// time, propagating that second outcome unconditionally. Non-throttling
/// failures propagate immediately. There is never more than one retry, so
/// callers must only pass operations that are safe to repeat after a
/// throttled rejection (e.g. upsert-by-path content writes).
pub async fn call_with_backoff<T, F, Fut>(label: &str, policy: &ThrottlePolicy, op: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match op().await {
        Ok(value) => Ok(value),
        Err(err) if policy.is_throttled(&err) => {
            let delay = policy.retry_delay(&err);
            warn!(
                operation = label,
                status = err.status(),
                delay_secs = delay.as_secs(),
                "rate limited, sleeping before single retry"
            );
            tokio::time::sleep(delay).await;
            op().await
        }
        Err(err) => Err(err),
    }
}
