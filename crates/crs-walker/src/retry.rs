//! Transient GitLab error retry logic.
//!
//! Every API call made by the engine goes through [`with_retry`]. Transient
//! failures (timeouts, connection errors, 5xx, 429) are retried with
//! exponential backoff; a 429 waits for the server's `Retry-After` instead.
//! Anything else, or a transient failure on the last attempt, is returned
//! to the caller, which decides whether the branch or file is abandoned.

use std::future::Future;
use std::time::Duration;

use crs_gitlab::GitLabError;

/// Configuration for retry behavior on transient API errors.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
    /// Cap for `Retry-After` waits.
    pub max_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            max_retry_after: Duration::from_secs(300),
        }
    }
}

impl RetryPolicy {
    /// Retry without sleeping.
    pub const fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            max_retry_after: Duration::ZERO,
        }
    }

    /// How long to wait after `error` when `backoff` is the current
    /// exponential delay.
    fn wait_for(&self, error: &GitLabError, backoff: Duration) -> Duration {
        error
            .retry_after()
            .map_or(backoff, |requested| requested.min(self.max_retry_after))
    }
}

/// Run `op` until it succeeds, fails permanently, or attempts run out.
///
/// `what` names the request in log output.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    what: &str,
    mut op: F,
) -> Result<T, GitLabError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GitLabError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut backoff = policy.base_delay;
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < max_attempts => {
                let wait = policy.wait_for(&e, backoff);
                tracing::warn!(
                    what,
                    attempt,
                    max_attempts,
                    wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                    error = %e,
                    "transient GitLab error, retrying"
                );
                tokio::time::sleep(wait).await;
                backoff = std::cmp::min(backoff * 2, policy.max_delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
