//! Fixed-delay retry for resilient reads.

use std::future::Future;
use std::time::Duration;

use crate::api::error::{ApiError, FetchError};
use crate::config::RetryDefaults;

/// Retry budget for a resilient read.
///
/// The delay is fixed, with no jitter and no exponential growth, and every
/// failure is retried identically up to the attempt budget. The backend host
/// spins down when idle and the first request after a cold start routinely
/// fails or stalls, so a short fixed delay recovers faster than a backoff
/// curve tuned for congestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Always at least 1.
    pub max_attempts: u32,
    /// Fixed wait between attempts.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(300),
        }
    }
}

impl From<&RetryDefaults> for RetryPolicy {
    fn from(defaults: &RetryDefaults) -> Self {
        Self {
            max_attempts: defaults.max_attempts.max(1),
            base_delay: Duration::from_millis(defaults.base_delay_ms),
        }
    }
}

/// Runs `operation` until it succeeds or the attempt budget is spent.
///
/// Both transport failures and non-2xx responses count as failures; there is
/// no retryable/non-retryable distinction. Exhaustion carries the last error.
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let budget = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < budget => {
                tracing::debug!(attempt, budget, error = %err, "read failed, retrying");
                tokio::time::sleep(policy.base_delay).await;
            }
            Err(err) => {
                tracing::warn!(attempts = attempt, error = %err, "read failed, budget spent");
                return Err(FetchError::ExhaustedRetries {
                    attempts: attempt,
                    last: err,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(300),
        }
    }

    fn flaky_error() -> ApiError {
        ApiError::Status {
            status: 503,
            message: "cold start".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_third_attempt_within_budget() {
        let calls = AtomicU32::new(0);
        let result = with_retry(policy(3), || async {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 {
                Err(flaky_error())
            } else {
                Ok(n)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_budget_and_stops() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(policy(3), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(flaky_error())
        })
        .await;

        match result {
            Err(FetchError::ExhaustedRetries { attempts, last }) => {
                assert_eq!(attempts, 3);
                assert!(matches!(last, ApiError::Status { status: 503, .. }));
            }
            Ok(()) => panic!("expected terminal failure"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_success_makes_one_attempt() {
        let calls = AtomicU32::new(0);
        let result = with_retry(policy(4), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(42u32)
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_budget_is_clamped_to_one() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(policy(0), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(flaky_error())
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
