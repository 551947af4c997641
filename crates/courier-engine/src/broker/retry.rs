// Bounded-backoff retry for broker operations
//
// The broker being mid-boot and a message being momentarily unroutable
// are both transient: the operation is retried a bounded number of
// times with fixed backoff. Exhausting the budget is fatal and
// surfaces the last observed error.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use courier_error::{BrokerError, BrokerResult, Retryable};

/// A bounded attempt count with fixed backoff between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum attempts, including the first
    pub attempts: u32,
    /// Fixed delay between attempts
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Create a policy
    pub fn new(attempts: u32, backoff: Duration) -> Self {
        RetryPolicy { attempts, backoff }
    }

    /// Run an operation under this policy.
    ///
    /// Only retryable errors consume the budget; any other error is
    /// returned immediately. Exhaustion maps to `RetriesExhausted`
    /// carrying the last transient error.
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> BrokerResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = BrokerResult<T>>,
    {
        let mut last: Option<BrokerError> = None;

        for attempt in 1..=self.attempts {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() => {
                    debug!(
                        operation = label,
                        attempt,
                        attempts = self.attempts,
                        error = %err,
                        "transient broker error, backing off"
                    );
                    last = Some(err);
                    if attempt < self.attempts {
                        tokio::time::sleep(self.backoff).await;
                    }
                }
                Err(err) => return Err(err),
            }
        }

        Err(BrokerError::retries_exhausted(
            self.attempts,
            last.map(|err| err.to_string()).unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(5, Duration::from_millis(500));

        let result = policy
            .run("test", || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(BrokerError::transient("broker booting"))
                } else {
                    Ok(42)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_surfaces_last_error() {
        let policy = RetryPolicy::new(3, Duration::from_millis(500));

        let result: BrokerResult<()> = policy
            .run("test", || async { Err(BrokerError::transient("still unroutable")) })
            .await;

        match result.unwrap_err() {
            BrokerError::RetriesExhausted { attempts, last } => {
                assert_eq!(attempts, 3);
                assert!(last.contains("still unroutable"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_errors_fail_immediately() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(5, Duration::from_millis(500));

        let result: BrokerResult<()> = policy
            .run("test", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(BrokerError::Publish("bad exchange".to_string()))
            })
            .await;

        assert!(matches!(result.unwrap_err(), BrokerError::Publish(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
