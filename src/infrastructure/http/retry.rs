//! Retry policy with exponential backoff for HTTP collaborators
//!
//! Retries only errors classified as transient by
//! [`HttpCallError::is_transient`]; permanent failures return immediately.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backoff::ExponentialBackoffBuilder;
use tracing::{debug, warn};

use super::error::HttpCallError;
use crate::domain::models::RetryConfig;

/// Retry policy with exponential backoff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry
    pub initial_backoff: Duration,

    /// Upper bound on a single delay
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy with custom settings
    pub const fn new(max_retries: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_retries,
            initial_backoff,
            max_backoff,
        }
    }

    /// A policy that never retries.
    pub const fn none() -> Self {
        Self::new(0, Duration::from_millis(1), Duration::from_millis(1))
    }

    /// Execute an async operation, retrying transient failures
    ///
    /// # Arguments
    /// * `operation` - Name used in log lines
    /// * `call` - Factory producing one attempt per invocation
    pub async fn execute<F, Fut, T>(&self, operation: &str, call: F) -> Result<T, HttpCallError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, HttpCallError>>,
    {
        let backoff = ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_backoff)
            .with_max_interval(self.max_backoff)
            .with_max_elapsed_time(None)
            .build();

        let attempts = AtomicU32::new(0);
        let max_retries = self.max_retries;

        let result = backoff::future::retry_notify(
            backoff,
            || {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst);
                let fut = call();
                async move {
                    match fut.await {
                        Ok(value) => Ok(value),
                        Err(err) if err.is_transient() && attempt < max_retries => {
                            Err(backoff::Error::transient(err))
                        }
                        Err(err) => Err(backoff::Error::permanent(err)),
                    }
                }
            },
            |err: HttpCallError, wait: Duration| {
                warn!(
                    operation,
                    error = %err,
                    retry_in_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                    "transient failure, retrying"
                );
            },
        )
        .await;

        let total = attempts.load(Ordering::SeqCst);
        if total > 1 {
            debug!(operation, attempts = total, ok = result.is_ok(), "retries finished");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::sync::atomic::AtomicUsize;

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(max_retries, Duration::from_millis(1), Duration::from_millis(2))
    }

    fn server_error() -> HttpCallError {
        HttpCallError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "busy".into(),
        }
    }

    #[tokio::test]
    async fn test_retries_transient_until_success() {
        let calls = AtomicUsize::new(0);
        let result = fast_policy(3)
            .execute("test", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(server_error())
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = fast_policy(2)
            .execute("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(server_error()) }
            })
            .await;

        assert!(matches!(result, Err(HttpCallError::Status { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = fast_policy(5)
            .execute("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(HttpCallError::Status {
                        status: StatusCode::NOT_FOUND,
                        body: "model not found".into(),
                    })
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_none_policy_makes_single_attempt() {
        let calls = AtomicUsize::new(0);
        let _ = RetryPolicy::none()
            .execute("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(server_error()) }
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_from_config() {
        let policy = RetryPolicy::from(&RetryConfig {
            max_retries: 4,
            initial_backoff_ms: 100,
            max_backoff_ms: 1000,
        });
        assert_eq!(policy.max_retries, 4);
        assert_eq!(policy.initial_backoff, Duration::from_millis(100));
        assert_eq!(policy.max_backoff, Duration::from_millis(1000));
    }
}
