//! Retry policy for portal requests with exponential backoff.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::error::PortalError;

/// Retry policy with exponential backoff for transient failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the initial try.
    max_retries: u32,
    /// Initial backoff duration in milliseconds.
    initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds.
    max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff_ms: 2_000,
            max_backoff_ms: 60_000,
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy.
    pub fn new(max_retries: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff_ms,
            max_backoff_ms,
        }
    }

    /// Execute an operation with retry logic.
    ///
    /// Retries transient failures up to `max_retries` times, doubling the
    /// backoff each attempt. Permanent failures return immediately.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, PortalError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, PortalError>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if self.should_retry(&err, attempt) => {
                    let backoff = self.calculate_backoff(attempt);
                    warn!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %err,
                        "Transient portal error, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(err) => {
                    debug!(attempt = attempt + 1, error = %err, "Portal request failed");
                    return Err(err);
                }
            }
        }
    }

    /// Whether the error warrants another attempt.
    fn should_retry(&self, err: &PortalError, attempt: u32) -> bool {
        attempt < self.max_retries && err.is_transient()
    }

    /// Exponential backoff: initial * 2^attempt, capped at the maximum.
    fn calculate_backoff(&self, attempt: u32) -> Duration {
        let multiplier = 2u64.saturating_pow(attempt);
        let backoff_ms = self
            .initial_backoff_ms
            .saturating_mul(multiplier)
            .min(self.max_backoff_ms);
        Duration::from_millis(backoff_ms)
    }
}
