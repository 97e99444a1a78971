//! Retry executor with pure exponential backoff
//!
//! The executor re-runs a fallible async operation while the caller-supplied
//! policy classifies the error as retryable. Delays grow as
//! `base_delay * 2^(retry - 1)`: with the default 2s base the sequence is
//! 2s, 4s, 8s. No jitter is applied.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can terminate a retry loop
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// Every allowed attempt failed; carries the final attempt's error
    #[error("all {attempts} attempts failed")]
    Exhausted {
        attempts: u32,
        #[source]
        source: E,
    },

    /// The policy classified the error as non-retryable
    #[error("operation failed with a non-retryable error")]
    Aborted {
        #[source]
        source: E,
    },
}

impl<E> RetryError<E> {
    /// Flatten back to the underlying operation error.
    pub fn into_source(self) -> E {
        match self {
            Self::Exhausted { source, .. } | Self::Aborted { source } => source,
        }
    }
}

/// Decision for whether to retry an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Re-attempt after the backoff delay
    Retry,
    /// Surface the error immediately
    Stop,
}

/// Trait for classifying whether an error should be retried
pub trait RetryPolicy<E>: Send + Sync {
    fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision;
}

impl<E, F> RetryPolicy<E> for F
where
    F: Fn(&E, u32) -> RetryDecision + Send + Sync,
{
    fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision {
        self(error, attempt)
    }
}

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt
    pub max_retries: u32,
    /// Backoff base; retry n sleeps `base_delay * 2^(n-1)`
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_retries: 3, base_delay: Duration::from_secs(2) }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self { max_retries, base_delay }
    }

    /// Delay before the given 1-based retry number.
    fn backoff_delay(&self, retry_number: u32) -> Duration {
        let shift = retry_number.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << shift)
    }
}

/// Executes operations under a retry policy
pub struct RetryExecutor<P> {
    config: RetryConfig,
    policy: P,
}

impl<P> RetryExecutor<P> {
    pub fn new(config: RetryConfig, policy: P) -> Self {
        Self { config, policy }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Run the operation, retrying per policy up to `max_retries` times.
    ///
    /// The initial attempt plus `max_retries` re-attempts gives at most
    /// `max_retries + 1` executions. A retryable final failure is surfaced
    /// inside [`RetryError::Exhausted`]; a non-retryable error is always
    /// [`RetryError::Aborted`], regardless of which attempt produced it.
    pub async fn execute<F, Fut, T, E>(&self, mut operation: F) -> Result<T, RetryError<E>>
    where
        P: RetryPolicy<E>,
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.config.max_retries + 1;
        let mut attempt: u32 = 1;

        loop {
            debug!(attempt, max_attempts, "executing operation");

            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "operation succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(error) => match self.policy.should_retry(&error, attempt) {
                    RetryDecision::Stop => {
                        debug!(attempt, error = %error, "error is not retryable");
                        return Err(RetryError::Aborted { source: error });
                    }
                    RetryDecision::Retry if attempt >= max_attempts => {
                        warn!(attempt, error = %error, "retries exhausted");
                        return Err(RetryError::Exhausted { attempts: attempt, source: error });
                    }
                    RetryDecision::Retry => {
                        let delay = self.config.backoff_delay(attempt);
                        warn!(attempt, delay_secs = delay.as_secs_f64(), error = %error, "operation failed, backing off");
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                },
            }
        }
    }
}
