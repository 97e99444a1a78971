//! Circuit breaker state machine
//!
//! Counts consecutive failures of a wrapped operation; once the threshold is
//! reached the circuit opens and every call fails fast with
//! [`ResilienceError::CircuitOpen`] until the cool-down elapses. After the
//! cool-down exactly one trial call is admitted (half-open): success closes
//! the circuit and resets the counter, failure re-opens it and restarts the
//! cool-down timer.
//!
//! Callers that can tell dependency faults from caller faults use
//! [`CircuitBreaker::execute_classified`]: errors the classifier rejects
//! pass through without touching breaker state, so a caller mistake never
//! opens the circuit.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};

/// Invalid breaker configuration
#[derive(Debug, Error)]
#[error("invalid circuit breaker configuration: {message}")]
pub struct ConfigError {
    pub message: String,
}

/// Errors produced when executing through the breaker
#[derive(Debug, Error)]
pub enum ResilienceError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// Circuit is open, the call was rejected without touching the network
    #[error("circuit breaker is open, rejecting calls")]
    CircuitOpen,

    /// The wrapped operation failed
    #[error("operation failed")]
    OperationFailed {
        #[source]
        source: E,
    },
}

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Calls pass through, failures are counted
    Closed,
    /// Calls are short-circuited while the cool-down timer runs
    Open,
    /// Cool-down elapsed; one trial call is admitted
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "CLOSED"),
            Self::Open => write!(f, "OPEN"),
            Self::HalfOpen => write!(f, "HALF_OPEN"),
        }
    }
}

/// Configuration for circuit breaker behavior
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before the circuit opens
    pub failure_threshold: u64,
    /// How long the circuit stays open before admitting a trial call
    pub cooldown: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self { failure_threshold: 5, cooldown: Duration::from_secs(30) }
    }
}

impl CircuitBreakerConfig {
    pub fn new(failure_threshold: u64, cooldown: Duration) -> Self {
        Self { failure_threshold, cooldown }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.failure_threshold == 0 {
            return Err(ConfigError {
                message: "failure_threshold must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Generic circuit breaker shared across all concurrent calls to one
/// dependency. Cloning shares the underlying state.
pub struct CircuitBreaker<C: Clock = SystemClock> {
    config: CircuitBreakerConfig,
    state: Arc<RwLock<CircuitState>>,
    consecutive_failures: Arc<AtomicU64>,
    opened_at: Arc<RwLock<Option<Instant>>>,
    clock: Arc<C>,
}

impl<C: Clock> Clone for CircuitBreaker<C> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            state: Arc::clone(&self.state),
            consecutive_failures: Arc::clone(&self.consecutive_failures),
            opened_at: Arc::clone(&self.opened_at),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C: Clock> fmt::Debug for CircuitBreaker<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("config", &self.config)
            .field("state", &self.state())
            .field("consecutive_failures", &self.consecutive_failures.load(Ordering::Acquire))
            .finish()
    }
}

impl CircuitBreaker<SystemClock> {
    /// Create a breaker with the given configuration and the system clock.
    pub fn new(config: CircuitBreakerConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> CircuitBreaker<C> {
    /// Create a breaker with a custom clock (used by deterministic tests).
    pub fn with_clock(config: CircuitBreakerConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: Arc::new(RwLock::new(CircuitState::Closed)),
            consecutive_failures: Arc::new(AtomicU64::new(0)),
            opened_at: Arc::new(RwLock::new(None)),
            clock: Arc::new(clock),
        })
    }

    /// Whether a call may proceed, transitioning Open -> HalfOpen when the
    /// cool-down has elapsed.
    pub fn can_execute(&self) -> bool {
        match self.state() {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open => {
                let opened_at = match self.opened_at.read() {
                    Ok(guard) => *guard,
                    Err(poisoned) => *poisoned.into_inner(),
                };
                if let Some(opened) = opened_at {
                    if self.clock.now().duration_since(opened) >= self.config.cooldown {
                        self.set_state(CircuitState::HalfOpen);
                        debug!("circuit cool-down elapsed, admitting trial call");
                        return true;
                    }
                }
                false
            }
        }
    }

    /// Execute an operation with circuit breaker protection.
    ///
    /// Every failure counts toward opening the circuit; see
    /// [`Self::execute_classified`] when some errors must not.
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, ResilienceError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.execute_classified(operation, |_| true).await
    }

    /// Execute an operation, counting only failures the classifier accepts.
    ///
    /// A rejected failure is surfaced to the caller but leaves breaker state
    /// untouched: the consecutive-failure streak keeps its value and a
    /// half-open trial stays undecided, so the next call is admitted again.
    ///
    /// The half-open trial is decided by the first caller to observe the
    /// elapsed cool-down; its (counted) outcome closes or re-opens the
    /// circuit.
    pub async fn execute_classified<F, Fut, T, E, G>(
        &self,
        operation: F,
        counts_toward_opening: G,
    ) -> Result<T, ResilienceError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::error::Error + Send + Sync + 'static,
        G: Fn(&E) -> bool,
    {
        if !self.can_execute() {
            debug!(state = %self.state(), "circuit breaker rejecting call");
            return Err(ResilienceError::CircuitOpen);
        }

        match operation().await {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(error) => {
                if counts_toward_opening(&error) {
                    self.record_failure();
                } else {
                    debug!("failure not counted toward opening the circuit");
                }
                Err(ResilienceError::OperationFailed { source: error })
            }
        }
    }

    /// Record a successful call: closes a half-open circuit, resets the
    /// consecutive-failure counter.
    pub fn record_success(&self) {
        let state = self.state();
        self.consecutive_failures.store(0, Ordering::Release);
        if state == CircuitState::HalfOpen {
            self.set_state(CircuitState::Closed);
            self.set_opened_at(None);
            info!("circuit breaker closed after successful trial call");
        }
    }

    /// Record a failed call, opening the circuit when the consecutive
    /// failure threshold is reached or the half-open trial fails.
    pub fn record_failure(&self) {
        let failures = self.consecutive_failures.fetch_add(1, Ordering::AcqRel) + 1;
        match self.state() {
            CircuitState::Closed => {
                if failures >= self.config.failure_threshold {
                    self.trip();
                    warn!(failures, "circuit breaker opened");
                }
            }
            CircuitState::HalfOpen => {
                self.trip();
                warn!("circuit breaker re-opened after failed trial call");
            }
            CircuitState::Open => {}
        }
    }

    /// Current state of the circuit.
    pub fn state(&self) -> CircuitState {
        match self.state.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn trip(&self) {
        self.set_state(CircuitState::Open);
        self.set_opened_at(Some(self.clock.now()));
    }

    fn set_state(&self, new_state: CircuitState) {
        match self.state.write() {
            Ok(mut guard) => *guard = new_state,
            Err(poisoned) => *poisoned.into_inner() = new_state,
        }
    }

    fn set_opened_at(&self, value: Option<Instant>) {
        match self.opened_at.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU32;

    use super::super::clock::MockClock;
    use super::*;

    fn breaker(threshold: u64, cooldown: Duration) -> (CircuitBreaker<MockClock>, MockClock) {
        let clock = MockClock::new();
        let cb = CircuitBreaker::with_clock(
            CircuitBreakerConfig::new(threshold, cooldown),
            clock.clone(),
        )
        .expect("valid config");
        (cb, clock)
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let result = CircuitBreaker::new(CircuitBreakerConfig::new(0, Duration::from_secs(30)));
        assert!(result.is_err());
    }

    #[test]
    fn test_stays_closed_below_threshold() {
        let (cb, _clock) = breaker(5, Duration::from_secs(30));
        for _ in 0..4 {
            cb.record_failure();
        }
        assert_eq!(cb.state(), CircuitState::Closed);
        assert!(cb.can_execute());
    }

    #[test]
    fn test_opens_at_threshold_and_fails_fast() {
        let (cb, _clock) = breaker(5, Duration::from_secs(30));
        for _ in 0..5 {
            cb.record_failure();
        }
        assert_eq!(cb.state(), CircuitState::Open);
        assert!(!cb.can_execute());
    }

    #[test]
    fn test_success_resets_consecutive_failures() {
        let (cb, _clock) = breaker(3, Duration::from_secs(30));
        cb.record_failure();
        cb.record_failure();
        cb.record_success();
        cb.record_failure();
        cb.record_failure();
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[test]
    fn test_half_open_after_cooldown_then_closes_on_success() {
        let (cb, clock) = breaker(1, Duration::from_secs(30));
        cb.record_failure();
        assert_eq!(cb.state(), CircuitState::Open);

        clock.advance(Duration::from_secs(29));
        assert!(!cb.can_execute());

        clock.advance(Duration::from_secs(1));
        assert!(cb.can_execute());
        assert_eq!(cb.state(), CircuitState::HalfOpen);

        cb.record_success();
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[test]
    fn test_failed_trial_reopens_and_restarts_cooldown() {
        let (cb, clock) = breaker(1, Duration::from_secs(30));
        cb.record_failure();
        clock.advance(Duration::from_secs(31));
        assert!(cb.can_execute());

        cb.record_failure();
        assert_eq!(cb.state(), CircuitState::Open);

        // Cool-down timer restarted at the trial failure
        clock.advance(Duration::from_secs(29));
        assert!(!cb.can_execute());
        clock.advance(Duration::from_secs(2));
        assert!(cb.can_execute());
    }

    #[tokio::test]
    async fn test_execute_passes_through_success() {
        let (cb, _clock) = breaker(5, Duration::from_secs(30));
        let result = cb.execute(|| async { Ok::<_, std::io::Error>(42) }).await;
        assert_eq!(result.ok(), Some(42));
    }

    #[tokio::test]
    async fn test_execute_rejects_without_running_operation_when_open() {
        let (cb, _clock) = breaker(1, Duration::from_secs(30));
        cb.record_failure();

        let ran = Arc::new(AtomicU32::new(0));
        let ran_clone = Arc::clone(&ran);
        let result = cb
            .execute(|| async move {
                ran_clone.fetch_add(1, Ordering::SeqCst);
                Ok::<_, std::io::Error>(())
            })
            .await;

        assert!(matches!(result, Err(ResilienceError::CircuitOpen)));
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_execute_counts_failures() {
        let (cb, _clock) = breaker(2, Duration::from_secs(30));
        for _ in 0..2 {
            let result = cb
                .execute(|| async { Err::<(), _>(std::io::Error::other("boom")) })
                .await;
            assert!(matches!(result, Err(ResilienceError::OperationFailed { .. })));
        }
        assert_eq!(cb.state(), CircuitState::Open);
    }

    #[tokio::test]
    async fn test_unclassified_failures_never_open_the_circuit() {
        let (cb, _clock) = breaker(2, Duration::from_secs(30));
        for _ in 0..5 {
            let result = cb
                .execute_classified(
                    || async { Err::<(), _>(std::io::Error::other("caller fault")) },
                    |_| false,
                )
                .await;
            assert!(matches!(result, Err(ResilienceError::OperationFailed { .. })));
        }
        assert_eq!(cb.state(), CircuitState::Closed);
        assert!(cb.can_execute());
    }

    #[tokio::test]
    async fn test_unclassified_failure_keeps_failure_streak() {
        let (cb, _clock) = breaker(2, Duration::from_secs(30));
        cb.record_failure();

        let _ = cb
            .execute_classified(
                || async { Err::<(), _>(std::io::Error::other("caller fault")) },
                |_| false,
            )
            .await;

        // Neither counted as failure nor as a resetting success
        cb.record_failure();
        assert_eq!(cb.state(), CircuitState::Open);
    }

    #[tokio::test]
    async fn test_unclassified_failure_leaves_half_open_trial_undecided() {
        let (cb, clock) = breaker(1, Duration::from_secs(30));
        cb.record_failure();
        clock.advance(Duration::from_secs(31));
        assert!(cb.can_execute());
        assert_eq!(cb.state(), CircuitState::HalfOpen);

        let _ = cb
            .execute_classified(
                || async { Err::<(), _>(std::io::Error::other("caller fault")) },
                |_| false,
            )
            .await;

        assert_eq!(cb.state(), CircuitState::HalfOpen);
        assert!(cb.can_execute());
    }

    #[tokio::test]
    async fn test_concurrent_failure_recording() {
        let (cb, _clock) = breaker(100, Duration::from_secs(30));
        let cb = Arc::new(cb);
        let mut handles = Vec::new();
        for _ in 0..10 {
            let cb = Arc::clone(&cb);
            handles.push(tokio::spawn(async move { cb.record_failure() }));
        }
        for handle in handles {
            handle.await.expect("task");
        }
        assert_eq!(cb.consecutive_failures.load(Ordering::Acquire), 10);
    }
}
