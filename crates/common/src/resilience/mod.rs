//! Resilience patterns for fault-tolerant outbound calls
//!
//! Two independent, composable policies:
//! - **Retry**: re-attempts a transport call with pure exponential backoff
//!   (no jitter) for errors the caller classifies as retryable.
//! - **Circuit breaker**: counts consecutive failures and fails fast for a
//!   cool-down once a threshold is reached, then admits one trial call.
//!
//! The policies compose in a fixed nesting order: the breaker decides
//! whether a logical call is admitted at all; the retry policy governs
//! re-attempts of the underlying transport call inside an admitted call.
//! `ScreeningClient` in `procura-infra` is the canonical consumer.

mod circuit_breaker;
mod clock;
mod retry;

pub use circuit_breaker::{
    CircuitBreaker, CircuitBreakerConfig, CircuitState, ConfigError, ResilienceError,
};
pub use clock::{Clock, MockClock, SystemClock};
pub use retry::{RetryConfig, RetryDecision, RetryError, RetryExecutor, RetryPolicy};
