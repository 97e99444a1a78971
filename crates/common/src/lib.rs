//! # Procura Common
//!
//! Reusable building blocks shared across the workspace.
//!
//! This crate contains:
//! - Resilience patterns (retry with exponential backoff, circuit breaker)
//! - A validation framework that collects every violated rule
//!
//! ## Architecture
//! - No dependency on other Procura crates
//! - Generic over caller error types; no I/O of its own

pub mod resilience;
pub mod validation;

pub use resilience::{
    CircuitBreaker, CircuitBreakerConfig, CircuitState, Clock, ConfigError, MockClock,
    ResilienceError, RetryConfig, RetryDecision, RetryError, RetryExecutor, RetryPolicy,
    SystemClock,
};
pub use validation::{FieldViolation, ValidationError};
