//! Configuration structures consumed by the service core
//!
//! Values are loaded by `procura-infra::config::loader` from environment
//! variables or a TOML file; the defaults here match the documented
//! resilience defaults and are never hardcoded elsewhere.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BACKOFF_BASE, DEFAULT_BREAKER_COOLDOWN, DEFAULT_BREAKER_THRESHOLD, DEFAULT_MAX_RETRIES,
    DEFAULT_SCREENING_TIMEOUT,
};

/// Screening API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningConfig {
    /// Base URL of the screening API (e.g. "https://screening.example.com")
    pub base_url: String,
    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum retry count for retryable transport failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay in seconds for exponential backoff (2^attempt scaling)
    #[serde(default = "default_backoff_base_secs")]
    pub backoff_base_secs: u64,
    /// Consecutive failures before the circuit opens
    #[serde(default = "default_breaker_threshold")]
    pub breaker_failure_threshold: u64,
    /// Cool-down in seconds while the circuit stays open
    #[serde(default = "default_breaker_cooldown_secs")]
    pub breaker_cooldown_secs: u64,
}

impl ScreeningConfig {
    /// Build a configuration with defaults for everything but the base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff_base_secs: default_backoff_base_secs(),
            breaker_failure_threshold: default_breaker_threshold(),
            breaker_cooldown_secs: default_breaker_cooldown_secs(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_secs(self.backoff_base_secs)
    }

    pub fn breaker_cooldown(&self) -> Duration {
        Duration::from_secs(self.breaker_cooldown_secs)
    }
}

/// Identity-provider configuration for the client-credentials flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Issuer domain (e.g. "tenant.eu.auth0.com")
    pub domain: String,
    pub client_id: String,
    pub client_secret: String,
    /// Audience the issued token is valid for
    pub audience: String,
}

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub screening: ScreeningConfig,
    pub identity: IdentityConfig,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_SCREENING_TIMEOUT.as_secs()
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_backoff_base_secs() -> u64 {
    DEFAULT_BACKOFF_BASE.as_secs()
}

fn default_breaker_threshold() -> u64 {
    DEFAULT_BREAKER_THRESHOLD
}

fn default_breaker_cooldown_secs() -> u64 {
    DEFAULT_BREAKER_COOLDOWN.as_secs()
}
