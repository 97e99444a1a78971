//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Procura
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ProcuraError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Procura operations
pub type Result<T> = std::result::Result<T, ProcuraError>;

/// Errors raised while acquiring a bearer token from the identity provider.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Required identity-provider configuration is missing or empty
    #[error("Auth configuration error: {0}")]
    Config(String),

    /// The token endpoint returned a non-success status or an unparsable body
    #[error("Token request failed: {0}")]
    Request(String),
}

/// Errors surfaced by the screening client and the resilience layer around it.
#[derive(Error, Debug)]
pub enum ScreeningError {
    /// Connectivity, timeout, or malformed-response failures
    #[error("Screening transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },

    /// The screening API returned a structured error. A 429 carries the
    /// retry-after hint extracted from the header or error body.
    #[error("Screening API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        retry_after_secs: Option<u64>,
    },

    /// The circuit breaker rejected the call without touching the network
    #[error("Screening circuit is open, calls are failing fast")]
    CircuitOpen,

    /// Token acquisition failed; never retried by the screening policy
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ScreeningError {
    /// Build a transport error from any underlying cause.
    pub fn transport<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport { message: message.into(), source: Some(Box::new(source)) }
    }

    /// Build a transport error without a structured cause.
    pub fn transport_msg(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into(), source: None }
    }

    /// Whether this failure is rate-limit flavored (HTTP 429 upstream).
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Api { status: 429, .. })
    }

    /// Whether the resilience layer should re-attempt the transport call.
    ///
    /// Retryable: transport failures, HTTP 5xx, 408, and 429. Everything
    /// else (other 4xx, auth failures, an open circuit) passes through.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Api { status, .. } => {
                *status >= 500 || *status == 408 || *status == 429
            }
            Self::CircuitOpen | Self::Auth(_) => false,
        }
    }
}
