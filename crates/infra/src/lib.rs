//! # Procura Infrastructure
//!
//! Outbound adapters and platform plumbing:
//! - HTTP client wrapper around reqwest
//! - OAuth client-credentials token provider
//! - Screening API client with retry and circuit breaking
//! - In-memory supplier store
//! - Configuration loading and tracing setup
//!
//! Everything here implements ports defined in `procura-core` and speaks the
//! error taxonomy from `procura-domain`.

pub mod auth;
pub mod config;
pub mod http;
pub mod observability;
pub mod screening;
pub mod suppliers;

pub use auth::{AccessTokenProvider, IdentityTokenProvider};
pub use http::HttpClient;
pub use observability::init_tracing;
pub use screening::ScreeningClient;
pub use suppliers::InMemorySupplierStore;
