//! # Procura Domain
//!
//! Business domain types and models for Procura.
//!
//! This crate contains:
//! - Supplier master-data types
//! - Screening request/result types
//! - Domain error types and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other Procura crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::{Config, IdentityConfig, ScreeningConfig};
pub use errors::{AuthError, ProcuraError, Result, ScreeningError};
pub use types::screening::{
    Hit, ScreeningReport, ScreeningRequest, ScreeningResult, ScreeningSource,
};
pub use types::supplier::{NewSupplier, Supplier, SupplierStatus, SupplierUpdate};
