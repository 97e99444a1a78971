//! # Procura Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for stores and the screening gateway
//! - The screening orchestration service
//! - The supplier CRUD/query service
//!
//! ## Architecture Principles
//! - Only depends on `procura-common` and `procura-domain`
//! - No HTTP or storage code; all external dependencies via traits
//! - Pure, testable business logic

pub mod screening;
pub mod supplier;

// Re-export specific items to avoid ambiguity
pub use screening::ports::{ScreeningGateway, SupplierStore};
pub use screening::service::{validate_sources, ScreeningRunError, ScreeningService};
pub use supplier::ports::SupplierRepository;
pub use supplier::query::{
    matches_search, SortDirection, SupplierPage, SupplierQuery, SupplierSortField,
    UnknownSortField,
};
pub use supplier::service::{SupplierService, SupplierServiceError};
