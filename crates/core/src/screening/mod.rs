//! Screening orchestration: validation, supplier resolution, gateway call,
//! and risk derivation.

pub mod ports;
pub mod service;

pub use ports::{ScreeningGateway, SupplierStore};
pub use service::{validate_sources, ScreeningRunError, ScreeningService};
