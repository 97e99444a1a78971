//! Domain data types

pub mod screening;
pub mod supplier;
