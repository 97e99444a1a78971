//! Screening API client

mod client;
mod types;

pub use client::ScreeningClient;
