//! Identity-provider integration

mod token_provider;

pub use token_provider::{AccessTokenProvider, IdentityTokenProvider};
