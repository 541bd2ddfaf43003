//! Session token module
//!
//! This module handles:
//! - Signing and verifying session tokens
//! - Access/refresh pair issuance and refresh
//! - Revocation through a pluggable store
//! - Periodic sweeps of the durable stores

mod cleanup;
mod codec;
mod config;
mod service;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, TokenCleanupConfig, TokenCleanupService};
pub use codec::TokenCodec;
pub use config::TokenServiceConfig;
pub use service::SessionTokenService;
