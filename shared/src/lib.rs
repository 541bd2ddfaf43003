//! Shared configuration and utilities for Tokenline
//!
//! This crate provides common functionality used across the workspace:
//! - Configuration types for signing keys, stores and the sweep scheduler
//! - Log redaction helpers for credentials

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, DatabaseConfig, Environment, JwtConfig, LoggingConfig,
    ResetTokenConfig, StoreBackend, StoreConfig, SweepConfig,
};
pub use utils::redact;
