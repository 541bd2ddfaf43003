//! Configuration module with concern-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Session token signing and password reset token lifetimes
//! - `cache` - Redis connection used by the ephemeral stores
//! - `database` - MySQL connection used by the durable stores
//! - `environment` - Environment detection and logging configuration
//! - `store` - Backend selection and sweep scheduling

pub mod auth;
pub mod cache;
pub mod database;
pub mod environment;
pub mod store;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::{JwtConfig, ResetTokenConfig};
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use store::{StoreBackend, StoreConfig, SweepConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Session token signing configuration
    pub jwt: JwtConfig,

    /// Password reset token configuration
    #[serde(default)]
    pub reset: ResetTokenConfig,

    /// Token store backend selection
    #[serde(default)]
    pub store: StoreConfig,

    /// Redis configuration (ephemeral backend)
    #[serde(default)]
    pub cache: CacheConfig,

    /// MySQL configuration (durable backend)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Sweep scheduler configuration
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            jwt: JwtConfig::default(),
            reset: ResetTokenConfig::default(),
            store: StoreConfig::default(),
            cache: CacheConfig::default(),
            database: DatabaseConfig::default(),
            sweep: SweepConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// A `.env` file in the working directory is loaded first when present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();

        Self {
            environment,
            jwt: JwtConfig::from_env(),
            reset: ResetTokenConfig::from_env(),
            store: StoreConfig::from_env(),
            cache: CacheConfig::from_env(),
            database: DatabaseConfig::from_env(),
            sweep: SweepConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }
}

/// Read an environment variable and parse it, falling back to `default`
/// when the variable is missing or malformed.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
