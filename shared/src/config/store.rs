//! Token store backend selection and sweep scheduling

use serde::{Deserialize, Serialize};

use super::env_or;

/// Which backend holds revocation entries and reset tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Redis, entries expire natively through key TTLs
    #[default]
    Ephemeral,
    /// MySQL, expired rows must be swept periodically
    Durable,
    /// In-process maps, for single-node development setups
    Memory,
}

impl StoreBackend {
    /// Whether this backend needs the sweep scheduler to stay bounded
    pub fn requires_sweep(&self) -> bool {
        matches!(self, StoreBackend::Durable)
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Ephemeral => write!(f, "ephemeral"),
            StoreBackend::Durable => write!(f, "durable"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ephemeral" | "redis" => Ok(StoreBackend::Ephemeral),
            "durable" | "mysql" | "database" => Ok(StoreBackend::Durable),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid token store backend: {}", s)),
        }
    }
}

/// Token store configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Backend used for both revocation entries and reset tokens
    pub backend: StoreBackend,
}

impl StoreConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            backend: env_or("TOKEN_STORE_BACKEND", StoreBackend::default()),
        }
    }
}

/// Periodic sweep configuration for the durable backend
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SweepConfig {
    /// Whether to run the sweep scheduler
    pub enabled: bool,

    /// How often to sweep, in seconds
    pub interval_seconds: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 3600,
        }
    }
}

impl SweepConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_or("TOKEN_SWEEP_ENABLED", defaults.enabled),
            interval_seconds: env_or("TOKEN_SWEEP_INTERVAL", defaults.interval_seconds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("redis".parse::<StoreBackend>(), Ok(StoreBackend::Ephemeral));
        assert_eq!("MySQL".parse::<StoreBackend>(), Ok(StoreBackend::Durable));
        assert_eq!("memory".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("sqlite".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_only_durable_requires_sweep() {
        assert!(StoreBackend::Durable.requires_sweep());
        assert!(!StoreBackend::Ephemeral.requires_sweep());
        assert!(!StoreBackend::Memory.requires_sweep());
    }
}
