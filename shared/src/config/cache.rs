//! Cache configuration module

use serde::{Deserialize, Serialize};

use super::env_or;

/// Redis configuration for the ephemeral token stores
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Prefix prepended to every key written by the stores
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Upper bound for a single Redis round trip in milliseconds
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_ms: u64,

    /// Connection attempts before giving up at startup
    #[serde(default = "default_connect_retries")]
    pub connect_retries: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            key_prefix: default_key_prefix(),
            operation_timeout_ms: default_operation_timeout(),
            connect_retries: default_connect_retries(),
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("REDIS_URL").unwrap_or(defaults.url),
            key_prefix: std::env::var("REDIS_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            operation_timeout_ms: env_or("REDIS_OPERATION_TIMEOUT_MS", defaults.operation_timeout_ms),
            connect_retries: env_or("REDIS_CONNECT_RETRIES", defaults.connect_retries),
        }
    }

    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the key prefix for all cache keys
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Generate a cache key with prefix
    pub fn make_key(&self, namespace: &str, key: &str) -> String {
        format!("{}:{}:{}", self.key_prefix, namespace, key)
    }
}

fn default_key_prefix() -> String {
    String::from("tokenline")
}

fn default_operation_timeout() -> u64 {
    3000
}

fn default_connect_retries() -> u32 {
    3
}
