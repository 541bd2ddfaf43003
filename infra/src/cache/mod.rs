//! Cache module for the Redis-backed token stores
//!
//! Both stores rely on native key expiry, so neither needs a sweep.

pub mod redis_client;
pub mod reset_token_cache;
pub mod revocation_cache;

#[cfg(test)]
mod tests;

pub use redis_client::RedisClient;
pub use reset_token_cache::RedisResetTokenStore;
pub use revocation_cache::RedisRevocationStore;

// Re-export commonly used types
pub use tl_shared::config::CacheConfig;
