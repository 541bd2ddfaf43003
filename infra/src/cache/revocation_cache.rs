//! Redis-backed revocation store
//!
//! Key pattern: `{prefix}:revoked:{sha256(token)}`, holding the token's
//! expiry as a Unix timestamp, with a TTL that ends at that expiry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tl_core::errors::DomainError;
use tl_core::repositories::RevocationStore;
use tracing::debug;

use crate::cache::RedisClient;

const NAMESPACE: &str = "revoked";

/// Ephemeral revocation store on Redis key TTLs
#[derive(Clone)]
pub struct RedisRevocationStore {
    redis_client: RedisClient,
}

impl RedisRevocationStore {
    pub fn new(redis_client: RedisClient) -> Self {
        Self { redis_client }
    }

    fn key(&self, token_hash: &str) -> String {
        self.redis_client.make_key(NAMESPACE, token_hash)
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn add(&self, token_hash: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        let ttl_ms = (expires_at - Utc::now()).num_milliseconds();
        if ttl_ms <= 0 {
            debug!("Skipping revocation entry for expired token");
            return Ok(());
        }

        self.redis_client
            .set_with_expiry_ms(
                &self.key(token_hash),
                &expires_at.timestamp().to_string(),
                ttl_ms as u64,
            )
            .await?;
        Ok(())
    }

    async fn contains(&self, token_hash: &str) -> Result<bool, DomainError> {
        Ok(self.redis_client.exists(&self.key(token_hash)).await?)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.redis_client.count_matching(&self.key("*")).await?)
    }

    async fn sweep(&self) -> Result<u64, DomainError> {
        Ok(0)
    }
}
