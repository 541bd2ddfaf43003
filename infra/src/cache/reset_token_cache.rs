//! Redis-backed reset token store
//!
//! Key pattern: `{prefix}:reset:{token}`, holding a small JSON record with
//! the owner, with a TTL that ends at the token's expiry. There is no used
//! flag: consuming a token deletes its key, and `GETDEL` is the atomic
//! primitive that decides which caller wins.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tl_core::domain::entities::ResetToken;
use tl_core::errors::DomainError;
use tl_core::repositories::ResetTokenStore;
use uuid::Uuid;

use crate::cache::RedisClient;
use crate::InfrastructureError;

const NAMESPACE: &str = "reset";

/// Value stored under a reset token key
#[derive(Debug, Serialize, Deserialize)]
struct StoredResetToken {
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

impl StoredResetToken {
    fn decode(raw: &str) -> Result<Self, InfrastructureError> {
        serde_json::from_str(raw)
            .map_err(|e| InfrastructureError::Corrupt(format!("reset token record: {}", e)))
    }
}

/// Ephemeral reset token store on Redis key TTLs
#[derive(Clone)]
pub struct RedisResetTokenStore {
    redis_client: RedisClient,
}

impl RedisResetTokenStore {
    pub fn new(redis_client: RedisClient) -> Self {
        Self { redis_client }
    }

    fn key(&self, token: &str) -> String {
        self.redis_client.make_key(NAMESPACE, token)
    }
}

#[async_trait]
impl ResetTokenStore for RedisResetTokenStore {
    async fn insert(&self, token: &ResetToken) -> Result<(), DomainError> {
        let ttl_ms = (token.expires_at - Utc::now()).num_milliseconds();
        if ttl_ms <= 0 {
            return Ok(());
        }

        let record = StoredResetToken {
            user_id: token.user_id,
            created_at: token.created_at,
        };
        let value = serde_json::to_string(&record).map_err(|e| DomainError::Internal {
            message: format!("Failed to encode reset token record: {}", e),
        })?;

        self.redis_client
            .set_with_expiry_ms(&self.key(&token.token), &value, ttl_ms as u64)
            .await?;
        Ok(())
    }

    async fn lookup(&self, token: &str) -> Result<Option<ResetToken>, DomainError> {
        let Some((raw, pttl)) = self.redis_client.get_with_ttl_ms(&self.key(token)).await? else {
            return Ok(None);
        };

        let record = StoredResetToken::decode(&raw)?;
        Ok(Some(ResetToken {
            token: token.to_string(),
            user_id: record.user_id,
            created_at: record.created_at,
            expires_at: Utc::now() + Duration::milliseconds(pttl),
            used: false,
        }))
    }

    async fn mark_used_if_unused(&self, token: &str) -> Result<bool, DomainError> {
        Ok(self.redis_client.delete(&self.key(token)).await?)
    }

    async fn consume(&self, token: &str) -> Result<Option<Uuid>, DomainError> {
        match self.redis_client.get_and_delete(&self.key(token)).await? {
            Some(raw) => Ok(Some(StoredResetToken::decode(&raw)?.user_id)),
            None => Ok(None),
        }
    }

    async fn sweep(&self) -> Result<u64, DomainError> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_roundtrip_keeps_owner() {
        let record = StoredResetToken {
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        let raw = serde_json::to_string(&record).unwrap();

        assert_eq!(StoredResetToken::decode(&raw).unwrap().user_id, record.user_id);
    }

    #[test]
    fn test_corrupt_record_is_internal() {
        let err: DomainError = StoredResetToken::decode("not json").unwrap_err().into();
        assert!(matches!(err, DomainError::Internal { .. }));
    }
}
