//! MySQL implementation of the RevocationStore trait.
//!
//! Rows are keyed by token hash and carry the token's natural expiry. They
//! stay in the table after expiry, so every read filters on `expires_at`
//! and [`sweep`](RevocationStore::sweep) must run periodically.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use tl_core::errors::DomainError;
use tl_core::repositories::RevocationStore;
use tracing::{debug, info};

use crate::database::DatabasePool;
use crate::{bounded, InfrastructureError};

use super::schema::CREATE_REVOKED_TOKENS;

/// Durable revocation store
#[derive(Clone)]
pub struct MySqlRevocationStore {
    /// Database connection pool
    pool: MySqlPool,
    /// Upper bound for every statement
    timeout: Duration,
}

impl MySqlRevocationStore {
    /// Create a new MySQL revocation store
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    /// * `timeout` - Upper bound for every statement
    pub fn new(pool: MySqlPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    pub fn from_pool(pool: &DatabasePool) -> Self {
        Self::new(pool.get_pool().clone(), pool.operation_timeout())
    }

    /// Create the `revoked_tokens` table if it does not exist
    pub async fn ensure_schema(&self) -> Result<(), InfrastructureError> {
        bounded("revocation.ensure_schema", self.timeout, async {
            sqlx::query(CREATE_REVOKED_TOKENS).execute(&self.pool).await?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl RevocationStore for MySqlRevocationStore {
    async fn add(&self, token_hash: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        if expires_at <= Utc::now() {
            debug!("Skipping revocation row for expired token");
            return Ok(());
        }

        let query = r#"
            INSERT INTO revoked_tokens (token_hash, expires_at)
            VALUES (?, ?)
            ON DUPLICATE KEY UPDATE expires_at = VALUES(expires_at)
        "#;

        bounded("revocation.add", self.timeout, async {
            sqlx::query(query)
                .bind(token_hash)
                .bind(expires_at)
                .execute(&self.pool)
                .await?;
            Ok(())
        })
        .await?;
        Ok(())
    }

    async fn contains(&self, token_hash: &str) -> Result<bool, DomainError> {
        let query = r#"
            SELECT COUNT(*)
            FROM revoked_tokens
            WHERE token_hash = ? AND expires_at > ?
        "#;

        let matches: i64 = bounded("revocation.contains", self.timeout, async {
            Ok(sqlx::query_scalar::<_, i64>(query)
                .bind(token_hash)
                .bind(Utc::now())
                .fetch_one(&self.pool)
                .await?)
        })
        .await?;

        Ok(matches > 0)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let query = "SELECT COUNT(*) FROM revoked_tokens WHERE expires_at > ?";

        let live: i64 = bounded("revocation.count", self.timeout, async {
            Ok(sqlx::query_scalar::<_, i64>(query)
                .bind(Utc::now())
                .fetch_one(&self.pool)
                .await?)
        })
        .await?;

        Ok(live.max(0) as u64)
    }

    async fn sweep(&self) -> Result<u64, DomainError> {
        let query = "DELETE FROM revoked_tokens WHERE expires_at <= ?";

        let deleted = bounded("revocation.sweep", self.timeout, async {
            Ok(sqlx::query(query)
                .bind(Utc::now())
                .execute(&self.pool)
                .await?
                .rows_affected())
        })
        .await?;

        if deleted > 0 {
            info!(deleted, "Swept expired revocation rows");
        }
        Ok(deleted)
    }
}
