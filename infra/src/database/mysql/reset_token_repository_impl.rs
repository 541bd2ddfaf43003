//! MySQL implementation of the ResetTokenStore trait.
//!
//! Single use is enforced by one conditional `UPDATE` whose affected-row
//! count decides the winner. Used rows stay until they expire and are swept.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use tl_core::domain::entities::ResetToken;
use tl_core::errors::DomainError;
use tl_core::repositories::ResetTokenStore;
use tracing::info;
use uuid::Uuid;

use crate::database::DatabasePool;
use crate::{bounded, InfrastructureError};

use super::schema::CREATE_PASSWORD_RESET_TOKENS;

const MARK_USED: &str = r#"
    UPDATE password_reset_tokens
    SET used = TRUE
    WHERE token = ? AND used = FALSE AND expires_at > ?
"#;

/// Durable reset token store
#[derive(Clone)]
pub struct MySqlResetTokenStore {
    /// Database connection pool
    pool: MySqlPool,
    /// Upper bound for every statement or transaction
    timeout: Duration,
}

impl MySqlResetTokenStore {
    /// Create a new MySQL reset token store
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    /// * `timeout` - Upper bound for every statement or transaction
    pub fn new(pool: MySqlPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    pub fn from_pool(pool: &DatabasePool) -> Self {
        Self::new(pool.get_pool().clone(), pool.operation_timeout())
    }

    /// Create the `password_reset_tokens` table if it does not exist
    pub async fn ensure_schema(&self) -> Result<(), InfrastructureError> {
        bounded("reset.ensure_schema", self.timeout, async {
            sqlx::query(CREATE_PASSWORD_RESET_TOKENS)
                .execute(&self.pool)
                .await?;
            Ok(())
        })
        .await
    }

    fn parse_user_id(raw: &str) -> Result<Uuid, InfrastructureError> {
        Uuid::parse_str(raw)
            .map_err(|e| InfrastructureError::Corrupt(format!("Invalid user UUID: {}", e)))
    }

    fn row_to_token(token: &str, row: &sqlx::mysql::MySqlRow) -> Result<ResetToken, InfrastructureError> {
        let user_id: String = row.try_get("user_id")?;

        Ok(ResetToken {
            token: token.to_string(),
            user_id: Self::parse_user_id(&user_id)?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            expires_at: row.try_get::<DateTime<Utc>, _>("expires_at")?,
            used: row.try_get("used")?,
        })
    }
}

#[async_trait]
impl ResetTokenStore for MySqlResetTokenStore {
    async fn insert(&self, token: &ResetToken) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO password_reset_tokens (
                token, user_id, expires_at, used, created_at
            ) VALUES (?, ?, ?, ?, ?)
        "#;

        bounded("reset.insert", self.timeout, async {
            sqlx::query(query)
                .bind(&token.token)
                .bind(token.user_id.to_string())
                .bind(token.expires_at)
                .bind(token.used)
                .bind(token.created_at)
                .execute(&self.pool)
                .await?;
            Ok(())
        })
        .await?;
        Ok(())
    }

    async fn lookup(&self, token: &str) -> Result<Option<ResetToken>, DomainError> {
        let query = r#"
            SELECT user_id, created_at, expires_at, used
            FROM password_reset_tokens
            WHERE token = ? AND expires_at > ?
            LIMIT 1
        "#;

        let found = bounded("reset.lookup", self.timeout, async {
            let row = sqlx::query(query)
                .bind(token)
                .bind(Utc::now())
                .fetch_optional(&self.pool)
                .await?;
            row.map(|row| Self::row_to_token(token, &row)).transpose()
        })
        .await?;

        Ok(found)
    }

    async fn mark_used_if_unused(&self, token: &str) -> Result<bool, DomainError> {
        let updated = bounded("reset.mark_used", self.timeout, async {
            Ok(sqlx::query(MARK_USED)
                .bind(token)
                .bind(Utc::now())
                .execute(&self.pool)
                .await?
                .rows_affected())
        })
        .await?;

        Ok(updated == 1)
    }

    async fn consume(&self, token: &str) -> Result<Option<Uuid>, DomainError> {
        // The UPDATE holds the row lock until commit, so the owner read and
        // any concurrent sweep see a consistent row.
        let owner = bounded("reset.consume", self.timeout, async {
            let mut tx = self.pool.begin().await?;

            let updated = sqlx::query(MARK_USED)
                .bind(token)
                .bind(Utc::now())
                .execute(&mut *tx)
                .await?
                .rows_affected();

            if updated != 1 {
                tx.rollback().await?;
                return Ok(None);
            }

            let user_id = sqlx::query_scalar::<_, String>(
                "SELECT user_id FROM password_reset_tokens WHERE token = ?",
            )
            .bind(token)
            .fetch_one(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok::<Option<String>, InfrastructureError>(Some(user_id))
        })
        .await?;

        Ok(owner.as_deref().map(Self::parse_user_id).transpose()?)
    }

    async fn sweep(&self) -> Result<u64, DomainError> {
        let query = "DELETE FROM password_reset_tokens WHERE expires_at <= ?";

        let deleted = bounded("reset.sweep", self.timeout, async {
            Ok(sqlx::query(query)
                .bind(Utc::now())
                .execute(&self.pool)
                .await?
                .rows_affected())
        })
        .await?;

        if deleted > 0 {
            info!(deleted, "Swept expired reset tokens");
        }
        Ok(deleted)
    }
}
