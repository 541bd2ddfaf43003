//! In-process reset token stores
//!
//! [`MemoryResetTokenStore`] mirrors a TTL key/value store where consuming a
//! token deletes it. [`MemoryResetTokenTable`] mirrors a relational table
//! with a `used` column and an explicit sweep. Every mutation happens under
//! a single write lock, which is what makes consumption atomic here.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::reset_token::ResetToken;
use crate::errors::DomainError;

use super::r#trait::ResetTokenStore;

/// Ephemeral in-memory reset token store
#[derive(Clone, Default)]
pub struct MemoryResetTokenStore {
    tokens: Arc<RwLock<HashMap<String, ResetToken>>>,
}

impl MemoryResetTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn take(&self, token: &str) -> Option<ResetToken> {
        let mut tokens = self.tokens.write().await;
        let entry = tokens.remove(token)?;
        // An expired key would already be gone in a TTL store
        if entry.is_expired() {
            return None;
        }
        Some(entry)
    }
}

#[async_trait]
impl ResetTokenStore for MemoryResetTokenStore {
    async fn insert(&self, token: &ResetToken) -> Result<(), DomainError> {
        let now = Utc::now();
        let mut tokens = self.tokens.write().await;
        tokens.retain(|_, entry| entry.expires_at > now);
        tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn lookup(&self, token: &str) -> Result<Option<ResetToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(token).filter(|entry| !entry.is_expired()).cloned())
    }

    async fn mark_used_if_unused(&self, token: &str) -> Result<bool, DomainError> {
        Ok(self.take(token).await.is_some())
    }

    async fn consume(&self, token: &str) -> Result<Option<Uuid>, DomainError> {
        Ok(self.take(token).await.map(|entry| entry.user_id))
    }

    async fn sweep(&self) -> Result<u64, DomainError> {
        Ok(0)
    }
}

/// Durable-shaped in-memory reset token table
#[derive(Clone, Default)]
pub struct MemoryResetTokenTable {
    rows: Arc<RwLock<HashMap<String, ResetToken>>>,
}

impl MemoryResetTokenTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows, expired and used ones included
    pub async fn row_count(&self) -> usize {
        self.rows.read().await.len()
    }

    async fn flip_used(&self, token: &str) -> Option<Uuid> {
        let now = Utc::now();
        let mut rows = self.rows.write().await;
        // UPDATE ... SET used = TRUE WHERE token = ? AND used = FALSE AND expires_at > now
        match rows.get_mut(token) {
            Some(row) if !row.used && row.expires_at > now => {
                row.used = true;
                Some(row.user_id)
            }
            _ => None,
        }
    }
}

#[async_trait]
impl ResetTokenStore for MemoryResetTokenTable {
    async fn insert(&self, token: &ResetToken) -> Result<(), DomainError> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&token.token) {
            return Err(DomainError::Internal {
                message: "Reset token collision".to_string(),
            });
        }
        rows.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn lookup(&self, token: &str) -> Result<Option<ResetToken>, DomainError> {
        let rows = self.rows.read().await;
        Ok(rows.get(token).filter(|row| !row.is_expired()).cloned())
    }

    async fn mark_used_if_unused(&self, token: &str) -> Result<bool, DomainError> {
        Ok(self.flip_used(token).await.is_some())
    }

    async fn consume(&self, token: &str) -> Result<Option<Uuid>, DomainError> {
        Ok(self.flip_used(token).await)
    }

    async fn sweep(&self) -> Result<u64, DomainError> {
        let now = Utc::now();
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, row| row.expires_at > now);
        Ok((before - rows.len()) as u64)
    }
}
