//! In-process revocation stores
//!
//! Both shapes of the revocation contract backed by a map, for tests and
//! single-node development setups. [`MemoryRevocationStore`] behaves like a
//! TTL-native key/value store; [`MemoryRevocationTable`] behaves like a
//! relational table that only shrinks when swept.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::errors::DomainError;

use super::r#trait::RevocationStore;

/// Map size above which `add` drops expired entries
const EVICTION_THRESHOLD: usize = 1024;

/// Ephemeral in-memory revocation store
///
/// Entries are invisible once expired and are evicted lazily, so `sweep`
/// has nothing to do.
#[derive(Clone, Default)]
pub struct MemoryRevocationStore {
    entries: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn add(&self, token_hash: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        let now = Utc::now();
        if expires_at <= now {
            return Ok(());
        }

        let mut entries = self.entries.write().await;
        if entries.len() >= EVICTION_THRESHOLD {
            entries.retain(|_, expiry| *expiry > now);
        }
        entries.insert(token_hash.to_string(), expires_at);
        Ok(())
    }

    async fn contains(&self, token_hash: &str) -> Result<bool, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(token_hash)
            .is_some_and(|expiry| *expiry > Utc::now()))
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, expiry| *expiry > now);
        Ok(entries.len() as u64)
    }

    async fn sweep(&self) -> Result<u64, DomainError> {
        Ok(0)
    }
}

/// Durable-shaped in-memory revocation table
///
/// Rows are never removed except by [`sweep`](RevocationStore::sweep), which
/// mirrors `DELETE ... WHERE expires_at <= now`.
#[derive(Clone, Default)]
pub struct MemoryRevocationTable {
    rows: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl MemoryRevocationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows, expired ones included
    pub async fn row_count(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationTable {
    async fn add(&self, token_hash: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        if expires_at <= Utc::now() {
            return Ok(());
        }

        self.rows
            .write()
            .await
            .insert(token_hash.to_string(), expires_at);
        Ok(())
    }

    async fn contains(&self, token_hash: &str) -> Result<bool, DomainError> {
        let rows = self.rows.read().await;
        Ok(rows
            .get(token_hash)
            .is_some_and(|expiry| *expiry > Utc::now()))
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let now = Utc::now();
        let rows = self.rows.read().await;
        Ok(rows.values().filter(|expiry| **expiry > now).count() as u64)
    }

    async fn sweep(&self) -> Result<u64, DomainError> {
        let now = Utc::now();
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, expiry| *expiry > now);
        Ok((before - rows.len()) as u64)
    }
}
