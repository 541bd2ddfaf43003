//! Revocation store trait for server-side logout of session tokens.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::DomainError;

/// Storage for revoked session token hashes
///
/// Keys are the SHA-256 hex digest of the full token string, never the token
/// itself. The value is the token's natural expiry; once it has passed the
/// entry must be invisible to [`contains`](RevocationStore::contains), no
/// matter whether the backend reclaims it natively or through a sweep.
///
/// Implementations must be safe for concurrent callers without external
/// locking. `add` is idempotent and commutative.
///
/// # Backends
/// - Ephemeral (Redis, [`MemoryRevocationStore`](super::MemoryRevocationStore)):
///   entries carry a TTL and vanish on their own; `sweep` is a no-op.
/// - Durable (MySQL, [`MemoryRevocationTable`](super::MemoryRevocationTable)):
///   rows stay until [`sweep`](RevocationStore::sweep) deletes them.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Record a revoked token hash until `expires_at`
    ///
    /// Insert-or-touch. If `expires_at` is not in the future the call is a
    /// no-op: the token can no longer be used anyway.
    ///
    /// # Returns
    /// * `Ok(())` - Entry recorded (or nothing to record)
    /// * `Err(DomainError::Unavailable)` - Backend timeout or connectivity failure
    async fn add(&self, token_hash: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Check whether an unexpired entry exists for `token_hash`
    async fn contains(&self, token_hash: &str) -> Result<bool, DomainError>;

    /// Number of live (unexpired) entries
    async fn count(&self) -> Result<u64, DomainError>;

    /// Reclaim expired entries
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of entries removed (always 0 for TTL-native backends)
    async fn sweep(&self) -> Result<u64, DomainError>;
}

#[async_trait]
impl<T: RevocationStore + ?Sized> RevocationStore for Arc<T> {
    async fn add(&self, token_hash: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        (**self).add(token_hash, expires_at).await
    }

    async fn contains(&self, token_hash: &str) -> Result<bool, DomainError> {
        (**self).contains(token_hash).await
    }

    async fn count(&self) -> Result<u64, DomainError> {
        (**self).count().await
    }

    async fn sweep(&self) -> Result<u64, DomainError> {
        (**self).sweep().await
    }
}
