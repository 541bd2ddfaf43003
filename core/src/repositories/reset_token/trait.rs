//! Reset token store trait for single-use password reset tokens.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use uuid::Uuid;

use crate::domain::entities::reset_token::ResetToken;
use crate::errors::DomainError;

/// Storage for opaque password reset tokens
///
/// A token maps to a user ID, an expiry and a used flag. Expired tokens must
/// never be returned by [`lookup`](ResetTokenStore::lookup) and must never be
/// consumable.
///
/// # Atomicity
/// [`mark_used_if_unused`](ResetTokenStore::mark_used_if_unused) and
/// [`consume`](ResetTokenStore::consume) are the serialization point of the
/// reset flow. Each must be a single atomic backend operation (key delete,
/// conditional `UPDATE`), never a read followed by a separate write.
///
/// # Backends
/// - Ephemeral (Redis, [`MemoryResetTokenStore`](super::MemoryResetTokenStore)):
///   no native used flag; consumption deletes the key.
/// - Durable (MySQL, [`MemoryResetTokenTable`](super::MemoryResetTokenTable)):
///   a `used` column flipped by a conditional update; expired rows are swept.
#[async_trait]
pub trait ResetTokenStore: Send + Sync {
    /// Persist a freshly issued token until its `expires_at`
    async fn insert(&self, token: &ResetToken) -> Result<(), DomainError>;

    /// Issue a token for `user_id` valid for `ttl` and persist it
    ///
    /// # Returns
    /// * `Ok(String)` - The opaque token to hand to the user
    /// * `Err(DomainError::Validation)` - `ttl` is not positive
    /// * `Err(DomainError::Unavailable)` - Backend timeout or connectivity failure
    async fn create(&self, user_id: Uuid, ttl: Duration) -> Result<String, DomainError> {
        if ttl <= Duration::zero() {
            return Err(DomainError::Validation {
                message: "Reset token TTL must be positive".to_string(),
            });
        }

        let token = ResetToken::issue(user_id, ttl);
        self.insert(&token).await?;
        Ok(token.token)
    }

    /// Find an unexpired token
    ///
    /// # Returns
    /// * `Ok(Some(ResetToken))` - Token exists and has not expired (it may be used)
    /// * `Ok(None)` - Unknown or expired
    async fn lookup(&self, token: &str) -> Result<Option<ResetToken>, DomainError>;

    /// Atomically transition an unexpired token from unused to used
    ///
    /// # Returns
    /// * `Ok(true)` - This call performed the transition
    /// * `Ok(false)` - Unknown, expired or already used
    async fn mark_used_if_unused(&self, token: &str) -> Result<bool, DomainError>;

    /// Atomically mark a token used and return its owner
    ///
    /// Same transition as [`mark_used_if_unused`](ResetTokenStore::mark_used_if_unused),
    /// but the winning caller also learns the user ID in the same step.
    ///
    /// # Returns
    /// * `Ok(Some(Uuid))` - This call consumed the token
    /// * `Ok(None)` - Unknown, expired or already used
    async fn consume(&self, token: &str) -> Result<Option<Uuid>, DomainError>;

    /// Delete tokens whose expiry has passed
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of tokens removed (always 0 for TTL-native backends)
    async fn sweep(&self) -> Result<u64, DomainError>;
}

#[async_trait]
impl<T: ResetTokenStore + ?Sized> ResetTokenStore for Arc<T> {
    async fn insert(&self, token: &ResetToken) -> Result<(), DomainError> {
        (**self).insert(token).await
    }

    async fn create(&self, user_id: Uuid, ttl: Duration) -> Result<String, DomainError> {
        (**self).create(user_id, ttl).await
    }

    async fn lookup(&self, token: &str) -> Result<Option<ResetToken>, DomainError> {
        (**self).lookup(token).await
    }

    async fn mark_used_if_unused(&self, token: &str) -> Result<bool, DomainError> {
        (**self).mark_used_if_unused(token).await
    }

    async fn consume(&self, token: &str) -> Result<Option<Uuid>, DomainError> {
        (**self).consume(token).await
    }

    async fn sweep(&self) -> Result<u64, DomainError> {
        (**self).sweep().await
    }
}
