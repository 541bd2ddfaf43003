//! Password reset token service

use tl_shared::redact::fingerprint;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::{DomainError, TokenError};
use crate::repositories::{ResetTokenStore, UserRepository};

use super::config::PasswordResetConfig;

/// Service for issuing and consuming password reset tokens
///
/// Consumption is a single store operation with no separate validate
/// step. Callers perform the password change only after
/// [`validate_and_consume`](Self::validate_and_consume) succeeds, and a
/// consumed token stays spent even if that change fails.
pub struct PasswordResetTokenService<S: ResetTokenStore> {
    store: S,
    config: PasswordResetConfig,
}

impl<S: ResetTokenStore> PasswordResetTokenService<S> {
    /// Creates a service issuing tokens with `config.token_ttl`
    pub fn new(store: S, config: PasswordResetConfig) -> Self {
        Self { store, config }
    }

    /// Reset token store backing this service
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Issues a fresh reset token for `user_id`
    ///
    /// Earlier tokens for the same user are left alone; expiry and
    /// single-use consumption bound their lifetime.
    ///
    /// # Returns
    /// * `Ok(String)` - URL-safe token to deliver to the user
    /// * `Err(DomainError::Unavailable)` - The store could not be reached
    pub async fn issue_reset_token(&self, user_id: Uuid) -> Result<String, DomainError> {
        let token = self.store.create(user_id, self.config.token_ttl).await?;

        info!(
            user_id = %user_id,
            token = %fingerprint(&token),
            ttl_seconds = self.config.token_ttl.num_seconds(),
            "Issued password reset token"
        );
        Ok(token)
    }

    /// Atomically consumes `token` and returns its owner
    ///
    /// Of any number of concurrent calls with the same token, at most one
    /// succeeds.
    ///
    /// # Returns
    /// * `Ok(Uuid)` - This call consumed the token
    /// * `Err(TokenError::InvalidOrExpiredToken)` - Unknown, expired or already used
    /// * `Err(DomainError::Unavailable)` - Outcome unknown, the store could not answer
    pub async fn validate_and_consume(&self, token: &str) -> Result<Uuid, DomainError> {
        if token.is_empty() {
            return Err(TokenError::InvalidOrExpiredToken.into());
        }

        match self.store.consume(token).await? {
            Some(user_id) => {
                info!(user_id = %user_id, token = %fingerprint(token), "Consumed password reset token");
                Ok(user_id)
            }
            None => {
                debug!(token = %fingerprint(token), "Rejected reset token");
                Err(TokenError::InvalidOrExpiredToken.into())
            }
        }
    }

    /// Consumes `token` and resolves the account it belongs to
    ///
    /// The token is spent before the lookup; if the account is gone the
    /// caller gets `NotFound` and the token cannot be retried.
    pub async fn consume_for_user<U>(&self, token: &str, users: &U) -> Result<User, DomainError>
    where
        U: UserRepository + ?Sized,
    {
        let user_id = self.validate_and_consume(token).await?;

        users.find_by_id(user_id).await?.ok_or_else(|| {
            warn!(user_id = %user_id, "Reset token consumed for unknown user");
            DomainError::NotFound {
                resource: "user".to_string(),
            }
        })
    }

    /// Reports the owner of a usable token without consuming it
    ///
    /// Only suitable for display purposes. Never gate a password change on
    /// this; use [`validate_and_consume`](Self::validate_and_consume).
    pub async fn peek(&self, token: &str) -> Result<Uuid, DomainError> {
        match self.store.lookup(token).await? {
            Some(entry) if !entry.used => Ok(entry.user_id),
            _ => Err(TokenError::InvalidOrExpiredToken.into()),
        }
    }

    /// Reclaims expired reset tokens
    pub async fn sweep(&self) -> Result<u64, DomainError> {
        self.store.sweep().await
    }
}
