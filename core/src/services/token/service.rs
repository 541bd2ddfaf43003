//! Session token service: issuance, validation, refresh and revocation

use tl_shared::redact::fingerprint;
use tracing::{debug, info, warn};

use crate::domain::entities::token::{Claims, SessionTokenPair};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, TokenError};
use crate::repositories::{RevocationStore, UserRepository};

use super::codec::TokenCodec;
use super::config::TokenServiceConfig;

/// Service for managing signed session tokens
///
/// Composes a [`TokenCodec`] with a [`RevocationStore`]. The store backend is
/// chosen by the caller at construction time; the service never branches on
/// which one it holds.
pub struct SessionTokenService<S: RevocationStore> {
    codec: TokenCodec,
    store: S,
    config: TokenServiceConfig,
}

impl<S: RevocationStore> SessionTokenService<S> {
    /// Creates a new session token service
    ///
    /// # Arguments
    ///
    /// * `store` - Revocation store backend
    /// * `config` - Signing and lifetime configuration
    ///
    /// # Returns
    ///
    /// A new `SessionTokenService` or `TokenError::SigningFailed` if the key
    /// material is unusable or a lifetime is out of range
    pub fn new(store: S, config: TokenServiceConfig) -> Result<Self, DomainError> {
        config.validate()?;
        let codec = TokenCodec::new(&config)?;
        Ok(Self {
            codec,
            store,
            config,
        })
    }

    /// Codec used to sign and verify tokens
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Revocation store backing this service
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Signing and lifetime configuration
    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Issues an access/refresh pair for `user`
    ///
    /// The access token carries the full identity snapshot; the refresh token
    /// carries only the subject.
    pub fn issue_pair(&self, user: &User) -> Result<SessionTokenPair, DomainError> {
        let access_token = self.issue_access_token(user)?;

        let refresh_claims = Claims::new_refresh_token(
            user.id,
            &self.config.issuer,
            &self.config.audience,
            self.config.refresh_token_ttl,
        );
        let refresh_token = self.codec.issue(&refresh_claims)?;

        debug!(user_id = %user.id, "Issued session token pair");

        Ok(SessionTokenPair::new(
            access_token,
            refresh_token,
            self.config.access_token_expires_in(),
        ))
    }

    /// Issues a standalone access token derived from `user`
    pub fn issue_access_token(&self, user: &User) -> Result<String, DomainError> {
        let claims = Claims::new_access_token(
            user,
            &self.config.issuer,
            &self.config.audience,
            self.config.access_token_ttl,
        );
        Ok(self.codec.issue(&claims)?)
    }

    /// Validates a token and returns its claims
    ///
    /// Revocation is checked before the signature so a revoked token never
    /// yields claims.
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - Token is authentic, unexpired and not revoked
    /// * `Err(DomainError::Token)` - `TokenRevoked`, `TokenExpired`, `MalformedToken` or `InvalidSignature`
    /// * `Err(DomainError::Unavailable)` - The revocation store could not answer
    pub async fn validate(&self, token: &str) -> Result<Claims, DomainError> {
        let token_hash = TokenCodec::hash_token(token);
        if self.store.contains(&token_hash).await? {
            debug!(token = %fingerprint(token), "Rejected revoked token");
            return Err(TokenError::TokenRevoked.into());
        }

        Ok(self.codec.verify(token)?)
    }

    /// Exchanges a refresh token for a new access token
    ///
    /// The new access token is derived from `user`, the current record, never
    /// from the claims of the refresh token.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - New access token
    /// * `Err(TokenError::WrongTokenKind)` - Not a refresh token
    /// * `Err(TokenError::SubjectMismatch)` - Token belongs to another user
    /// * Any error from [`validate`](Self::validate)
    pub async fn refresh(&self, refresh_token: &str, user: &User) -> Result<String, DomainError> {
        let claims = self.validate_refresh_claims(refresh_token).await?;
        self.refresh_from_claims(refresh_token, &claims, user)
    }

    /// Exchanges a refresh token, loading the current user record by subject
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - New access token
    /// * `Err(DomainError::NotFound)` - The subject no longer exists or is deactivated
    pub async fn refresh_with_lookup<U>(
        &self,
        refresh_token: &str,
        users: &U,
    ) -> Result<String, DomainError>
    where
        U: UserRepository + ?Sized,
    {
        let claims = self.validate_refresh_claims(refresh_token).await?;
        let user_id = claims.user_id().map_err(|_| TokenError::MalformedToken)?;

        let user = users
            .find_by_id(user_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| DomainError::NotFound {
                resource: "user".to_string(),
            })?;

        self.refresh_from_claims(refresh_token, &claims, &user)
    }

    /// Revokes a token until its natural expiry
    ///
    /// The signature is verified, expiry is not. Revoking an already expired
    /// token is a no-op.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Token revoked, or nothing to revoke
    /// * `Err(TokenError::MalformedToken)` - Token cannot be parsed
    /// * `Err(TokenError::InvalidSignature)` - Token was not issued with our key
    pub async fn revoke(&self, token: &str) -> Result<(), DomainError> {
        let claims = self.codec.verify_ignoring_expiry(token)?;

        if claims.is_expired() {
            debug!(token = %fingerprint(token), "Skipped revocation of expired token");
            return Ok(());
        }

        let token_hash = TokenCodec::hash_token(token);
        self.store.add(&token_hash, claims.expires_at()).await?;

        info!(
            token = %fingerprint(token),
            kind = %claims.token_type,
            expires_at = %claims.expires_at(),
            "Revoked session token"
        );
        Ok(())
    }

    /// Whether `token` currently has a revocation entry
    pub async fn is_revoked(&self, token: &str) -> Result<bool, DomainError> {
        self.store.contains(&TokenCodec::hash_token(token)).await
    }

    /// Number of live revocation entries
    pub async fn revoked_count(&self) -> Result<u64, DomainError> {
        self.store.count().await
    }

    /// Reclaims expired revocation entries
    pub async fn sweep(&self) -> Result<u64, DomainError> {
        self.store.sweep().await
    }

    fn refresh_from_claims(
        &self,
        refresh_token: &str,
        claims: &Claims,
        user: &User,
    ) -> Result<String, DomainError> {
        let subject = claims.user_id().map_err(|_| TokenError::MalformedToken)?;
        if subject != user.id {
            warn!(
                token = %fingerprint(refresh_token),
                user_id = %user.id,
                "Refresh token subject does not match user"
            );
            return Err(TokenError::SubjectMismatch.into());
        }

        let access_token = self.issue_access_token(user)?;
        debug!(user_id = %user.id, "Refreshed access token");
        Ok(access_token)
    }

    async fn validate_refresh_claims(&self, refresh_token: &str) -> Result<Claims, DomainError> {
        let claims = self.validate(refresh_token).await?;
        if !claims.is_refresh() {
            return Err(TokenError::WrongTokenKind.into());
        }
        Ok(claims)
    }
}
