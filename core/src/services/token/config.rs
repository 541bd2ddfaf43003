//! Configuration for the session token service

use chrono::Duration;
use jsonwebtoken::Algorithm;
use tl_shared::config::JwtConfig;

use crate::errors::TokenError;
use crate::services::{ttl_from_seconds, MAX_TOKEN_TTL_SECONDS};

/// Configuration for the session token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// JWT signing algorithm, one of the HMAC family
    pub algorithm: Algorithm,
    /// `iss` claim written and required on every token
    pub issuer: String,
    /// `aud` claim written and required on every token
    pub audience: String,
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-please-change-in-production".to_string(),
            algorithm: Algorithm::HS256,
            issuer: "tokenline".to_string(),
            audience: "tokenline-api".to_string(),
            access_token_ttl: Duration::hours(24),
            refresh_token_ttl: Duration::hours(720),
        }
    }
}

impl TokenServiceConfig {
    /// Build the service configuration from the shared JWT settings
    ///
    /// # Errors
    /// * `TokenError::SigningFailed` - The algorithm name is unknown or a
    ///   lifetime is not positive or exceeds ten years
    pub fn from_jwt_config(config: &JwtConfig) -> Result<Self, TokenError> {
        let algorithm = config
            .algorithm
            .parse::<Algorithm>()
            .map_err(|_| TokenError::SigningFailed {
                reason: format!("unknown signing algorithm {}", config.algorithm),
            })?;

        let misconfigured = |reason: String| TokenError::SigningFailed { reason };

        Ok(Self {
            jwt_secret: config.secret.clone(),
            algorithm,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_token_ttl: ttl_from_seconds("access token lifetime", config.access_token_expiry)
                .map_err(misconfigured)?,
            refresh_token_ttl: ttl_from_seconds("refresh token lifetime", config.refresh_token_expiry)
                .map_err(misconfigured)?,
        })
    }

    /// Checks that both lifetimes are positive and at most ten years
    pub fn validate(&self) -> Result<(), TokenError> {
        for (name, ttl) in [
            ("access token lifetime", self.access_token_ttl),
            ("refresh token lifetime", self.refresh_token_ttl),
        ] {
            if ttl <= Duration::zero() || ttl.num_seconds() > MAX_TOKEN_TTL_SECONDS {
                return Err(TokenError::SigningFailed {
                    reason: format!("{} must be between 1 and {} seconds", name, MAX_TOKEN_TTL_SECONDS),
                });
            }
        }
        Ok(())
    }

    /// Replaces the signing secret
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = secret.into();
        self
    }

    /// Replaces the signing algorithm
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Access token lifetime in whole seconds, as reported to clients
    pub fn access_token_expires_in(&self) -> i64 {
        self.access_token_ttl.num_seconds()
    }
}
