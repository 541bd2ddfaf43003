//! Configuration for the password reset token service

use chrono::Duration;
use tl_shared::config::ResetTokenConfig;

use crate::errors::DomainError;
use crate::services::ttl_from_seconds;

/// Configuration for the password reset token service
#[derive(Debug, Clone)]
pub struct PasswordResetConfig {
    /// Lifetime of an issued reset token
    pub token_ttl: Duration,
}

impl Default for PasswordResetConfig {
    fn default() -> Self {
        Self {
            token_ttl: Duration::hours(1),
        }
    }
}

impl TryFrom<&ResetTokenConfig> for PasswordResetConfig {
    type Error = DomainError;

    /// Fails with `DomainError::Validation` unless the lifetime is positive
    /// and at most ten years
    fn try_from(config: &ResetTokenConfig) -> Result<Self, Self::Error> {
        let token_ttl = ttl_from_seconds("reset token lifetime", config.ttl_seconds)
            .map_err(|message| DomainError::Validation { message })?;
        Ok(Self { token_ttl })
    }
}
