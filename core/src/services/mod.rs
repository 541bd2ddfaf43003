//! Business services containing domain logic and use cases.

pub mod password_reset;
pub mod token;

// Re-export commonly used types
pub use password_reset::{PasswordResetConfig, PasswordResetTokenService};
use chrono::Duration;

/// Longest lifetime accepted for any issued token, ten years
pub const MAX_TOKEN_TTL_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

/// Converts a configured lifetime in seconds, rejecting values outside
/// `1..=MAX_TOKEN_TTL_SECONDS`
pub(crate) fn ttl_from_seconds(name: &str, seconds: i64) -> Result<Duration, String> {
    if !(1..=MAX_TOKEN_TTL_SECONDS).contains(&seconds) {
        return Err(format!(
            "{} must be between 1 and {} seconds, got {}",
            name, MAX_TOKEN_TTL_SECONDS, seconds
        ));
    }
    Duration::try_seconds(seconds).ok_or_else(|| format!("{} is out of range: {}", name, seconds))
}

pub use token::{
    CleanupResult, SessionTokenService, TokenCleanupConfig, TokenCleanupService, TokenCodec,
    TokenServiceConfig,
};
