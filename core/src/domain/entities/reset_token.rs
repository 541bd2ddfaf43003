//! Single-use password reset token entity.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use uuid::Uuid;

/// Bytes of entropy in every generated reset token
pub const RESET_TOKEN_BYTES: usize = 32;

/// A password reset token and its bookkeeping
///
/// `Debug` never prints the token itself; it is a bearer credential.
#[derive(Clone, PartialEq, Eq)]
pub struct ResetToken {
    /// Opaque URL-safe random string handed to the user
    pub token: String,

    /// Account the token resets
    pub user_id: Uuid,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Whether the token has been consumed
    pub used: bool,
}

impl ResetToken {
    /// Issues a fresh token for `user_id` that expires after `ttl`
    pub fn issue(user_id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            token: Self::generate_secret(),
            user_id,
            created_at: now,
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
            used: false,
        }
    }

    /// Generates [`RESET_TOKEN_BYTES`] of OS randomness, URL-safe encoded
    pub fn generate_secret() -> String {
        let mut bytes = [0u8; RESET_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Checks if the token has expired (`expires_at <= now`)
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// A token is usable while unused and unexpired
    pub fn is_usable(&self) -> bool {
        !self.used && !self.is_expired()
    }

    /// Gets the time remaining until expiration, zero if expired
    pub fn time_until_expiration(&self) -> Duration {
        let now = Utc::now();
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}

impl std::fmt::Debug for ResetToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetToken")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .field("used", &self.used)
            .finish()
    }
}
