//! Token entities for JWT-based session authentication.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::User;

/// Which role a signed session token plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived token carrying the full identity snapshot
    Access,
    /// Long-lived token that can only be exchanged for a new access token
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims structure for the JWT payload
///
/// Refresh tokens only carry the subject and registered claims; the identity
/// fields are left out of the serialized payload entirely so a refresh token
/// never leaks staff or superuser state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Access or refresh
    pub token_type: TokenKind,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID, unique per issued token
    pub jti: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_staff: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
}

impl Claims {
    /// Creates claims for an access token from the current user record
    pub fn new_access_token(user: &User, issuer: &str, audience: &str, ttl: Duration) -> Self {
        let mut claims = Self::registered(user.id, TokenKind::Access, issuer, audience, ttl);
        claims.email = Some(user.email.clone());
        claims.username = Some(user.username.clone());
        claims.is_staff = Some(user.is_staff);
        claims.is_superuser = Some(user.is_superuser);
        claims.is_verified = Some(user.is_verified);
        claims
    }

    /// Creates claims for a refresh token
    pub fn new_refresh_token(user_id: Uuid, issuer: &str, audience: &str, ttl: Duration) -> Self {
        Self::registered(user_id, TokenKind::Refresh, issuer, audience, ttl)
    }

    fn registered(
        user_id: Uuid,
        token_type: TokenKind,
        issuer: &str,
        audience: &str,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();
        // Saturates instead of overflowing; service configs reject such lifetimes
        let expiry = now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            sub: user_id.to_string(),
            token_type,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expiry.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
            email: None,
            username: None,
            is_staff: None,
            is_superuser: None,
            is_verified: None,
        }
    }

    pub fn is_access(&self) -> bool {
        self.token_type == TokenKind::Access
    }

    pub fn is_refresh(&self) -> bool {
        self.token_type == TokenKind::Refresh
    }

    /// Checks if the claims have expired (`exp <= now`)
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Expiry as a timestamp, clamped to the Unix epoch for nonsensical values
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_default()
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    pub fn is_staff(&self) -> bool {
        self.is_staff.unwrap_or(false)
    }

    pub fn is_superuser(&self) -> bool {
        self.is_superuser.unwrap_or(false)
    }

    pub fn is_verified(&self) -> bool {
        self.is_verified.unwrap_or(false)
    }
}

/// Token pair returned to the client on login, registration or refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl SessionTokenPair {
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
        }
    }
}
