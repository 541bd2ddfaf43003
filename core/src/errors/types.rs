//! Token lifecycle error taxonomy
//!
//! The presentation layer owns the mapping to transport status codes; these
//! variants only describe what went wrong with the presented credential.

use thiserror::Error;

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token could not be parsed at all
    #[error("Malformed token")]
    MalformedToken,

    /// The signature does not match, or an unexpected algorithm was used
    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    TokenExpired,

    /// The token was revoked before its natural expiry
    #[error("Token revoked")]
    TokenRevoked,

    /// An access token was presented where a refresh token is required, or vice versa
    #[error("Wrong token kind")]
    WrongTokenKind,

    /// The refresh token belongs to a different user than the supplied record
    #[error("Token subject does not match user")]
    SubjectMismatch,

    /// Reset token is unknown, expired or already used
    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    /// Signing key misconfiguration
    #[error("Token signing failed: {reason}")]
    SigningFailed { reason: String },
}

impl TokenError {
    /// Error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::MalformedToken => "MALFORMED_TOKEN",
            TokenError::InvalidSignature => "INVALID_SIGNATURE",
            TokenError::TokenExpired => "TOKEN_EXPIRED",
            TokenError::TokenRevoked => "TOKEN_REVOKED",
            TokenError::WrongTokenKind => "WRONG_TOKEN_KIND",
            TokenError::SubjectMismatch => "SUBJECT_MISMATCH",
            TokenError::InvalidOrExpiredToken => "INVALID_OR_EXPIRED_TOKEN",
            TokenError::SigningFailed { .. } => "SIGNING_ERROR",
        }
    }
}
