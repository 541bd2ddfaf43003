//! Domain-specific error types and error handling.

mod types;


pub use types::TokenError;

use thiserror::Error;

/// Core domain errors
///
/// Every failure the core can produce. Only [`DomainError::Unavailable`] is
/// retryable; all token errors are terminal for the presented credential.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Backend timeout or connectivity failure; the outcome is unknown
    #[error("Backend unavailable: {message}")]
    Unavailable { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Whether the caller may retry the operation with backoff
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::Unavailable { .. })
    }

    /// The token error carried by this error, if any
    pub fn token_error(&self) -> Option<&TokenError> {
        match self {
            DomainError::Token(err) => Some(err),
            _ => None,
        }
    }

    /// Stable machine-readable code for the calling layer
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "VALIDATION_ERROR",
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::Unavailable { .. } => "UNAVAILABLE",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
            DomainError::Token(err) => err.error_code(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
