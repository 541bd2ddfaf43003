//! # Infrastructure Layer
//!
//! Concrete backends for the token stores defined in `tl_core`:
//!
//! - **Cache**: Redis implementations, entries expire through key TTLs
//! - **Database**: MySQL implementations using SQLx, expired rows are swept
//! - **Stores**: backend selection driven by configuration
//!
//! Every backend call is bounded by the configured operation timeout. Timeouts
//! and connectivity failures surface as [`DomainError::Unavailable`].

use std::future::Future;
use std::time::Duration;

use tl_core::errors::DomainError;

/// Cache module - Redis client and ephemeral stores
pub mod cache;

/// Database module - MySQL pool and durable stores
pub mod database;

/// Backend selection
pub mod stores;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// A backend call did not finish within its time budget
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Stored data could not be decoded
    #[error("Corrupt stored data: {0}")]
    Corrupt(String),
}

impl InfrastructureError {
    /// Whether the failure means "the backend could not answer"
    pub fn is_unavailable(&self) -> bool {
        match self {
            InfrastructureError::Timeout { .. } => true,
            InfrastructureError::Cache(e) => {
                e.is_io_error()
                    || e.is_timeout()
                    || e.is_connection_dropped()
                    || e.is_connection_refusal()
                    || matches!(
                        e.kind(),
                        redis::ErrorKind::BusyLoadingError | redis::ErrorKind::TryAgain
                    )
            }
            InfrastructureError::Database(e) => matches!(
                e,
                sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
                    | sqlx::Error::Protocol(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::WorkerCrashed
            ),
            InfrastructureError::Config(_) | InfrastructureError::Corrupt(_) => false,
        }
    }
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        if err.is_unavailable() {
            DomainError::Unavailable {
                message: err.to_string(),
            }
        } else {
            DomainError::Internal {
                message: err.to_string(),
            }
        }
    }
}

/// Runs `operation` with an upper time bound
pub(crate) async fn bounded<F, T>(
    operation: &'static str,
    timeout: Duration,
    future: F,
) -> Result<T, InfrastructureError>
where
    F: Future<Output = Result<T, InfrastructureError>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, timeout_ms = timeout.as_millis() as u64, "Backend call timed out");
            Err(InfrastructureError::Timeout {
                operation,
                timeout_ms: timeout.as_millis() as u64,
            })
        }
    }
}
