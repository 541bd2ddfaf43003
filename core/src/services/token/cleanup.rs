//! Token cleanup service for periodic sweeps of the durable stores
//!
//! Ephemeral backends reclaim entries through key TTLs and report zero from
//! `sweep`; durable backends only shrink when this service runs.

use std::sync::Arc;

use tl_shared::config::SweepConfig;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::{ResetTokenStore, RevocationStore};

/// Configuration for token cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600, // Run every hour
            enabled: true,
        }
    }
}

impl From<&SweepConfig> for TokenCleanupConfig {
    fn from(config: &SweepConfig) -> Self {
        Self {
            interval_seconds: config.interval_seconds.max(1),
            enabled: config.enabled,
        }
    }
}

/// Service for sweeping expired revocation entries and reset tokens
pub struct TokenCleanupService<R, P>
where
    R: RevocationStore + ?Sized + 'static,
    P: ResetTokenStore + ?Sized + 'static,
{
    revocations: Arc<R>,
    reset_tokens: Arc<P>,
    config: TokenCleanupConfig,
}

impl<R, P> TokenCleanupService<R, P>
where
    R: RevocationStore + ?Sized + 'static,
    P: ResetTokenStore + ?Sized + 'static,
{
    /// Create a new token cleanup service
    pub fn new(revocations: Arc<R>, reset_tokens: Arc<P>, config: TokenCleanupConfig) -> Self {
        Self {
            revocations,
            reset_tokens,
            config,
        }
    }

    /// Run a single cleanup cycle
    ///
    /// Both stores are swept even if the first one fails; failures are
    /// collected in [`CleanupResult::errors`].
    ///
    /// # Returns
    /// * `Ok(CleanupResult)` - Summary of cleanup operations
    /// * `Err(DomainError)` - Reserved for failures outside the individual sweeps
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        info!("Starting token cleanup cycle");

        let mut result = CleanupResult::default();

        match self.revocations.sweep().await {
            Ok(count) => {
                result.revocations_swept = count;
                info!(count, "Swept expired revocation entries");
            }
            Err(e) => {
                error!(error = %e, "Failed to sweep revocation entries");
                result.errors.push(format!("Revocation sweep error: {}", e));
            }
        }

        match self.reset_tokens.sweep().await {
            Ok(count) => {
                result.reset_tokens_swept = count;
                info!(count, "Swept expired reset tokens");
            }
            Err(e) => {
                error!(error = %e, "Failed to sweep reset tokens");
                result.errors.push(format!("Reset token sweep error: {}", e));
            }
        }

        info!(
            revocations = result.revocations_swept,
            reset_tokens = result.reset_tokens_swept,
            "Token cleanup completed"
        );

        Ok(result)
    }

    /// Start the cleanup service as a background task
    ///
    /// Returns `None` when the service is disabled. The first cycle runs
    /// immediately, then once per interval.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Token cleanup service is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                "Token cleanup service started"
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                match self.run_cleanup().await {
                    Ok(result) => {
                        if !result.errors.is_empty() {
                            warn!(errors = ?result.errors, "Cleanup completed with errors");
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "Token cleanup cycle failed");
                    }
                }
            }
        }))
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of expired revocation entries deleted
    pub revocations_swept: u64,
    /// Number of expired reset tokens deleted
    pub reset_tokens_swept: u64,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get total number of items cleaned up
    pub fn total_cleaned(&self) -> u64 {
        self.revocations_swept + self.reset_tokens_swept
    }
}
