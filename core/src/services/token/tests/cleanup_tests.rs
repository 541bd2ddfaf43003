//! Unit tests for the token cleanup service

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::reset_token::ResetToken;
use crate::errors::DomainError;
use crate::repositories::{MemoryResetTokenTable, MemoryRevocationTable, ResetTokenStore, RevocationStore};
use crate::services::token::{TokenCleanupConfig, TokenCleanupService};

/// Revocation store whose backend is always down
struct UnavailableRevocationStore;

#[async_trait]
impl RevocationStore for UnavailableRevocationStore {
    async fn add(&self, _token_hash: &str, _expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        Err(unavailable())
    }

    async fn contains(&self, _token_hash: &str) -> Result<bool, DomainError> {
        Err(unavailable())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Err(unavailable())
    }

    async fn sweep(&self) -> Result<u64, DomainError> {
        Err(unavailable())
    }
}

fn unavailable() -> DomainError {
    DomainError::Unavailable {
        message: "connection refused".to_string(),
    }
}

async fn insert_expired_reset_token(table: &MemoryResetTokenTable) {
    let mut token = ResetToken::issue(Uuid::new_v4(), Duration::hours(1));
    token.expires_at = Utc::now() - Duration::seconds(5);
    table.insert(&token).await.unwrap();
}

#[tokio::test]
async fn test_run_cleanup_sweeps_both_stores() {
    let revocations = Arc::new(MemoryRevocationTable::new());
    let reset_tokens = Arc::new(MemoryResetTokenTable::new());

    revocations
        .add("short", Utc::now() + Duration::milliseconds(50))
        .await
        .unwrap();
    revocations
        .add("long", Utc::now() + Duration::hours(1))
        .await
        .unwrap();
    insert_expired_reset_token(&reset_tokens).await;
    reset_tokens
        .create(Uuid::new_v4(), Duration::hours(1))
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(120)).await;

    let service = TokenCleanupService::new(
        Arc::clone(&revocations),
        Arc::clone(&reset_tokens),
        TokenCleanupConfig::default(),
    );
    let result = service.run_cleanup().await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.revocations_swept, 1);
    assert_eq!(result.reset_tokens_swept, 1);
    assert_eq!(result.total_cleaned(), 2);
    assert_eq!(revocations.row_count().await, 1);
    assert_eq!(reset_tokens.row_count().await, 1);
}

#[tokio::test]
async fn test_one_failing_store_does_not_block_the_other() {
    let reset_tokens = Arc::new(MemoryResetTokenTable::new());
    insert_expired_reset_token(&reset_tokens).await;

    let service = TokenCleanupService::new(
        Arc::new(UnavailableRevocationStore),
        Arc::clone(&reset_tokens),
        TokenCleanupConfig::default(),
    );
    let result = service.run_cleanup().await.unwrap();

    assert!(!result.is_success());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.reset_tokens_swept, 1);
}

#[tokio::test]
async fn test_disabled_cleanup_does_nothing() {
    let reset_tokens = Arc::new(MemoryResetTokenTable::new());
    insert_expired_reset_token(&reset_tokens).await;

    let config = TokenCleanupConfig {
        enabled: false,
        ..TokenCleanupConfig::default()
    };
    let service = Arc::new(TokenCleanupService::new(
        Arc::new(MemoryRevocationTable::new()),
        Arc::clone(&reset_tokens),
        config,
    ));

    assert_eq!(service.run_cleanup().await.unwrap().total_cleaned(), 0);
    assert!(Arc::clone(&service).start_background_task().is_none());
    assert_eq!(reset_tokens.row_count().await, 1);
}

#[tokio::test]
async fn test_background_task_runs_first_cycle_immediately() {
    let reset_tokens = Arc::new(MemoryResetTokenTable::new());
    insert_expired_reset_token(&reset_tokens).await;

    let service = Arc::new(TokenCleanupService::new(
        Arc::new(MemoryRevocationTable::new()),
        Arc::clone(&reset_tokens),
        TokenCleanupConfig::default(),
    ));
    let handle = service.start_background_task().unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    handle.abort();

    assert_eq!(reset_tokens.row_count().await, 0);
}

#[test]
fn test_config_from_sweep_config() {
    let sweep = tl_shared::config::SweepConfig {
        enabled: false,
        interval_seconds: 0,
    };
    let config = TokenCleanupConfig::from(&sweep);

    assert!(!config.enabled);
    assert_eq!(config.interval_seconds, 1);
}
