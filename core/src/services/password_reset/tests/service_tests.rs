//! Unit tests for the password reset token service

use std::sync::Arc;

use chrono::Duration;
use tl_shared::config::ResetTokenConfig;
use uuid::Uuid;

use crate::domain::entities::reset_token::RESET_TOKEN_BYTES;
use crate::domain::entities::user::User;
use crate::errors::{DomainError, TokenError};
use crate::repositories::{MemoryResetTokenStore, MemoryResetTokenTable, MemoryUserRepository, ResetTokenStore};
use crate::services::password_reset::{PasswordResetConfig, PasswordResetTokenService};
use crate::services::MAX_TOKEN_TTL_SECONDS;

fn is_invalid_or_expired(result: &Result<impl std::fmt::Debug, DomainError>) -> bool {
    matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidOrExpiredToken))
    )
}

fn short_lived() -> PasswordResetConfig {
    PasswordResetConfig {
        token_ttl: Duration::milliseconds(100),
    }
}

#[tokio::test]
async fn test_issued_token_is_url_safe_and_high_entropy() {
    let service = PasswordResetTokenService::new(MemoryResetTokenStore::new(), PasswordResetConfig::default());

    let token = service.issue_reset_token(Uuid::new_v4()).await.unwrap();

    // 32 bytes, unpadded base64
    assert_eq!(token.len(), (RESET_TOKEN_BYTES * 4 + 2) / 3);
    assert!(token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
}

#[tokio::test]
async fn test_consume_once() {
    let service = PasswordResetTokenService::new(MemoryResetTokenStore::new(), PasswordResetConfig::default());
    let user_id = Uuid::new_v4();
    let token = service.issue_reset_token(user_id).await.unwrap();

    assert_eq!(service.validate_and_consume(&token).await.unwrap(), user_id);
    assert!(is_invalid_or_expired(&service.validate_and_consume(&token).await));
}

#[tokio::test]
async fn test_durable_consume_once() {
    let service = PasswordResetTokenService::new(MemoryResetTokenTable::new(), PasswordResetConfig::default());
    let user_id = Uuid::new_v4();
    let token = service.issue_reset_token(user_id).await.unwrap();

    assert_eq!(service.validate_and_consume(&token).await.unwrap(), user_id);
    assert!(is_invalid_or_expired(&service.validate_and_consume(&token).await));
    assert!(is_invalid_or_expired(&service.peek(&token).await));
}

#[tokio::test]
async fn test_expired_token_cannot_be_consumed() {
    let service = PasswordResetTokenService::new(MemoryResetTokenTable::new(), short_lived());
    let token = service.issue_reset_token(Uuid::new_v4()).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    assert!(is_invalid_or_expired(&service.validate_and_consume(&token).await));
    assert!(is_invalid_or_expired(&service.peek(&token).await));
    assert_eq!(service.sweep().await.unwrap(), 1);
}

#[tokio::test]
async fn test_unknown_and_empty_tokens_are_rejected() {
    let service = PasswordResetTokenService::new(MemoryResetTokenStore::new(), PasswordResetConfig::default());

    assert!(is_invalid_or_expired(&service.validate_and_consume("nope").await));
    assert!(is_invalid_or_expired(&service.validate_and_consume("").await));
}

#[tokio::test]
async fn test_peek_does_not_consume() {
    let service = PasswordResetTokenService::new(MemoryResetTokenStore::new(), PasswordResetConfig::default());
    let user_id = Uuid::new_v4();
    let token = service.issue_reset_token(user_id).await.unwrap();

    assert_eq!(service.peek(&token).await.unwrap(), user_id);
    assert_eq!(service.peek(&token).await.unwrap(), user_id);
    assert_eq!(service.validate_and_consume(&token).await.unwrap(), user_id);
}

#[tokio::test]
async fn test_reissue_leaves_earlier_tokens_usable() {
    let service = PasswordResetTokenService::new(MemoryResetTokenTable::new(), PasswordResetConfig::default());
    let user_id = Uuid::new_v4();
    let first = service.issue_reset_token(user_id).await.unwrap();
    let second = service.issue_reset_token(user_id).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(service.validate_and_consume(&second).await.unwrap(), user_id);
    assert_eq!(service.validate_and_consume(&first).await.unwrap(), user_id);
}

#[tokio::test]
async fn test_consume_for_user_resolves_account() {
    let service = PasswordResetTokenService::new(MemoryResetTokenStore::new(), PasswordResetConfig::default());
    let users = MemoryUserRepository::new();
    let user = User::new("ada@example.com", "ada");
    users.upsert(user.clone()).await;

    let token = service.issue_reset_token(user.id).await.unwrap();

    assert_eq!(service.consume_for_user(&token, &users).await.unwrap(), user);
}

#[tokio::test]
async fn test_consume_for_unknown_user_still_spends_token() {
    let service = PasswordResetTokenService::new(MemoryResetTokenTable::new(), PasswordResetConfig::default());
    let users = MemoryUserRepository::new();
    let token = service.issue_reset_token(Uuid::new_v4()).await.unwrap();

    let result = service.consume_for_user(&token, &users).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));

    assert!(is_invalid_or_expired(&service.validate_and_consume(&token).await));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_consumption_has_one_winner() {
    let service = Arc::new(PasswordResetTokenService::new(
        MemoryResetTokenTable::new(),
        PasswordResetConfig::default(),
    ));
    let user_id = Uuid::new_v4();
    let token = service.issue_reset_token(user_id).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let service = Arc::clone(&service);
        let token = token.clone();
        handles.push(tokio::spawn(async move {
            service.validate_and_consume(&token).await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(id) => {
                assert_eq!(id, user_id);
                winners += 1;
            }
            Err(err) => assert_eq!(err.token_error(), Some(&TokenError::InvalidOrExpiredToken)),
        }
    }
    assert_eq!(winners, 1);
}

#[tokio::test]
async fn test_store_rejects_non_positive_ttl() {
    let service = PasswordResetTokenService::new(
        MemoryResetTokenStore::new(),
        PasswordResetConfig {
            token_ttl: Duration::seconds(-1),
        },
    );

    let result = service.issue_reset_token(Uuid::new_v4()).await;
    assert!(matches!(result, Err(DomainError::Validation { .. })));
    assert!(service.store().lookup("anything").await.unwrap().is_none());
}

#[test]
fn test_config_from_reset_settings() {
    let config = PasswordResetConfig::try_from(&ResetTokenConfig { ttl_seconds: 900 }).unwrap();
    assert_eq!(config.token_ttl, Duration::minutes(15));
}

#[test]
fn test_config_rejects_out_of_range_lifetimes() {
    for ttl_seconds in [0, -1, i64::MAX, MAX_TOKEN_TTL_SECONDS + 1] {
        let result = PasswordResetConfig::try_from(&ResetTokenConfig { ttl_seconds });
        assert!(
            matches!(result, Err(DomainError::Validation { .. })),
            "accepted reset ttl of {} seconds",
            ttl_seconds
        );
    }
}
