use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::{ResetToken, RESET_TOKEN_BYTES};

#[test]
fn test_generated_secret_is_url_safe_and_full_entropy() {
    let secret = ResetToken::generate_secret();

    assert!(secret
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    let decoded = URL_SAFE_NO_PAD.decode(&secret).unwrap();
    assert_eq!(decoded.len(), RESET_TOKEN_BYTES);
}

#[test]
fn test_generated_secrets_are_unique() {
    let first = ResetToken::generate_secret();
    let second = ResetToken::generate_secret();
    assert_ne!(first, second);
}

#[test]
fn test_issue_sets_expiry_from_ttl() {
    let user_id = Uuid::new_v4();
    let token = ResetToken::issue(user_id, Duration::hours(1));

    assert_eq!(token.user_id, user_id);
    assert!(!token.used);
    assert!(token.is_usable());
    assert_eq!(token.expires_at - token.created_at, Duration::hours(1));
    assert!(token.time_until_expiration() > Duration::minutes(59));
}

#[test]
fn test_expired_or_used_tokens_are_not_usable() {
    let mut token = ResetToken::issue(Uuid::new_v4(), Duration::hours(1));
    token.used = true;
    assert!(!token.is_usable());

    let mut expired = ResetToken::issue(Uuid::new_v4(), Duration::hours(1));
    expired.expires_at = Utc::now() - Duration::seconds(1);
    assert!(expired.is_expired());
    assert!(!expired.is_usable());
    assert_eq!(expired.time_until_expiration(), Duration::zero());
}

#[test]
fn test_debug_output_redacts_secret() {
    let token = ResetToken::issue(Uuid::new_v4(), Duration::hours(1));
    let rendered = format!("{:?}", token);

    assert!(!rendered.contains(&token.token));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn test_issue_with_huge_ttl_saturates_expiry() {
    let ttl = Duration::try_seconds(i64::MAX / 1000).unwrap();
    let token = ResetToken::issue(Uuid::new_v4(), ttl);

    assert_eq!(token.expires_at, chrono::DateTime::<Utc>::MAX_UTC);
    assert!(token.is_usable());
}
