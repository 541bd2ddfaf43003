use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::{Claims, TokenKind, User};

const ISSUER: &str = "tokenline";
const AUDIENCE: &str = "tokenline-api";

fn staff_user() -> User {
    let mut user = User::new("grace@example.com", "grace");
    user.set_staff(true);
    user.verify();
    user
}

#[test]
fn test_access_token_claims() {
    let user = staff_user();
    let claims = Claims::new_access_token(&user, ISSUER, AUDIENCE, Duration::hours(24));

    assert_eq!(claims.sub, user.id.to_string());
    assert_eq!(claims.token_type, TokenKind::Access);
    assert_eq!(claims.iss, ISSUER);
    assert_eq!(claims.aud, AUDIENCE);
    assert_eq!(claims.email.as_deref(), Some("grace@example.com"));
    assert_eq!(claims.username.as_deref(), Some("grace"));
    assert!(claims.is_staff());
    assert!(!claims.is_superuser());
    assert!(claims.is_verified());
    assert!(claims.is_access());
    assert!(!claims.is_expired());
    assert_eq!(claims.exp - claims.iat, 24 * 3600);
}

#[test]
fn test_refresh_token_claims_carry_no_identity() {
    let user = staff_user();
    let claims = Claims::new_refresh_token(user.id, ISSUER, AUDIENCE, Duration::hours(720));

    assert!(claims.is_refresh());
    assert_eq!(claims.user_id().unwrap(), user.id);
    assert_eq!(claims.email, None);
    assert_eq!(claims.is_staff, None);
    assert!(!claims.is_staff());

    let payload = serde_json::to_value(&claims).unwrap();
    let object = payload.as_object().unwrap();
    assert_eq!(object["token_type"], "refresh");
    assert!(!object.contains_key("is_staff"));
    assert!(!object.contains_key("is_superuser"));
    assert!(!object.contains_key("email"));
}

#[test]
fn test_each_token_gets_unique_jti() {
    let user_id = Uuid::new_v4();
    let first = Claims::new_refresh_token(user_id, ISSUER, AUDIENCE, Duration::hours(1));
    let second = Claims::new_refresh_token(user_id, ISSUER, AUDIENCE, Duration::hours(1));
    assert_ne!(first.jti, second.jti);
}

#[test]
fn test_claims_expiration() {
    let user = staff_user();
    let mut claims = Claims::new_access_token(&user, ISSUER, AUDIENCE, Duration::hours(1));

    claims.exp = Utc::now().timestamp() - 1;
    assert!(claims.is_expired());

    claims.exp = Utc::now().timestamp();
    assert!(claims.is_expired(), "exp == now counts as expired");
}

#[test]
fn test_expires_at_matches_exp() {
    let claims = Claims::new_refresh_token(Uuid::new_v4(), ISSUER, AUDIENCE, Duration::hours(2));
    assert_eq!(claims.expires_at().timestamp(), claims.exp);
}

#[test]
fn test_huge_ttl_saturates_expiry() {
    let ttl = Duration::try_seconds(i64::MAX / 1000 - 1).unwrap();
    let claims = Claims::new_access_token(&staff_user(), "issuer", "audience", ttl);

    assert_eq!(claims.exp, chrono::DateTime::<Utc>::MAX_UTC.timestamp());
    assert!(!claims.is_expired());
}
