//! Unit tests for the token codec

use chrono::Duration;
use jsonwebtoken::Algorithm;

use crate::domain::entities::token::Claims;
use crate::domain::entities::user::User;
use crate::errors::TokenError;
use crate::services::token::{TokenCodec, TokenServiceConfig};

fn codec_with(config: &TokenServiceConfig) -> TokenCodec {
    TokenCodec::new(config).unwrap()
}

fn access_claims(config: &TokenServiceConfig, ttl: Duration) -> Claims {
    let user = User::new("grace@example.com", "grace");
    Claims::new_access_token(&user, &config.issuer, &config.audience, ttl)
}

#[test]
fn test_issue_and_verify_roundtrip() {
    let config = TokenServiceConfig::default();
    let codec = codec_with(&config);
    let claims = access_claims(&config, Duration::hours(1));

    let token = codec.issue(&claims).unwrap();
    let verified = codec.verify(&token).unwrap();

    assert_eq!(verified, claims);
}

#[test]
fn test_expired_token_is_rejected() {
    let config = TokenServiceConfig::default();
    let codec = codec_with(&config);
    let token = codec
        .issue(&access_claims(&config, Duration::seconds(-30)))
        .unwrap();

    assert_eq!(codec.verify(&token), Err(TokenError::TokenExpired));
    assert!(codec.verify_ignoring_expiry(&token).is_ok());
}

#[test]
fn test_token_expiring_now_is_expired() {
    let config = TokenServiceConfig::default();
    let codec = codec_with(&config);
    let token = codec.issue(&access_claims(&config, Duration::zero())).unwrap();

    assert_eq!(codec.verify(&token), Err(TokenError::TokenExpired));
}

#[test]
fn test_wrong_secret_is_invalid_signature() {
    let config = TokenServiceConfig::default();
    let codec = codec_with(&config);
    let other = codec_with(&TokenServiceConfig::default().with_secret("another-secret"));

    let token = other
        .issue(&access_claims(&config, Duration::hours(1)))
        .unwrap();

    assert_eq!(codec.verify(&token), Err(TokenError::InvalidSignature));
}

#[test]
fn test_swapped_payload_is_invalid_signature() {
    let config = TokenServiceConfig::default();
    let codec = codec_with(&config);
    let first = codec
        .issue(&access_claims(&config, Duration::hours(1)))
        .unwrap();
    let second = codec
        .issue(&access_claims(&config, Duration::hours(2)))
        .unwrap();

    let first_parts: Vec<&str> = first.split('.').collect();
    let second_parts: Vec<&str> = second.split('.').collect();
    let forged = format!("{}.{}.{}", first_parts[0], second_parts[1], first_parts[2]);

    assert_eq!(codec.verify(&forged), Err(TokenError::InvalidSignature));
}

#[test]
fn test_unexpected_algorithm_is_rejected() {
    let config = TokenServiceConfig::default();
    let codec = codec_with(&config);
    let hs512 = codec_with(&TokenServiceConfig::default().with_algorithm(Algorithm::HS512));

    let token = hs512
        .issue(&access_claims(&config, Duration::hours(1)))
        .unwrap();

    assert_eq!(codec.verify(&token), Err(TokenError::InvalidSignature));
}

#[test]
fn test_garbage_is_malformed() {
    let codec = codec_with(&TokenServiceConfig::default());

    assert_eq!(codec.verify("not-a-token"), Err(TokenError::MalformedToken));
    assert_eq!(codec.verify(""), Err(TokenError::MalformedToken));
    assert_eq!(codec.verify("a.b.c"), Err(TokenError::MalformedToken));
}

#[test]
fn test_foreign_audience_is_malformed() {
    let config = TokenServiceConfig::default();
    let codec = codec_with(&config);
    let user = User::new("grace@example.com", "grace");
    let claims = Claims::new_access_token(&user, &config.issuer, "someone-else", Duration::hours(1));

    let token = codec.issue(&claims).unwrap();

    assert_eq!(codec.verify(&token), Err(TokenError::MalformedToken));
}

#[test]
fn test_rejects_misconfiguration() {
    let empty = TokenServiceConfig::default().with_secret("");
    assert!(matches!(
        TokenCodec::new(&empty),
        Err(TokenError::SigningFailed { .. })
    ));

    let asymmetric = TokenServiceConfig::default().with_algorithm(Algorithm::RS256);
    assert!(matches!(
        TokenCodec::new(&asymmetric),
        Err(TokenError::SigningFailed { .. })
    ));
}

#[test]
fn test_hash_token_is_hex_sha256() {
    let hash = TokenCodec::hash_token("abc");
    assert_eq!(
        hash,
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_ne!(TokenCodec::hash_token("abd"), hash);
}

#[test]
fn test_same_second_tokens_are_distinct() {
    let config = TokenServiceConfig::default();
    let codec = codec_with(&config);
    let user = User::new("grace@example.com", "grace");

    let a = codec
        .issue(&Claims::new_access_token(&user, &config.issuer, &config.audience, Duration::hours(1)))
        .unwrap();
    let b = codec
        .issue(&Claims::new_access_token(&user, &config.issuer, &config.audience, Duration::hours(1)))
        .unwrap();

    assert_ne!(a, b);
}
