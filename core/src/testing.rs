//! Backend-agnostic conformance checks for store implementations
//!
//! Every [`RevocationStore`] and [`ResetTokenStore`] must pass the same
//! suite, whether it reclaims entries through TTLs or through sweeps. Keys
//! are random per run, so the suites can share a live backend with other
//! data. Counts are compared as deltas for the same reason.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::errors::DomainError;
use crate::repositories::{ResetTokenStore, RevocationStore};

/// Lifetime of entries the suites wait out
const SHORT_TTL_MS: i64 = 300;

/// How long the suites sleep to let a short-lived entry expire
const EXPIRY_WAIT: StdDuration = StdDuration::from_millis(700);

/// Concurrent consumers racing for one reset token
const CONTENDERS: usize = 16;

/// Rounds of a sweep running alongside a consume
const SWEEP_RACE_ROUNDS: usize = 50;

fn random_hash() -> String {
    crate::services::TokenCodec::hash_token(&Uuid::new_v4().to_string())
}

/// Runs every revocation store check in sequence
pub async fn revocation_store_suite<S>(store: Arc<S>)
where
    S: RevocationStore + ?Sized + 'static,
{
    revocation_add_then_contains(&*store).await;
    revocation_add_is_idempotent(&*store).await;
    revocation_skips_expired_entries(&*store).await;
    revocation_entries_expire(&*store).await;
    revocation_sweep_keeps_live_entries(&*store).await;
}

pub async fn revocation_add_then_contains<S: RevocationStore + ?Sized>(store: &S) {
    let hash = random_hash();
    assert!(!store.contains(&hash).await.unwrap(), "unknown hash reported as revoked");

    store.add(&hash, Utc::now() + Duration::hours(1)).await.unwrap();

    assert!(store.contains(&hash).await.unwrap(), "revocation not visible immediately");
}

pub async fn revocation_add_is_idempotent<S: RevocationStore + ?Sized>(store: &S) {
    let hash = random_hash();
    let before = store.count().await.unwrap();

    store.add(&hash, Utc::now() + Duration::hours(1)).await.unwrap();
    store.add(&hash, Utc::now() + Duration::hours(2)).await.unwrap();

    assert_eq!(store.count().await.unwrap(), before + 1, "repeated add created a second entry");
    assert!(store.contains(&hash).await.unwrap());
}

pub async fn revocation_skips_expired_entries<S: RevocationStore + ?Sized>(store: &S) {
    let hash = random_hash();
    let before = store.count().await.unwrap();

    store.add(&hash, Utc::now() - Duration::seconds(1)).await.unwrap();
    store.add(&hash, Utc::now()).await.unwrap();

    assert!(!store.contains(&hash).await.unwrap(), "expired entry was written");
    assert_eq!(store.count().await.unwrap(), before);
}

pub async fn revocation_entries_expire<S: RevocationStore + ?Sized>(store: &S) {
    let hash = random_hash();
    store
        .add(&hash, Utc::now() + Duration::milliseconds(SHORT_TTL_MS))
        .await
        .unwrap();
    assert!(store.contains(&hash).await.unwrap());

    tokio::time::sleep(EXPIRY_WAIT).await;

    // Must hold before any sweep has run
    assert!(!store.contains(&hash).await.unwrap(), "entry visible after expiry");
}

pub async fn revocation_sweep_keeps_live_entries<S: RevocationStore + ?Sized>(store: &S) {
    let live = random_hash();
    let stale = random_hash();
    store.add(&live, Utc::now() + Duration::hours(1)).await.unwrap();
    store
        .add(&stale, Utc::now() + Duration::milliseconds(SHORT_TTL_MS))
        .await
        .unwrap();

    tokio::time::sleep(EXPIRY_WAIT).await;
    store.sweep().await.unwrap();

    assert!(store.contains(&live).await.unwrap(), "sweep removed a live entry");
    assert!(!store.contains(&stale).await.unwrap());
}

/// Runs every reset token store check in sequence
pub async fn reset_token_store_suite<S>(store: Arc<S>)
where
    S: ResetTokenStore + ?Sized + 'static,
{
    reset_create_then_lookup(&*store).await;
    reset_rejects_non_positive_ttl(&*store).await;
    reset_consume_is_single_use(&*store).await;
    reset_mark_used_is_single_use(&*store).await;
    reset_tokens_expire(&*store).await;
    reset_sweep_keeps_live_tokens(&*store).await;
    reset_sweep_during_consume_never_fails(Arc::clone(&store)).await;
    reset_concurrent_consume_has_one_winner(Arc::clone(&store)).await;
}

pub async fn reset_create_then_lookup<S: ResetTokenStore + ?Sized>(store: &S) {
    let user_id = Uuid::new_v4();
    let token = store.create(user_id, Duration::hours(1)).await.unwrap();

    let entry = store
        .lookup(&token)
        .await
        .unwrap()
        .expect("fresh token not found");
    assert_eq!(entry.user_id, user_id);
    assert!(!entry.used);
    assert!(entry.expires_at > Utc::now());

    assert!(store.lookup("unknown-token").await.unwrap().is_none());
}

pub async fn reset_rejects_non_positive_ttl<S: ResetTokenStore + ?Sized>(store: &S) {
    let result = store.create(Uuid::new_v4(), Duration::zero()).await;
    assert!(matches!(result, Err(DomainError::Validation { .. })));
}

pub async fn reset_consume_is_single_use<S: ResetTokenStore + ?Sized>(store: &S) {
    let user_id = Uuid::new_v4();
    let token = store.create(user_id, Duration::hours(1)).await.unwrap();

    assert_eq!(store.consume(&token).await.unwrap(), Some(user_id));
    assert_eq!(store.consume(&token).await.unwrap(), None, "token consumed twice");
    assert!(!store.mark_used_if_unused(&token).await.unwrap());

    // Either gone or visibly used, never usable again
    if let Some(entry) = store.lookup(&token).await.unwrap() {
        assert!(entry.used);
    }
}

pub async fn reset_mark_used_is_single_use<S: ResetTokenStore + ?Sized>(store: &S) {
    let token = store.create(Uuid::new_v4(), Duration::hours(1)).await.unwrap();

    assert!(store.mark_used_if_unused(&token).await.unwrap());
    assert!(!store.mark_used_if_unused(&token).await.unwrap());
    assert_eq!(store.consume(&token).await.unwrap(), None);

    assert!(!store.mark_used_if_unused("unknown-token").await.unwrap());
}

pub async fn reset_tokens_expire<S: ResetTokenStore + ?Sized>(store: &S) {
    let token = store
        .create(Uuid::new_v4(), Duration::milliseconds(SHORT_TTL_MS))
        .await
        .unwrap();

    tokio::time::sleep(EXPIRY_WAIT).await;

    assert!(store.lookup(&token).await.unwrap().is_none(), "expired token visible");
    assert!(!store.mark_used_if_unused(&token).await.unwrap());
    assert_eq!(store.consume(&token).await.unwrap(), None, "expired token consumed");
}

pub async fn reset_sweep_keeps_live_tokens<S: ResetTokenStore + ?Sized>(store: &S) {
    let user_id = Uuid::new_v4();
    let live = store.create(user_id, Duration::hours(1)).await.unwrap();
    let stale = store
        .create(Uuid::new_v4(), Duration::milliseconds(SHORT_TTL_MS))
        .await
        .unwrap();

    tokio::time::sleep(EXPIRY_WAIT).await;
    store.sweep().await.unwrap();

    assert!(store.lookup(&stale).await.unwrap().is_none());
    assert_eq!(store.consume(&live).await.unwrap(), Some(user_id), "sweep removed a live token");
}

/// A sweep racing a consume on a live token never makes the consume fail
pub async fn reset_sweep_during_consume_never_fails<S>(store: Arc<S>)
where
    S: ResetTokenStore + ?Sized + 'static,
{
    for round in 0..SWEEP_RACE_ROUNDS {
        let user_id = Uuid::new_v4();
        let token = store.create(user_id, Duration::hours(1)).await.unwrap();

        let sweeper = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.sweep().await })
        };
        let consumer = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.consume(&token).await })
        };

        let (swept, consumed) = tokio::join!(sweeper, consumer);
        assert!(swept.unwrap().is_ok(), "sweep failed in round {}", round);
        assert_eq!(
            consumed.unwrap().unwrap(),
            Some(user_id),
            "live token lost to a concurrent sweep in round {}",
            round
        );
    }
}

pub async fn reset_concurrent_consume_has_one_winner<S>(store: Arc<S>)
where
    S: ResetTokenStore + ?Sized + 'static,
{
    let user_id = Uuid::new_v4();
    let token = store.create(user_id, Duration::hours(1)).await.unwrap();

    let mut handles = Vec::with_capacity(CONTENDERS);
    for _ in 0..CONTENDERS {
        let store = Arc::clone(&store);
        let token = token.clone();
        handles.push(tokio::spawn(async move { store.consume(&token).await }));
    }

    let mut winners = 0;
    for handle in handles {
        if let Some(id) = handle.await.unwrap().unwrap() {
            assert_eq!(id, user_id);
            winners += 1;
        }
    }
    assert_eq!(winners, 1, "reset token consumed by {} callers", winners);
}
