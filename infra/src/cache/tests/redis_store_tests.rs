//! Conformance of the Redis stores, run against a live server

use std::sync::Arc;

use tl_core::testing;
use tl_shared::config::CacheConfig;

use crate::cache::{RedisClient, RedisResetTokenStore, RedisRevocationStore};

/// Client under a fresh key prefix so counts are isolated per test
async fn isolated_client() -> RedisClient {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    let config = CacheConfig::new(url).with_prefix(format!("test-{}", uuid::Uuid::new_v4()));
    RedisClient::new(config).await.unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore] // Requires actual Redis server
async fn test_redis_revocation_store_conforms() {
    let store = RedisRevocationStore::new(isolated_client().await);
    testing::revocation_store_suite(Arc::new(store)).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore] // Requires actual Redis server
async fn test_redis_reset_token_store_conforms() {
    let store = RedisResetTokenStore::new(isolated_client().await);
    testing::reset_token_store_suite(Arc::new(store)).await;
}
