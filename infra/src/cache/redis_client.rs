//! Redis client shared by the ephemeral token stores
//!
//! A multiplexed connection with bounded retries for idempotent commands and
//! a per-call timeout. Keys may embed credentials (reset tokens), so log
//! lines only carry a fingerprint of the last key segment.

use std::time::Duration;

use redis::{aio::MultiplexedConnection, Client, RedisError, RedisResult};
use tl_shared::config::CacheConfig;
use tl_shared::redact::fingerprint;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::{bounded, InfrastructureError};

/// Base delay between retries in milliseconds
const RETRY_DELAY_MS: u64 = 100;

/// Keys fetched per SCAN round trip
const SCAN_BATCH: usize = 500;

type RedisFuture<T> = std::pin::Pin<Box<dyn std::future::Future<Output = RedisResult<T>> + Send>>;

/// Redis client with retry logic and bounded calls
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Configuration used to create this client
    config: CacheConfig,
}

impl RedisClient {
    /// Connect to Redis
    ///
    /// # Arguments
    /// * `config` - Cache configuration settings
    ///
    /// # Returns
    /// * `Ok(RedisClient)` - Connected client
    /// * `Err(InfrastructureError::Config)` - Unparseable URL
    /// * `Err(InfrastructureError::Cache)` - All connection attempts failed
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(&config.url), "Creating Redis client");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::create_connection_with_retry(&client, config.connect_retries.max(1)).await?;

        info!("Redis client created successfully");

        Ok(Self { connection, config })
    }

    async fn create_connection_with_retry(
        client: &Client,
        max_retries: u32,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = RETRY_DELAY_MS;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => return Ok(connection),
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Build a namespaced key under the configured prefix
    pub fn make_key(&self, namespace: &str, key: &str) -> String {
        self.config.make_key(namespace, key)
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.config.operation_timeout_ms)
    }

    /// `SET key value PX ttl_ms`
    pub async fn set_with_expiry_ms(
        &self,
        key: &str,
        value: &str,
        ttl_ms: u64,
    ) -> Result<(), InfrastructureError> {
        debug!(key = %log_key(key), ttl_ms, "Setting key");

        let key = key.to_string();
        let value = value.to_string();
        self.execute_with_retry("redis.set", move |mut conn| {
            let key = key.clone();
            let value = value.clone();
            Box::pin(async move {
                redis::cmd("SET")
                    .arg(key)
                    .arg(value)
                    .arg("PX")
                    .arg(ttl_ms)
                    .query_async::<_, ()>(&mut conn)
                    .await
            })
        })
        .await
    }

    /// Value and remaining TTL in milliseconds, read atomically
    ///
    /// Returns `None` for a missing key or a key without a TTL.
    pub async fn get_with_ttl_ms(
        &self,
        key: &str,
    ) -> Result<Option<(String, i64)>, InfrastructureError> {
        debug!(key = %log_key(key), "Getting key with TTL");

        let key = key.to_string();
        let (value, pttl) = self
            .execute_with_retry("redis.get", move |mut conn| {
                let key = key.clone();
                Box::pin(async move {
                    redis::pipe()
                        .atomic()
                        .cmd("GET")
                        .arg(&key)
                        .cmd("PTTL")
                        .arg(&key)
                        .query_async::<_, (Option<String>, i64)>(&mut conn)
                        .await
                })
            })
            .await?;

        // PTTL is -2 for a missing key and -1 for a key without expiry
        Ok(value.filter(|_| pttl > 0).map(|value| (value, pttl)))
    }

    /// `GETDEL key`, the atomic take primitive
    ///
    /// Never retried: a lost reply after the delete would turn a successful
    /// take into a spurious miss.
    pub async fn get_and_delete(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        debug!(key = %log_key(key), "Taking key");

        let mut conn = self.connection.clone();
        let key = key.to_string();
        bounded("redis.getdel", self.timeout(), async move {
            redis::cmd("GETDEL")
                .arg(key)
                .query_async::<_, Option<String>>(&mut conn)
                .await
                .map_err(InfrastructureError::Cache)
        })
        .await
    }

    /// Delete a key
    ///
    /// # Returns
    /// * `Ok(true)` - This call removed the key
    /// * `Ok(false)` - The key did not exist
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        debug!(key = %log_key(key), "Deleting key");

        let mut conn = self.connection.clone();
        let key = key.to_string();
        let deleted = bounded("redis.del", self.timeout(), async move {
            redis::cmd("DEL")
                .arg(key)
                .query_async::<_, u32>(&mut conn)
                .await
                .map_err(InfrastructureError::Cache)
        })
        .await?;

        Ok(deleted > 0)
    }

    /// Check if a key exists
    pub async fn exists(&self, key: &str) -> Result<bool, InfrastructureError> {
        let key = key.to_string();
        self.execute_with_retry("redis.exists", move |mut conn| {
            let key = key.clone();
            Box::pin(async move {
                redis::cmd("EXISTS")
                    .arg(key)
                    .query_async::<_, bool>(&mut conn)
                    .await
            })
        })
        .await
    }

    /// Count keys matching a glob pattern with incremental `SCAN`
    pub async fn count_matching(&self, pattern: &str) -> Result<u64, InfrastructureError> {
        let mut conn = self.connection.clone();
        let pattern = pattern.to_string();

        bounded("redis.scan", self.timeout(), async move {
            let mut cursor: u64 = 0;
            let mut total: u64 = 0;
            loop {
                let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                    .arg(cursor)
                    .arg("MATCH")
                    .arg(&pattern)
                    .arg("COUNT")
                    .arg(SCAN_BATCH)
                    .query_async(&mut conn)
                    .await?;
                total += keys.len() as u64;
                if next == 0 {
                    return Ok::<u64, InfrastructureError>(total);
                }
                cursor = next;
            }
        })
        .await
    }

    /// Check if the Redis connection is healthy
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let response = self
            .execute_with_retry("redis.ping", |mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await?;

        if response == "PONG" {
            Ok(true)
        } else {
            warn!("Redis health check returned unexpected response: {}", response);
            Ok(false)
        }
    }

    /// Execute an idempotent Redis operation with bounded retries
    ///
    /// Every attempt is bounded by the operation timeout. An elapsed timeout
    /// is not retried.
    async fn execute_with_retry<F, T>(
        &self,
        operation: &'static str,
        command: F,
    ) -> Result<T, InfrastructureError>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let max_retries = self.config.connect_retries.max(1);
        let mut attempts = 0;
        let mut delay = RETRY_DELAY_MS;

        loop {
            attempts += 1;
            let conn = self.connection.clone();

            let attempt = bounded(operation, self.timeout(), async {
                command(conn).await.map_err(InfrastructureError::Cache)
            })
            .await;

            match attempt {
                Ok(result) => return Ok(result),
                Err(InfrastructureError::Cache(e))
                    if attempts < max_retries && is_retriable_error(&e) =>
                {
                    warn!(
                        "Redis operation {} failed (attempt {}/{}): {}. Retrying in {}ms...",
                        operation, attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!("Redis operation {} failed after {} attempts: {}", operation, attempts, e);
                    return Err(e);
                }
            }
        }
    }
}

/// Whether a Redis error is transient and the command may be retried
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError | redis::ErrorKind::BusyLoadingError | redis::ErrorKind::TryAgain
    )
}

/// Mask credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(proto_end) = url.find("://") {
            let proto = &url[..proto_end + 3];
            let host_part = &url[at_pos..];
            return format!("{}****{}", proto, host_part);
        }
    }
    url.to_string()
}

/// Key with its last segment replaced by a fingerprint
pub(crate) fn log_key(key: &str) -> String {
    match key.rsplit_once(':') {
        Some((namespace, secret)) => format!("{}:{}", namespace, fingerprint(secret)),
        None => fingerprint(key),
    }
}
