//! MySQL connection pool for the durable stores

use std::str::FromStr;
use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{ConnectOptions, MySqlPool};
use tl_shared::config::DatabaseConfig;
use tracing::log::LevelFilter;
use tracing::{error, info};

use crate::{bounded, InfrastructureError};

/// Idle connections are closed after this long
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Connections are recycled after this long
const MAX_LIFETIME: Duration = Duration::from_secs(1800);

/// Statements slower than this are logged at warn level
const SLOW_STATEMENT: Duration = Duration::from_secs(1);

/// SQLx pool plus the per-operation time budget for the stores built on it
#[derive(Clone)]
pub struct DatabasePool {
    pool: MySqlPool,
    operation_timeout: Duration,
}

impl DatabasePool {
    /// Connect a pool sized and timed from `config`
    ///
    /// # Errors
    /// * `InfrastructureError::Config` - Unparseable URL
    /// * `InfrastructureError::Database` - No connection could be established
    pub async fn new(config: DatabaseConfig) -> Result<Self, InfrastructureError> {
        let options = connect_options(&config.url)?;

        info!(
            max_connections = config.max_connections,
            "Connecting MySQL pool"
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections.min(config.max_connections))
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(IDLE_TIMEOUT)
            .max_lifetime(MAX_LIFETIME)
            .test_before_acquire(true)
            .connect_with(options)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to connect MySQL pool");
                InfrastructureError::Database(e)
            })?;

        Ok(Self {
            pool,
            operation_timeout: Duration::from_millis(config.operation_timeout_ms),
        })
    }

    pub fn get_pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Upper bound for a single statement or transaction
    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }

    /// Round-trips `SELECT 1`
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let value = bounded("db.health_check", self.operation_timeout, async {
            Ok(sqlx::query_scalar::<_, i64>("SELECT 1")
                .fetch_one(&self.pool)
                .await?)
        })
        .await?;

        Ok(value == 1)
    }

    pub fn get_statistics(&self) -> PoolStatistics {
        PoolStatistics {
            connections: self.pool.size(),
            idle_connections: self.pool.num_idle(),
            max_connections: self.pool.options().get_max_connections(),
        }
    }

    pub async fn close(&self) {
        info!("Closing MySQL pool");
        self.pool.close().await;
    }
}

fn connect_options(url: &str) -> Result<MySqlConnectOptions, InfrastructureError> {
    let options = MySqlConnectOptions::from_str(url)
        .map_err(|e| InfrastructureError::Config(format!("Invalid database URL: {}", e)))?;

    Ok(options
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, SLOW_STATEMENT))
}

/// Snapshot of pool occupancy
#[derive(Debug, Clone)]
pub struct PoolStatistics {
    pub connections: u32,
    pub idle_connections: usize,
    pub max_connections: u32,
}

impl std::fmt::Display for PoolStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Pool Stats: {}/{} connections ({} idle)",
            self.connections, self.max_connections, self.idle_connections
        )
    }
}
