//! Backend selection for the token stores
//!
//! Both stores always share one backend, picked by
//! [`StoreConfig::backend`](tl_shared::config::StoreConfig).

use std::sync::Arc;

use tl_core::repositories::{
    MemoryResetTokenStore, MemoryRevocationStore, ResetTokenStore, RevocationStore,
};
use tl_shared::config::{AppConfig, StoreBackend};
use tracing::info;

use crate::cache::{RedisClient, RedisResetTokenStore, RedisRevocationStore};
use crate::database::{DatabasePool, MySqlResetTokenStore, MySqlRevocationStore};
use crate::InfrastructureError;

/// The pair of stores the token services run against
#[derive(Clone)]
pub struct TokenStores {
    pub backend: StoreBackend,
    pub revocations: Arc<dyn RevocationStore>,
    pub reset_tokens: Arc<dyn ResetTokenStore>,
}

impl TokenStores {
    /// In-process stores, no external service needed
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            revocations: Arc::new(MemoryRevocationStore::new()),
            reset_tokens: Arc::new(MemoryResetTokenStore::new()),
        }
    }

    /// Whether the sweep scheduler must run to keep storage bounded
    pub fn requires_sweep(&self) -> bool {
        self.backend.requires_sweep()
    }
}

/// Connect the backend named in the configuration and build both stores
///
/// The durable backend creates its tables when they are missing.
pub async fn build_stores(config: &AppConfig) -> Result<TokenStores, InfrastructureError> {
    let backend = config.store.backend;
    info!(%backend, "Building token stores");

    let stores = match backend {
        StoreBackend::Ephemeral => {
            let client = RedisClient::new(config.cache.clone()).await?;
            TokenStores {
                backend,
                revocations: Arc::new(RedisRevocationStore::new(client.clone())),
                reset_tokens: Arc::new(RedisResetTokenStore::new(client)),
            }
        }
        StoreBackend::Durable => {
            let pool = DatabasePool::new(config.database.clone()).await?;

            let revocations = MySqlRevocationStore::from_pool(&pool);
            revocations.ensure_schema().await?;
            let reset_tokens = MySqlResetTokenStore::from_pool(&pool);
            reset_tokens.ensure_schema().await?;

            TokenStores {
                backend,
                revocations: Arc::new(revocations),
                reset_tokens: Arc::new(reset_tokens),
            }
        }
        StoreBackend::Memory => TokenStores::memory(),
    };

    Ok(stores)
}
