//! Both in-process backend shapes run the same store conformance suite

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tl_core::repositories::{
        MemoryResetTokenStore, MemoryResetTokenTable, MemoryRevocationStore,
        MemoryRevocationTable, ResetTokenStore, RevocationStore,
    };
    use tl_core::testing;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_ephemeral_revocation_store_conforms() {
        testing::revocation_store_suite(Arc::new(MemoryRevocationStore::new())).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_durable_revocation_table_conforms() {
        testing::revocation_store_suite(Arc::new(MemoryRevocationTable::new())).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_ephemeral_reset_token_store_conforms() {
        testing::reset_token_store_suite(Arc::new(MemoryResetTokenStore::new())).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_durable_reset_token_table_conforms() {
        testing::reset_token_store_suite(Arc::new(MemoryResetTokenTable::new())).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_suites_accept_trait_objects() {
        let revocations: Arc<dyn RevocationStore> = Arc::new(MemoryRevocationTable::new());
        let reset_tokens: Arc<dyn ResetTokenStore> = Arc::new(MemoryResetTokenStore::new());

        testing::revocation_store_suite(revocations).await;
        testing::reset_token_store_suite(reset_tokens).await;
    }
}
