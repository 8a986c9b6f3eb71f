//! No-op cache provider
//!
//! Always misses, always succeeds. Used when result caching is disabled or
//! when the configured backend cannot be constructed (graceful degradation).

use tracing::debug;

use crate::database::ConnectionScope;
use crate::encryption::ResultStream;
use crate::error::CacheResult;
use crate::strategy::StrategyDescriptor;

/// No-op cache service that never caches anything
///
/// Every fetch responds with `None`, every write and purge succeeds
/// silently.
#[derive(Debug, Clone, Default)]
pub struct NoOpCacheService;

impl NoOpCacheService {
    /// Create a new no-op cache service
    pub fn new() -> Self {
        Self
    }

    pub async fn cached_results<R>(
        &self,
        _scope: &mut ConnectionScope,
        _query_hash: &[u8],
        _strategy: &StrategyDescriptor,
        respond: impl FnOnce(Option<ResultStream>) -> R,
    ) -> CacheResult<R> {
        Ok(respond(None))
    }

    pub async fn save_results(&self, _query_hash: &[u8], _raw_results: &[u8]) {
        debug!("Result caching disabled - skipping save");
    }

    pub async fn purge_old_entries(&self, _max_age_seconds: u64) {}

    pub async fn health_check(&self) -> CacheResult<bool> {
        Ok(true)
    }

    pub fn provider_name(&self) -> &'static str {
        "noop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_fetch_always_misses() {
        let service = NoOpCacheService::new();
        let mut scope = ConnectionScope::detached();
        let seen = service
            .cached_results(
                &mut scope,
                b"hash",
                &StrategyDescriptor::ttl(2.0, 1000.0),
                |stream| stream.is_some(),
            )
            .await
            .unwrap();
        assert!(!seen);
    }

    #[tokio::test]
    async fn test_noop_save_succeeds() {
        NoOpCacheService::new().save_results(b"hash", b"bytes").await;
    }

    #[tokio::test]
    async fn test_noop_purge_succeeds() {
        NoOpCacheService::new().purge_old_entries(60).await;
    }

    #[tokio::test]
    async fn test_noop_health_check_returns_true() {
        assert!(NoOpCacheService::new().health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_noop_provider_name() {
        assert_eq!(NoOpCacheService::new().provider_name(), "noop");
    }
}
