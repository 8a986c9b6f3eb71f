//! Cache provider facade with enum dispatch.
//!
//! The sole integration surface the rest of the system depends on. Exposes
//! exactly three cache operations - fetch, write, purge - and hides the
//! storage and encryption collaborators behind them. Backend selection
//! happens once at construction; a disabled or misconfigured cache degrades
//! to the no-op backend instead of failing the host process.

use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::ResultCacheConfig;
use crate::database::ConnectionScope;
use crate::encryption::{EncryptionCodec, ResultStream};
use crate::error::CacheResult;
use crate::strategy::{StrategyDescriptor, StrategyRegistry};

use super::providers::{MemoryCacheService, NoOpCacheService, PostgresCacheService};

/// Internal cache backend enum for zero-cost dispatch
///
/// This is an implementation detail. Consumers should use `CacheProvider`.
enum CacheBackend {
    /// SQLx-backed persistent cache (boxed to reduce enum size)
    Postgres(Box<PostgresCacheService>),

    /// Process-local cache with the same semantics
    Memory(Box<MemoryCacheService>),

    /// No-op cache provider (always miss, always succeed)
    NoOp(NoOpCacheService),
}

impl CacheBackend {
    fn provider_name(&self) -> &'static str {
        match self {
            Self::Postgres(s) => s.provider_name(),
            Self::Memory(s) => s.provider_name(),
            Self::NoOp(s) => s.provider_name(),
        }
    }

    fn is_enabled(&self) -> bool {
        !matches!(self, Self::NoOp(_))
    }

    async fn cached_results<R>(
        &self,
        scope: &mut ConnectionScope,
        query_hash: &[u8],
        strategy: &StrategyDescriptor,
        respond: impl FnOnce(Option<ResultStream>) -> R,
    ) -> CacheResult<R> {
        match self {
            Self::Postgres(s) => s.cached_results(scope, query_hash, strategy, respond).await,
            Self::Memory(s) => s.cached_results(scope, query_hash, strategy, respond).await,
            Self::NoOp(s) => s.cached_results(scope, query_hash, strategy, respond).await,
        }
    }

    async fn save_results(&self, query_hash: &[u8], raw_results: &[u8]) {
        match self {
            Self::Postgres(s) => s.save_results(query_hash, raw_results).await,
            Self::Memory(s) => s.save_results(query_hash, raw_results).await,
            Self::NoOp(s) => s.save_results(query_hash, raw_results).await,
        }
    }

    async fn purge_old_entries(&self, max_age_seconds: u64) {
        match self {
            Self::Postgres(s) => s.purge_old_entries(max_age_seconds).await,
            Self::Memory(s) => s.purge_old_entries(max_age_seconds).await,
            Self::NoOp(s) => s.purge_old_entries(max_age_seconds).await,
        }
    }

    async fn health_check(&self) -> CacheResult<bool> {
        match self {
            Self::Postgres(s) => s.health_check().await,
            Self::Memory(s) => s.health_check().await,
            Self::NoOp(s) => s.health_check().await,
        }
    }
}

/// Facade over the configured cache backend
///
/// The three operations mirror the cache's contract with the surrounding
/// system:
///
/// - [`cached_results`](Self::cached_results) - serve a fresh entry through
///   a responder callback, or `None` on any miss
/// - [`save_results`](Self::save_results) - best-effort write, never fails
///   the caller
/// - [`purge_old_entries`](Self::purge_old_entries) - best-effort retention
///   sweep, invoked by an external scheduler
pub struct CacheProvider {
    backend: CacheBackend,
}

impl std::fmt::Debug for CacheProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheProvider")
            .field("backend", &self.backend.provider_name())
            .finish()
    }
}

impl CacheProvider {
    /// Create a cache provider from configuration with graceful degradation
    ///
    /// A disabled cache, an unknown backend name, or a SQL backend without a
    /// pool all yield the no-op provider with a log line; construction never
    /// fails the host process.
    pub fn from_config_graceful(
        config: &ResultCacheConfig,
        pool: Option<PgPool>,
        codec: Arc<dyn EncryptionCodec>,
        strategies: Arc<StrategyRegistry>,
    ) -> Self {
        if !config.enabled {
            info!("Result cache disabled by configuration");
            return Self::noop();
        }

        match config.backend.as_str() {
            "postgres" | "sql" => match pool {
                Some(pool) => {
                    info!(
                        backend = "postgres",
                        codec = codec.codec_name(),
                        "Result cache provider initialized"
                    );
                    Self::postgres(pool, codec, strategies)
                }
                None => {
                    warn!(
                        "Postgres cache backend configured but no pool supplied, falling back to NoOp"
                    );
                    Self::noop()
                }
            },
            "memory" | "in-memory" => {
                info!(backend = "memory", "Result cache provider initialized");
                Self::memory(codec, strategies)
            }
            other => {
                warn!(backend = other, "Unknown cache backend, falling back to NoOp");
                Self::noop()
            }
        }
    }

    /// Create a Postgres-backed provider
    pub fn postgres(
        pool: PgPool,
        codec: Arc<dyn EncryptionCodec>,
        strategies: Arc<StrategyRegistry>,
    ) -> Self {
        Self {
            backend: CacheBackend::Postgres(Box::new(PostgresCacheService::new(
                pool, codec, strategies,
            ))),
        }
    }

    /// Create an in-memory provider
    pub fn memory(codec: Arc<dyn EncryptionCodec>, strategies: Arc<StrategyRegistry>) -> Self {
        Self {
            backend: CacheBackend::Memory(Box::new(MemoryCacheService::new(codec, strategies))),
        }
    }

    /// Create a NoOp provider (for explicit opt-out or testing)
    pub fn noop() -> Self {
        Self {
            backend: CacheBackend::NoOp(NoOpCacheService::new()),
        }
    }

    /// Check if caching is actually enabled (not NoOp)
    pub fn is_enabled(&self) -> bool {
        self.backend.is_enabled()
    }

    /// Get the provider name
    pub fn provider_name(&self) -> &'static str {
        self.backend.provider_name()
    }

    /// Serve cached results for `query_hash` under the supplied freshness policy
    ///
    /// `scope` must stay open and current for the life of the responder
    /// callback; nested storage work inside the callback's unit of work
    /// reuses this same scope rather than acquiring a new connection.
    pub async fn cached_results<R>(
        &self,
        scope: &mut ConnectionScope,
        query_hash: &[u8],
        strategy: &StrategyDescriptor,
        respond: impl FnOnce(Option<ResultStream>) -> R,
    ) -> CacheResult<R> {
        self.backend
            .cached_results(scope, query_hash, strategy, respond)
            .await
    }

    /// Store results for `query_hash`, replacing any existing entry
    ///
    /// Best-effort: failures are logged and swallowed.
    pub async fn save_results(&self, query_hash: &[u8], raw_results: &[u8]) {
        self.backend.save_results(query_hash, raw_results).await;
    }

    /// Delete entries last written at or before `now - max_age_seconds`
    ///
    /// Best-effort: failures are logged and swallowed.
    pub async fn purge_old_entries(&self, max_age_seconds: u64) {
        self.backend.purge_old_entries(max_age_seconds).await;
    }

    /// Health check the cache backend
    pub async fn health_check(&self) -> CacheResult<bool> {
        self.backend.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encryption::PassthroughCodec;

    fn codec() -> Arc<dyn EncryptionCodec> {
        Arc::new(PassthroughCodec::new())
    }

    fn strategies() -> Arc<StrategyRegistry> {
        Arc::new(StrategyRegistry::builtin())
    }

    #[tokio::test]
    async fn test_noop_provider_is_not_enabled() {
        let provider = CacheProvider::noop();
        assert!(!provider.is_enabled());
        assert_eq!(provider.provider_name(), "noop");
    }

    #[tokio::test]
    async fn test_from_config_disabled() {
        let config = ResultCacheConfig {
            enabled: false,
            ..ResultCacheConfig::default()
        };
        let provider = CacheProvider::from_config_graceful(&config, None, codec(), strategies());
        assert!(!provider.is_enabled());
    }

    #[tokio::test]
    async fn test_from_config_unknown_backend() {
        let config = ResultCacheConfig {
            enabled: true,
            backend: "unknown_backend".to_string(),
            ..ResultCacheConfig::default()
        };
        let provider = CacheProvider::from_config_graceful(&config, None, codec(), strategies());
        assert!(!provider.is_enabled());
    }

    #[tokio::test]
    async fn test_from_config_postgres_without_pool() {
        let config = ResultCacheConfig {
            enabled: true,
            backend: "postgres".to_string(),
            ..ResultCacheConfig::default()
        };
        let provider = CacheProvider::from_config_graceful(&config, None, codec(), strategies());
        // Falls back to NoOp when no pool is supplied
        assert!(!provider.is_enabled());
    }

    #[tokio::test]
    async fn test_from_config_memory() {
        let config = ResultCacheConfig {
            enabled: true,
            backend: "memory".to_string(),
            ..ResultCacheConfig::default()
        };
        let provider = CacheProvider::from_config_graceful(&config, None, codec(), strategies());
        assert!(provider.is_enabled());
        assert_eq!(provider.provider_name(), "memory");
    }

    #[tokio::test]
    async fn test_from_config_in_memory_alias() {
        let config = ResultCacheConfig {
            enabled: true,
            backend: "in-memory".to_string(),
            ..ResultCacheConfig::default()
        };
        let provider = CacheProvider::from_config_graceful(&config, None, codec(), strategies());
        assert_eq!(provider.provider_name(), "memory");
    }

    #[tokio::test]
    async fn test_debug_shows_backend_name() {
        let provider = CacheProvider::noop();
        assert_eq!(format!("{provider:?}"), "CacheProvider { backend: \"noop\" }");
    }
}
