//! Process-local cache service.
//!
//! Honors the same cutoff, upsert, and purge semantics as the Postgres
//! backend over a plain map, and stores ciphertext so the decrypt path is
//! shared. Not persistent and not shared across processes - useful for
//! single-instance deployments and tests.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::database::ConnectionScope;
use crate::encryption::{EncryptionCodec, ResultStream};
use crate::error::CacheResult;
use crate::strategy::{StrategyDescriptor, StrategyRegistry};

use super::postgres::purge_horizon;
use super::hash_prefix;

struct StoredEntry {
    updated_at: DateTime<Utc>,
    ciphertext: Vec<u8>,
}

/// In-memory cache service
pub struct MemoryCacheService {
    entries: RwLock<HashMap<Vec<u8>, StoredEntry>>,
    codec: Arc<dyn EncryptionCodec>,
    strategies: Arc<StrategyRegistry>,
}

impl MemoryCacheService {
    /// Create an empty in-memory cache
    pub fn new(codec: Arc<dyn EncryptionCodec>, strategies: Arc<StrategyRegistry>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            codec,
            strategies,
        }
    }

    /// Serve cached results under the supplied freshness policy
    ///
    /// The connection scope is accepted for signature parity but unused -
    /// this backend keeps no per-request storage state.
    pub async fn cached_results<R>(
        &self,
        _scope: &mut ConnectionScope,
        query_hash: &[u8],
        strategy: &StrategyDescriptor,
        respond: impl FnOnce(Option<ResultStream>) -> R,
    ) -> CacheResult<R> {
        let Some(cutoff) = self.strategies.evaluate(strategy) else {
            debug!(
                strategy = %strategy.strategy_type,
                query_hash = %hash_prefix(query_hash),
                "No cutoff for strategy - skipping cache lookup"
            );
            return Ok(respond(None));
        };

        let ciphertext = {
            let entries = self.entries.read();
            entries
                .get(query_hash)
                .filter(|entry| entry.updated_at >= cutoff)
                .map(|entry| entry.ciphertext.clone())
        };

        match ciphertext {
            Some(ciphertext) => {
                debug!(query_hash = %hash_prefix(query_hash), "Cache HIT (memory)");
                let stream = self.codec.decrypt(Box::new(Cursor::new(ciphertext)));
                Ok(respond(Some(stream)))
            }
            None => {
                debug!(query_hash = %hash_prefix(query_hash), "Cache MISS (memory)");
                Ok(respond(None))
            }
        }
    }

    /// Store results for `query_hash`, replacing any existing entry
    pub async fn save_results(&self, query_hash: &[u8], raw_results: &[u8]) {
        let ciphertext = match self.codec.encrypt(raw_results) {
            Ok(ciphertext) => ciphertext,
            Err(e) => {
                warn!(
                    error = %e,
                    query_hash = %hash_prefix(query_hash),
                    "Failed to encrypt results - not caching"
                );
                return;
            }
        };

        let updated_at = Utc::now();
        self.entries.write().insert(
            query_hash.to_vec(),
            StoredEntry {
                updated_at,
                ciphertext,
            },
        );
        debug!(query_hash = %hash_prefix(query_hash), "Cache SET (memory)");
    }

    /// Drop every entry last written at or before `now - max_age_seconds`
    pub async fn purge_old_entries(&self, max_age_seconds: u64) {
        let horizon = purge_horizon(Utc::now(), max_age_seconds);

        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.updated_at > horizon);

        debug!(deleted = before - entries.len(), "Cache PURGE (memory)");
    }

    /// In-memory cache is always healthy
    pub async fn health_check(&self) -> CacheResult<bool> {
        Ok(true)
    }

    pub fn provider_name(&self) -> &'static str {
        "memory"
    }

    /// Number of entries currently held, for diagnostics
    pub fn entry_count(&self) -> usize {
        self.entries.read().len()
    }
}
