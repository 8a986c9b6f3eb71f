//! SQLx-backed persistent cache service.
//!
//! The canonical backend: one row per query hash in the
//! `cached_query_results` table, payloads encrypted at rest, reads bounded by
//! the strategy cutoff and executed on the caller's connection scope.

use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Row};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

use crate::database::ConnectionScope;
use crate::encryption::{EncryptionCodec, ResultStream};
use crate::error::{CacheError, CacheResult};
use crate::logging::log_cache_operation;
use crate::models::CacheEntry;
use crate::strategy::{StrategyDescriptor, StrategyRegistry};

use super::hash_prefix;

/// Persistent cache service backed by PostgreSQL
pub struct PostgresCacheService {
    pool: PgPool,
    codec: Arc<dyn EncryptionCodec>,
    strategies: Arc<StrategyRegistry>,
}

impl PostgresCacheService {
    /// Create a new service over an existing pool
    pub fn new(
        pool: PgPool,
        codec: Arc<dyn EncryptionCodec>,
        strategies: Arc<StrategyRegistry>,
    ) -> Self {
        Self {
            pool,
            codec,
            strategies,
        }
    }

    /// Serve cached results for `query_hash` under the supplied freshness policy
    ///
    /// The bounded read runs on `scope`'s connection, and `scope` must stay
    /// open and current for the life of the responder callback; nested
    /// storage work inside the callback's unit of work reuses the same scope.
    /// A failing lookup statement is fatal to this call. A policy opt-out or
    /// an absent row invokes `respond(None)` and is not an error.
    pub async fn cached_results<R>(
        &self,
        scope: &mut ConnectionScope,
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

        let conn = scope.connection()?;
        let entry = CacheEntry::find_fresh(conn, query_hash, cutoff)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    query_hash = %hash_prefix(query_hash),
                    "Cache lookup statement failed"
                );
                CacheError::Statement(e.to_string())
            })?;

        match entry {
            Some(entry) => {
                debug!(
                    query_hash = %hash_prefix(query_hash),
                    updated_at = %entry.updated_at,
                    size = entry.results.len(),
                    "Cache HIT (postgres)"
                );
                let stream = self.codec.decrypt(Box::new(Cursor::new(entry.results)));
                Ok(respond(Some(stream)))
            }
            None => {
                debug!(query_hash = %hash_prefix(query_hash), "Cache MISS (postgres)");
                Ok(respond(None))
            }
        }
    }

    /// Store results for `query_hash`, replacing any existing row
    ///
    /// Best-effort: every failure is logged and swallowed, degrading to
    /// "did not cache". The caller already holds the computed result.
    pub async fn save_results(&self, query_hash: &[u8], raw_results: &[u8]) {
        let started = Instant::now();

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

        let written_at = Utc::now();

        // Update first; insert only when no row for this hash existed. Two
        // racing first writes can both see zero affected rows and both
        // insert - the duplicate resolves on the next overwrite or purge,
        // and the fetch's ORDER BY ... LIMIT 1 hides it meanwhile.
        match CacheEntry::update_results(&self.pool, query_hash, written_at, &ciphertext).await {
            Ok(rows) if rows > 0 => {
                log_cache_operation(
                    "save",
                    "postgres",
                    Some(&hash_prefix(query_hash)),
                    "updated",
                    Some(started.elapsed().as_millis() as u64),
                    None,
                );
            }
            Ok(_) => {
                if let Err(e) =
                    CacheEntry::insert(&self.pool, query_hash, written_at, &ciphertext).await
                {
                    warn!(
                        error = %e,
                        query_hash = %hash_prefix(query_hash),
                        "Failed to insert cached results - not caching"
                    );
                } else {
                    log_cache_operation(
                        "save",
                        "postgres",
                        Some(&hash_prefix(query_hash)),
                        "inserted",
                        Some(started.elapsed().as_millis() as u64),
                        None,
                    );
                }
            }
            Err(e) => {
                warn!(
                    error = %e,
                    query_hash = %hash_prefix(query_hash),
                    "Failed to update cached results - not caching"
                );
            }
        }
    }

    /// Delete every entry last written at or before `now - max_age_seconds`
    ///
    /// Advisory maintenance: stale rows that survive a failed purge are
    /// still filtered out at read time by the strategy cutoff.
    pub async fn purge_old_entries(&self, max_age_seconds: u64) {
        let started = Instant::now();
        let horizon = purge_horizon(Utc::now(), max_age_seconds);

        match CacheEntry::delete_older_than(&self.pool, horizon).await {
            Ok(deleted) => {
                log_cache_operation(
                    "purge",
                    "postgres",
                    None,
                    "ok",
                    Some(started.elapsed().as_millis() as u64),
                    Some(&format!("{deleted} entries deleted")),
                );
            }
            Err(e) => {
                warn!(error = %e, "Failed to purge cache entries");
            }
        }
    }

    /// Check that the backing database answers queries
    pub async fn health_check(&self) -> CacheResult<bool> {
        let row = sqlx::query("SELECT 1 as health")
            .fetch_one(&self.pool)
            .await
            .map_err(CacheError::from)?;

        let health: i32 = row.get("health");
        Ok(health == 1)
    }

    pub fn provider_name(&self) -> &'static str {
        "postgres"
    }
}

/// Retention horizon for a purge pass, saturating instead of panicking on
/// absurd ages
pub(crate) fn purge_horizon(now: DateTime<Utc>, max_age_seconds: u64) -> DateTime<Utc> {
    let capped = max_age_seconds.min((i64::MAX / 1_000) as u64) as i64;
    now.checked_sub_signed(Duration::seconds(capped))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
