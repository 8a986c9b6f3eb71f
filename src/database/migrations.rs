//! Schema management for the cache table.
//!
//! One table, one index. `query_hash` deliberately carries no uniqueness
//! constraint: the writer's update-then-insert keeps one row per hash, and
//! the fetch statement's `ORDER BY updated_at DESC LIMIT 1` makes a
//! transient duplicate from racing first writes harmless at read time.

use sqlx::PgPool;
use tracing::info;

use super::sql::CACHE_TABLE;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS cached_query_results (
    query_hash BYTEA NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL,
    results BYTEA NOT NULL
)";

const CREATE_INDEX: &str = "CREATE INDEX IF NOT EXISTS cached_query_results_hash_updated_idx \
    ON cached_query_results (query_hash, updated_at DESC)";

/// Manages the cache table schema
pub struct CacheSchema;

impl CacheSchema {
    /// Create the cache table and its fetch index if they do not exist
    ///
    /// Idempotent; safe to run at every startup.
    pub async fn ensure(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_TABLE).execute(pool).await?;
        sqlx::query(CREATE_INDEX).execute(pool).await?;

        info!(table = CACHE_TABLE, "Cache schema ensured");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ddl_targets_cache_table() {
        assert!(CREATE_TABLE.contains(CACHE_TABLE));
        assert!(CREATE_INDEX.contains(CACHE_TABLE));
    }

    #[test]
    fn test_hash_carries_no_uniqueness_constraint() {
        assert!(!CREATE_TABLE.contains("UNIQUE"));
        assert!(!CREATE_TABLE.contains("PRIMARY KEY"));
        assert!(!CREATE_INDEX.contains("UNIQUE"));
    }

    #[test]
    fn test_index_covers_fetch_shape() {
        assert!(CREATE_INDEX.contains("query_hash, updated_at DESC"));
    }
}
