//! The persisted cache entry and its row-level operations.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};
use std::sync::Arc;

use crate::database::sql::{CacheStatements, SqlDialect};

/// One row of the cache table: the encrypted results for a query hash
///
/// `query_hash` is the logical key. The upsert in the writer keeps at most
/// one row per hash; there is no uniqueness constraint backing that up, so a
/// racing pair of first writes can leave a transient duplicate that the next
/// overwrite or purge cycle resolves.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CacheEntry {
    /// Content fingerprint of the query this row caches
    pub query_hash: Vec<u8>,
    /// Timestamp of the last write, replaced wholesale on overwrite
    pub updated_at: DateTime<Utc>,
    /// Encrypted result payload
    pub results: Vec<u8>,
}

impl CacheEntry {
    fn statements() -> Arc<CacheStatements> {
        CacheStatements::for_dialect(SqlDialect::Postgres)
    }

    /// Newest row for `query_hash` with `updated_at >= cutoff`, if any
    ///
    /// Runs on the scope-bound connection so the surrounding unit of work
    /// never checks a second connection out of the pool.
    pub async fn find_fresh(
        conn: &mut PgConnection,
        query_hash: &[u8],
        cutoff: DateTime<Utc>,
    ) -> Result<Option<CacheEntry>, sqlx::Error> {
        let statements = Self::statements();
        sqlx::query_as::<_, CacheEntry>(&statements.select_fresh)
            .bind(query_hash)
            .bind(cutoff)
            .fetch_optional(conn)
            .await
    }

    /// Overwrite payload and timestamp for an existing hash
    ///
    /// Returns the affected-row count; zero means no row for this hash
    /// existed and the caller should insert instead.
    pub async fn update_results(
        pool: &PgPool,
        query_hash: &[u8],
        updated_at: DateTime<Utc>,
        results: &[u8],
    ) -> Result<u64, sqlx::Error> {
        let statements = Self::statements();
        let result = sqlx::query(&statements.update_results)
            .bind(query_hash)
            .bind(updated_at)
            .bind(results)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// First write for a hash
    pub async fn insert(
        pool: &PgPool,
        query_hash: &[u8],
        updated_at: DateTime<Utc>,
        results: &[u8],
    ) -> Result<(), sqlx::Error> {
        let statements = Self::statements();
        sqlx::query(&statements.insert_entry)
            .bind(query_hash)
            .bind(updated_at)
            .bind(results)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Delete every row with `updated_at` at or before the horizon
    ///
    /// Returns the number of rows deleted.
    pub async fn delete_older_than(
        pool: &PgPool,
        horizon: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let statements = Self::statements();
        let result = sqlx::query(&statements.delete_older_than)
            .bind(horizon)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
