//! Dialect-keyed cache of the parameterized statements run against the cache
//! table.
//!
//! Statements are built once per distinct dialect encountered and memoized
//! process-wide. The map is keyed rather than global so a dialect change
//! (e.g. across test environments) builds a fresh set instead of serving
//! statements for the wrong dialect.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// The single table this crate persists to
pub const CACHE_TABLE: &str = "cached_query_results";

/// Placeholder syntax family for parameterized statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlDialect {
    /// `$1`-style positional placeholders
    Postgres,
    /// `?`-style positional placeholders
    Ansi,
}

impl SqlDialect {
    fn placeholder(self, position: usize) -> String {
        match self {
            SqlDialect::Postgres => format!("${position}"),
            SqlDialect::Ansi => "?".to_string(),
        }
    }
}

/// Compiled statement templates for one dialect
#[derive(Debug, Clone)]
pub struct CacheStatements {
    /// Bounded read: `(hash, cutoff)`, newest first, at most one row
    pub select_fresh: String,
    /// Overwrite payload and timestamp for an existing hash: `(hash, updated_at, results)`
    pub update_results: String,
    /// First write for a hash: `(hash, updated_at, results)`
    pub insert_entry: String,
    /// Retention sweep: `(horizon)`
    pub delete_older_than: String,
}

impl CacheStatements {
    fn build(dialect: SqlDialect) -> Self {
        let p1 = dialect.placeholder(1);
        let p2 = dialect.placeholder(2);
        let p3 = dialect.placeholder(3);

        Self {
            select_fresh: format!(
                "SELECT query_hash, updated_at, results FROM {CACHE_TABLE} \
                 WHERE query_hash = {p1} AND updated_at >= {p2} \
                 ORDER BY updated_at DESC LIMIT 1"
            ),
            update_results: format!(
                "UPDATE {CACHE_TABLE} SET updated_at = {p2}, results = {p3} \
                 WHERE query_hash = {p1}"
            ),
            insert_entry: format!(
                "INSERT INTO {CACHE_TABLE} (query_hash, updated_at, results) \
                 VALUES ({p1}, {p2}, {p3})"
            ),
            delete_older_than: format!("DELETE FROM {CACHE_TABLE} WHERE updated_at <= {p1}"),
        }
    }

    /// Statements for the given dialect, built on first use and memoized
    pub fn for_dialect(dialect: SqlDialect) -> Arc<CacheStatements> {
        static STATEMENTS: OnceLock<RwLock<HashMap<SqlDialect, Arc<CacheStatements>>>> =
            OnceLock::new();

        let cache = STATEMENTS.get_or_init(|| RwLock::new(HashMap::new()));

        if let Some(statements) = cache.read().get(&dialect) {
            return Arc::clone(statements);
        }

        let built = Arc::new(Self::build(dialect));
        Arc::clone(cache.write().entry(dialect).or_insert(built))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_are_memoized_per_dialect() {
        let first = CacheStatements::for_dialect(SqlDialect::Postgres);
        let second = CacheStatements::for_dialect(SqlDialect::Postgres);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_distinct_dialects_build_distinct_statements() {
        let postgres = CacheStatements::for_dialect(SqlDialect::Postgres);
        let ansi = CacheStatements::for_dialect(SqlDialect::Ansi);
        assert!(!Arc::ptr_eq(&postgres, &ansi));
        assert!(postgres.select_fresh.contains("$1"));
        assert!(ansi.select_fresh.contains('?'));
        assert!(!ansi.select_fresh.contains('$'));
    }

    #[test]
    fn test_select_is_bounded_and_ordered() {
        let statements = CacheStatements::for_dialect(SqlDialect::Postgres);
        assert!(statements.select_fresh.contains("updated_at >= $2"));
        assert!(statements
            .select_fresh
            .contains("ORDER BY updated_at DESC LIMIT 1"));
    }

    #[test]
    fn test_update_touches_timestamp_and_payload() {
        let statements = CacheStatements::for_dialect(SqlDialect::Postgres);
        assert!(statements.update_results.starts_with("UPDATE"));
        assert!(statements.update_results.contains("updated_at = $2"));
        assert!(statements.update_results.contains("results = $3"));
    }

    #[test]
    fn test_delete_sweeps_at_or_before_horizon() {
        let statements = CacheStatements::for_dialect(SqlDialect::Postgres);
        assert!(statements.delete_older_than.contains("updated_at <= $1"));
    }
}
