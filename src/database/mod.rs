//! Database connectivity and SQL management for the cache table.

pub mod connection;
pub mod migrations;
pub mod sql;

pub use connection::{ConnectionScope, DatabaseConnection};
pub use migrations::CacheSchema;
pub use sql::{CacheStatements, SqlDialect, CACHE_TABLE};
