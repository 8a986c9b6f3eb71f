#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Querycache Core
//!
//! Persistent, encrypted result cache for expensive computed query results,
//! keyed by a content hash of the query.
//!
//! ## Overview
//!
//! The cache answers three questions for the surrounding computation
//! pipeline: is there a stored result for this hash that is still fresh
//! under the caller's staleness policy; store a new result for a hash,
//! replacing any existing one; and evict entries older than a global
//! retention horizon. Cache failures never break the primary computation
//! path - only a failing fetch statement is ever visible to a caller, and
//! only to the immediate caller of the fetch.
//!
//! ## Architecture
//!
//! - [`cache`] - provider facade and the Postgres/memory/no-op backends
//! - [`strategy`] - pluggable freshness policies and the extension registry
//! - [`encryption`] - codec seam; payloads are ciphertext at rest
//! - [`database`] - pool setup, connection scopes, SQL templates, schema
//! - [`models`] - the persisted cache entry and its row operations
//! - [`config`] - environment-aware configuration
//! - [`error`] - structured error handling
//! - [`logging`] - structured logging setup
//!
//! ## Connection Discipline
//!
//! Fetches run inside a caller-supplied [`database::ConnectionScope`] and
//! the responder callback runs while that scope is still current. Reusing
//! one pooled connection across the whole unit of work is what keeps a
//! small pool from deadlocking when callers nest storage operations inside
//! the callback.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use querycache_core::cache::CacheProvider;
//! use querycache_core::config::ResultCacheConfig;
//! use querycache_core::database::ConnectionScope;
//! use querycache_core::encryption::PassthroughCodec;
//! use querycache_core::strategy::{StrategyDescriptor, StrategyRegistry};
//! use sqlx::PgPool;
//! use std::io::Read;
//! use std::sync::Arc;
//!
//! # async fn example(pool: PgPool, query_hash: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//! let config = ResultCacheConfig::from_environment();
//! let cache = CacheProvider::from_config_graceful(
//!     &config,
//!     Some(pool.clone()),
//!     Arc::new(PassthroughCodec::new()),
//!     Arc::new(StrategyRegistry::builtin()),
//! );
//!
//! let mut scope = ConnectionScope::acquire(&pool).await?;
//! let strategy = StrategyDescriptor::ttl(2.0, 1500.0);
//! let cached = cache
//!     .cached_results(&mut scope, query_hash, &strategy, |stream| {
//!         stream.map(|mut stream| {
//!             let mut bytes = Vec::new();
//!             stream.read_to_end(&mut bytes).map(|_| bytes)
//!         })
//!     })
//!     .await?;
//!
//! match cached {
//!     Some(bytes) => println!("cache hit: {} bytes", bytes?.len()),
//!     None => {
//!         // compute elsewhere, then:
//!         cache.save_results(query_hash, b"computed results").await;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod database;
pub mod encryption;
pub mod error;
pub mod logging;
pub mod models;
pub mod strategy;

pub use cache::{CacheProvider, MemoryCacheService, NoOpCacheService, PostgresCacheService};
pub use config::ResultCacheConfig;
pub use database::{CacheSchema, CacheStatements, ConnectionScope, DatabaseConnection, SqlDialect};
pub use encryption::{EncryptionCodec, PassthroughCodec, ResultStream};
pub use error::{CacheError, CacheResult};
pub use models::CacheEntry;
pub use strategy::{
    FreshnessStrategy, NoCacheStrategy, StrategyDescriptor, StrategyRegistry, TtlStrategy,
};
