//! # Result Cache Module
//!
//! Persistent, encrypted caching for expensive computed query results.
//!
//! ## Architecture
//!
//! ```text
//! CacheProvider (enum)                 <- Zero-cost dispatch, no vtable
//!   ├── Postgres(PostgresCacheService)   <- SQLx-backed persistent cache
//!   ├── Memory(MemoryCacheService)       <- Process-local map, same semantics
//!   └── NoOp(NoOpCacheService)           <- Always-miss, always-succeed fallback
//! ```
//!
//! ## Design Decisions
//!
//! - **Enum dispatch**: zero vtable overhead on the fetch hot path
//! - **Graceful degradation**: disabled or misconfigured cache → NoOp, never
//!   blocks startup
//! - **Best-effort writes**: save and purge errors are logged but never
//!   propagated; the caller already holds the computed result
//! - **Fatal lookup failures only**: a fetch whose statement cannot be
//!   prepared or executed propagates; every policy opt-out or absent row is
//!   an ordinary miss
//!
//! ## Usage
//!
//! Callers interact with [`CacheProvider`] only. The fetch path borrows the
//! caller's [`crate::database::ConnectionScope`] so the whole unit of work
//! shares one pooled connection.

pub mod provider;
pub mod providers;

pub use provider::CacheProvider;
pub use providers::{MemoryCacheService, NoOpCacheService, PostgresCacheService};
