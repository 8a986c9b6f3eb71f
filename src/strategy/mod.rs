//! # Freshness Strategy Module
//!
//! Pluggable freshness policies for cached query results.
//!
//! ## Overview
//!
//! Every fetch carries a [`StrategyDescriptor`] naming a policy and its
//! parameters. A [`FreshnessStrategy`] turns the descriptor into a *cutoff*:
//! the minimum `updated_at` a cached entry must have to be served. A strategy
//! may instead opt out entirely by returning `None`, which the fetch path
//! treats as a guaranteed cache miss rather than an error.
//!
//! ## Extension Point
//!
//! Built-in strategies (`ttl`, `none`) cover the baseline configuration.
//! Deployments can register additional evaluators on the
//! [`StrategyRegistry`] at process start, keyed by the descriptor's `type`
//! tag, without modifying this crate.

pub mod descriptor;
pub mod registry;
pub mod ttl;

pub use descriptor::StrategyDescriptor;
pub use registry::{NoCacheStrategy, StrategyRegistry};
pub use ttl::TtlStrategy;

use chrono::{DateTime, Utc};

/// Computes the minimum acceptable `updated_at` for a cached entry
///
/// Returning `None` signals that no cached entry should be served for this
/// descriptor at all - a deliberate opt-out, not a failure.
pub trait FreshnessStrategy: Send + Sync {
    /// Evaluate the descriptor against the given instant
    fn evaluate(&self, descriptor: &StrategyDescriptor, now: DateTime<Utc>)
        -> Option<DateTime<Utc>>;
}
