//! Strategy registry with thread-safe evaluator resolution.
//!
//! Resolution happens on every fetch, registration only at process start, so
//! the map sits behind a read-mostly lock. Unrecognized or edition-gated
//! strategy types resolve to "no cutoff", which the fetch path treats as a
//! guaranteed miss.

use super::ttl::TtlStrategy;
use super::{FreshnessStrategy, StrategyDescriptor};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Built-in `none` strategy: never serves cached results
#[derive(Debug, Clone, Default)]
pub struct NoCacheStrategy;

impl FreshnessStrategy for NoCacheStrategy {
    fn evaluate(&self, _descriptor: &StrategyDescriptor, _now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        None
    }
}

/// Registry mapping strategy type tags to evaluators
///
/// Ships with the `ttl` and `none` built-ins; deployments register
/// additional evaluators at process start to plug in alternative policies
/// without modifying this crate.
pub struct StrategyRegistry {
    evaluators: RwLock<HashMap<String, Arc<dyn FreshnessStrategy>>>,
}

impl StrategyRegistry {
    /// Create a registry with the built-in strategies registered
    pub fn builtin() -> Self {
        let registry = Self::empty();
        registry.register("ttl", Arc::new(TtlStrategy::new()));
        registry.register("none", Arc::new(NoCacheStrategy));
        registry
    }

    /// Create a registry with no strategies at all
    pub fn empty() -> Self {
        Self {
            evaluators: RwLock::new(HashMap::new()),
        }
    }

    /// Register an evaluator for a strategy type tag
    ///
    /// Replaces any evaluator previously registered under the same tag.
    pub fn register(&self, strategy_type: impl Into<String>, evaluator: Arc<dyn FreshnessStrategy>) {
        let strategy_type = strategy_type.into();
        info!(strategy = %strategy_type, "Registered freshness strategy evaluator");
        self.evaluators.write().insert(strategy_type, evaluator);
    }

    /// Resolve and evaluate the descriptor against the current instant
    pub fn evaluate(&self, descriptor: &StrategyDescriptor) -> Option<DateTime<Utc>> {
        self.evaluate_at(descriptor, Utc::now())
    }

    /// Resolve and evaluate the descriptor against a supplied instant
    pub fn evaluate_at(
        &self,
        descriptor: &StrategyDescriptor,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let evaluator = self.evaluators.read().get(&descriptor.strategy_type).cloned();
        match evaluator {
            Some(evaluator) => evaluator.evaluate(descriptor, now),
            None => {
                debug!(
                    strategy = %descriptor.strategy_type,
                    "No evaluator registered for strategy type - treating as uncacheable"
                );
                None
            }
        }
    }

    /// Strategy type tags currently registered, for diagnostics
    pub fn registered_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.evaluators.read().keys().cloned().collect();
        types.sort();
        types
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
