//! Caller-supplied freshness policy descriptor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_multiplier() -> f64 {
    1.0
}

/// Freshness policy descriptor attached to each fetch
///
/// Ephemeral and producer-defined: the surrounding system ships these as JSON
/// alongside the query hash. Nothing in here is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyDescriptor {
    /// Policy tag resolved through the strategy registry ("ttl", "none", ...)
    #[serde(rename = "type")]
    pub strategy_type: String,

    /// Scale factor applied to the staleness window
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Expected cost of recomputing the query, in milliseconds
    ///
    /// Required by the TTL strategy; a descriptor without it always misses.
    #[serde(default)]
    pub avg_execution_ms: Option<f64>,

    /// Explicit lower bound below which cached data is invalid regardless of age
    ///
    /// Set when the underlying source data changed. Always wins over the TTL
    /// window.
    #[serde(default)]
    pub invalidated_at: Option<DateTime<Utc>>,
}

impl StrategyDescriptor {
    /// Build a TTL descriptor from a staleness multiplier and recomputation cost
    pub fn ttl(multiplier: f64, avg_execution_ms: f64) -> Self {
        Self {
            strategy_type: "ttl".to_string(),
            multiplier,
            avg_execution_ms: Some(avg_execution_ms),
            invalidated_at: None,
        }
    }

    /// Build a descriptor that never serves cached results
    pub fn none() -> Self {
        Self {
            strategy_type: "none".to_string(),
            multiplier: default_multiplier(),
            avg_execution_ms: None,
            invalidated_at: None,
        }
    }

    /// Attach an explicit invalidation lower bound
    pub fn with_invalidated_at(mut self, invalidated_at: DateTime<Utc>) -> Self {
        self.invalidated_at = Some(invalidated_at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_deserializes_producer_shape() {
        let descriptor: StrategyDescriptor = serde_json::from_str(
            r#"{"type": "ttl", "multiplier": 2.0, "avg_execution_ms": 1500.0}"#,
        )
        .unwrap();
        assert_eq!(descriptor.strategy_type, "ttl");
        assert_eq!(descriptor.multiplier, 2.0);
        assert_eq!(descriptor.avg_execution_ms, Some(1500.0));
        assert!(descriptor.invalidated_at.is_none());
    }

    #[test]
    fn test_multiplier_defaults_to_one() {
        let descriptor: StrategyDescriptor =
            serde_json::from_str(r#"{"type": "ttl", "avg_execution_ms": 100.0}"#).unwrap();
        assert_eq!(descriptor.multiplier, 1.0);
    }

    #[test]
    fn test_deserializes_invalidated_at() {
        let descriptor: StrategyDescriptor = serde_json::from_str(
            r#"{"type": "ttl", "multiplier": 1.0, "avg_execution_ms": 100.0, "invalidated_at": "2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(
            descriptor.invalidated_at,
            Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_ttl_constructor() {
        let descriptor = StrategyDescriptor::ttl(2.0, 1000.0);
        assert_eq!(descriptor.strategy_type, "ttl");
        assert_eq!(descriptor.avg_execution_ms, Some(1000.0));
    }
}
