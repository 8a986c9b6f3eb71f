//! Time-to-live freshness strategy.
//!
//! Scales the allowed staleness window by the query's expected recomputation
//! cost: a result that took ten seconds to compute may be trusted longer than
//! one that recomputes in ten milliseconds.

use super::{FreshnessStrategy, StrategyDescriptor};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Built-in `ttl` strategy
///
/// `max_age_ms = multiplier * avg_execution_ms`; the cutoff is
/// `now - max_age_ms`, floored by `invalidated_at` so an explicit
/// invalidation can never be overridden by a permissive TTL window.
#[derive(Debug, Clone, Default)]
pub struct TtlStrategy;

impl TtlStrategy {
    /// Create a new TTL strategy
    pub fn new() -> Self {
        Self
    }
}

impl FreshnessStrategy for TtlStrategy {
    fn evaluate(
        &self,
        descriptor: &StrategyDescriptor,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let Some(avg_execution_ms) = descriptor.avg_execution_ms else {
            debug!(
                strategy = %descriptor.strategy_type,
                "TTL descriptor without avg_execution_ms - treating as uncacheable"
            );
            return None;
        };

        if avg_execution_ms < 0.0 || descriptor.multiplier < 0.0 {
            debug!(
                multiplier = descriptor.multiplier,
                avg_execution_ms, "Negative TTL inputs - treating as uncacheable"
            );
            return None;
        }

        let max_age_ms = descriptor.multiplier * avg_execution_ms;
        let max_age = Duration::milliseconds(max_age_ms.round() as i64);
        let cutoff = now
            .checked_sub_signed(max_age)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        Some(match descriptor.invalidated_at {
            Some(invalidated_at) if invalidated_at > cutoff => invalidated_at,
            _ => cutoff,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn written_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_entry_within_window_is_visible() {
        // multiplier 2 * avg 1000ms = 2s window; evaluated 1999ms after the write
        let descriptor = StrategyDescriptor::ttl(2.0, 1000.0);
        let now = written_at() + Duration::milliseconds(1999);

        let cutoff = TtlStrategy::new().evaluate(&descriptor, now).unwrap();
        assert_eq!(cutoff, written_at() - Duration::milliseconds(1));
        assert!(written_at() >= cutoff, "entry written at T must pass the cutoff");
    }

    #[test]
    fn test_entry_past_window_is_stale() {
        let descriptor = StrategyDescriptor::ttl(2.0, 1000.0);
        let now = written_at() + Duration::milliseconds(2001);

        let cutoff = TtlStrategy::new().evaluate(&descriptor, now).unwrap();
        assert_eq!(cutoff, written_at() + Duration::milliseconds(1));
        assert!(written_at() < cutoff, "entry written at T must fail the cutoff");
    }

    #[test]
    fn test_invalidation_overrides_permissive_window() {
        // A week-long window cannot resurrect data invalidated moments ago.
        let invalidated_at = written_at() + Duration::milliseconds(5000);
        let descriptor =
            StrategyDescriptor::ttl(1000.0, 1000.0).with_invalidated_at(invalidated_at);
        let now = written_at() + Duration::milliseconds(10);

        let cutoff = TtlStrategy::new().evaluate(&descriptor, now).unwrap();
        assert_eq!(cutoff, invalidated_at);
        assert!(written_at() < cutoff, "invalidated entry must fail the cutoff");
    }

    #[test]
    fn test_stale_invalidation_does_not_tighten_window() {
        let invalidated_at = written_at() - Duration::days(30);
        let descriptor = StrategyDescriptor::ttl(2.0, 1000.0).with_invalidated_at(invalidated_at);
        let now = written_at() + Duration::milliseconds(500);

        let cutoff = TtlStrategy::new().evaluate(&descriptor, now).unwrap();
        assert_eq!(cutoff, now - Duration::milliseconds(2000));
    }

    #[test]
    fn test_missing_avg_execution_ms_opts_out() {
        let descriptor = StrategyDescriptor {
            avg_execution_ms: None,
            ..StrategyDescriptor::ttl(2.0, 0.0)
        };
        assert!(TtlStrategy::new().evaluate(&descriptor, written_at()).is_none());
    }

    #[test]
    fn test_negative_inputs_opt_out() {
        let descriptor = StrategyDescriptor::ttl(-1.0, 1000.0);
        assert!(TtlStrategy::new().evaluate(&descriptor, written_at()).is_none());

        let descriptor = StrategyDescriptor::ttl(1.0, -5.0);
        assert!(TtlStrategy::new().evaluate(&descriptor, written_at()).is_none());
    }

    #[test]
    fn test_zero_window_cutoff_is_now() {
        let descriptor = StrategyDescriptor::ttl(0.0, 1000.0);
        let now = written_at();
        assert_eq!(TtlStrategy::new().evaluate(&descriptor, now), Some(now));
    }

    #[test]
    fn test_huge_window_does_not_panic() {
        let descriptor = StrategyDescriptor::ttl(f64::MAX, f64::MAX);
        let cutoff = TtlStrategy::new().evaluate(&descriptor, written_at()).unwrap();
        assert!(cutoff <= written_at());
    }
}
