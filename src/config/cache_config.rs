//! Result Cache Configuration Management
//!
//! This module provides configuration management for the persistent result
//! cache based on environment detection with environment-variable overrides.
//! It allows different cache behaviors in production, development, and test
//! environments.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{info, warn};

/// Configuration for the persistent result cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultCacheConfig {
    /// Whether cached results are served and stored at all
    pub enabled: bool,
    /// Storage backend selector: "postgres", "memory", or anything else for NoOp
    pub backend: String,
    /// Global retention horizon handed to the purge scheduler
    pub retention_max_age_seconds: u64,
    /// How often the external scheduler should invoke purge
    pub purge_interval_seconds: u64,
}

impl Default for ResultCacheConfig {
    /// Default configuration suitable for production
    fn default() -> Self {
        Self {
            enabled: true,
            backend: "postgres".to_string(),
            retention_max_age_seconds: 7 * 24 * 60 * 60,
            purge_interval_seconds: 3600,
        }
    }
}

impl ResultCacheConfig {
    /// Create test-optimized configuration with rapid retention turnover
    pub fn for_test() -> Self {
        Self {
            enabled: true,
            backend: "memory".to_string(),
            retention_max_age_seconds: 60,
            purge_interval_seconds: 5,
        }
    }

    /// Create development-optimized configuration
    pub fn for_development() -> Self {
        Self {
            enabled: true,
            backend: "postgres".to_string(),
            retention_max_age_seconds: 24 * 60 * 60,
            purge_interval_seconds: 300,
        }
    }

    /// Load configuration from environment or use defaults
    pub fn from_environment() -> Self {
        let environment = env::var("QUERYCACHE_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .or_else(|_| env::var("RUST_ENV"))
            .unwrap_or_else(|_| "production".to_string());

        let config = match environment.as_str() {
            "test" => {
                info!("Loading test result cache configuration (rapid retention turnover)");
                Self::for_test()
            }
            "development" => {
                info!("Loading development result cache configuration");
                Self::for_development()
            }
            _ => {
                info!("Loading production result cache configuration");
                Self::default()
            }
        };

        config.with_env_overrides()
    }

    /// Apply environment variable overrides to configuration
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(enabled) = env::var("QUERYCACHE_ENABLED") {
            self.enabled = enabled.parse().unwrap_or(self.enabled);
            info!("Result cache enabled override: {}", self.enabled);
        }

        if let Ok(backend) = env::var("QUERYCACHE_BACKEND") {
            info!("Result cache backend override: {}", backend);
            self.backend = backend;
        }

        if let Ok(max_age) = env::var("QUERYCACHE_RETENTION_MAX_AGE_SECONDS") {
            if let Ok(seconds) = max_age.parse::<u64>() {
                self.retention_max_age_seconds = seconds;
                info!("Result cache retention override: {}s", seconds);
            }
        }

        if let Ok(interval) = env::var("QUERYCACHE_PURGE_INTERVAL_SECONDS") {
            if let Ok(seconds) = interval.parse::<u64>() {
                self.purge_interval_seconds = seconds;
                info!("Result cache purge interval override: {}s", seconds);
            }
        }

        self
    }

    /// Check if result caching is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get the retention horizon as Duration
    pub fn retention_max_age(&self) -> Duration {
        Duration::from_secs(self.retention_max_age_seconds)
    }

    /// Get the purge interval as Duration
    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge_interval_seconds)
    }

    /// Log current configuration for debugging
    pub fn log_configuration(&self) {
        info!("Result Cache Configuration:");
        info!("  Enabled: {}", self.enabled);
        info!("  Backend: {}", self.backend);
        info!("  Retention: {}s", self.retention_max_age_seconds);
        info!("  Purge Interval: {}s", self.purge_interval_seconds);
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.purge_interval_seconds == 0 {
            return Err("Purge interval must be greater than 0".to_string());
        }

        if self.purge_interval_seconds > self.retention_max_age_seconds {
            warn!(
                "Purge interval ({}s) exceeds retention horizon ({}s) - stale rows linger between purges",
                self.purge_interval_seconds, self.retention_max_age_seconds
            );
        }

        if self.retention_max_age_seconds == 0 {
            warn!("Retention horizon is 0 - every purge pass deletes all entries");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_production_shaped() {
        let config = ResultCacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.backend, "postgres");
        assert_eq!(config.retention_max_age(), Duration::from_secs(7 * 24 * 60 * 60));
    }

    #[test]
    fn test_for_test_uses_memory_backend() {
        let config = ResultCacheConfig::for_test();
        assert!(config.enabled);
        assert_eq!(config.backend, "memory");
        assert_eq!(config.purge_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_env_override_disables_cache() {
        std::env::set_var("QUERYCACHE_ENABLED", "false");
        let config = ResultCacheConfig::default().with_env_overrides();
        assert!(!config.is_enabled());
        std::env::remove_var("QUERYCACHE_ENABLED");
    }

    #[test]
    fn test_env_override_retention() {
        std::env::set_var("QUERYCACHE_RETENTION_MAX_AGE_SECONDS", "120");
        let config = ResultCacheConfig::default().with_env_overrides();
        assert_eq!(config.retention_max_age_seconds, 120);
        std::env::remove_var("QUERYCACHE_RETENTION_MAX_AGE_SECONDS");
    }

    #[test]
    fn test_validate_rejects_zero_purge_interval() {
        let config = ResultCacheConfig {
            purge_interval_seconds: 0,
            ..ResultCacheConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(ResultCacheConfig::default().validate().is_ok());
        assert!(ResultCacheConfig::for_test().validate().is_ok());
        assert!(ResultCacheConfig::for_development().validate().is_ok());
    }
}
