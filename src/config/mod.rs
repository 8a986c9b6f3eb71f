//! Configuration management for the result cache.

pub mod cache_config;

pub use cache_config::ResultCacheConfig;
