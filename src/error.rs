//! Cache error types

use thiserror::Error;

/// Errors that can occur during cache operations
///
/// Only `Statement` errors ever reach callers of the fetch path; write and
/// purge failures are logged and swallowed at the provider layer because the
/// cache is best-effort relative to the already-computed result.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to prepare or execute the cache lookup statement
    #[error("Cache statement error: {0}")]
    Statement(String),

    /// Generic storage backend error
    #[error("Cache storage error: {0}")]
    Storage(String),

    /// Failed to encrypt or decrypt a cached payload
    #[error("Cache encryption error: {0}")]
    Encryption(String),

    /// The supplied connection scope cannot serve this backend
    #[error("Connection scope error: {0}")]
    ConnectionScope(String),

    /// Invalid cache configuration
    #[error("Cache configuration error: {0}")]
    Configuration(String),
}

impl From<sqlx::Error> for CacheError {
    fn from(e: sqlx::Error) -> Self {
        CacheError::Storage(e.to_string())
    }
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;
