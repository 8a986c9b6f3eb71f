//! Concrete cache backends.

pub mod memory;
pub mod noop;
pub mod postgres;

pub use memory::MemoryCacheService;
pub use noop::NoOpCacheService;
pub use postgres::PostgresCacheService;

/// Short hex prefix of a query hash for log lines
pub(crate) fn hash_prefix(query_hash: &[u8]) -> String {
    query_hash
        .iter()
        .take(8)
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_prefix_truncates() {
        let hash: Vec<u8> = (0u8..32).collect();
        assert_eq!(hash_prefix(&hash), "0001020304050607");
    }

    #[test]
    fn test_hash_prefix_of_short_hash() {
        assert_eq!(hash_prefix(&[0xab, 0xcd]), "abcd");
    }
}
