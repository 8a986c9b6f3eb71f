//! Passthrough codec
//!
//! Identity transformation for deployments where payload encryption is
//! delegated to a layer below the cache. Also the construction fallback when
//! no codec is injected.

use super::{EncryptionCodec, ResultStream};
use crate::error::CacheResult;

/// Codec that stores payloads verbatim
#[derive(Debug, Clone, Default)]
pub struct PassthroughCodec;

impl PassthroughCodec {
    /// Create a new passthrough codec
    pub fn new() -> Self {
        Self
    }
}

impl EncryptionCodec for PassthroughCodec {
    fn encrypt(&self, plaintext: &[u8]) -> CacheResult<Vec<u8>> {
        Ok(plaintext.to_vec())
    }

    fn decrypt(&self, ciphertext: ResultStream) -> ResultStream {
        ciphertext
    }

    fn codec_name(&self) -> &'static str {
        "passthrough"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::{Cursor, Read};

    fn roundtrip(codec: &PassthroughCodec, payload: &[u8]) -> Vec<u8> {
        let stored = codec.encrypt(payload).unwrap();
        let mut reader = codec.decrypt(Box::new(Cursor::new(stored)));
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_roundtrip_empty_payload() {
        let codec = PassthroughCodec::new();
        assert_eq!(roundtrip(&codec, b""), b"");
    }

    #[test]
    fn test_roundtrip_small_payload() {
        let codec = PassthroughCodec::new();
        assert_eq!(roundtrip(&codec, &[0x01, 0x02, 0x03]), vec![0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_codec_name() {
        assert_eq!(PassthroughCodec::new().codec_name(), "passthrough");
    }

    proptest! {
        #[test]
        fn prop_decrypt_inverts_encrypt(payload in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let codec = PassthroughCodec::new();
            prop_assert_eq!(roundtrip(&codec, &payload), payload);
        }
    }
}
