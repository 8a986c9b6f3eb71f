//! Encryption codec capability consumed by the cache.
//!
//! The cache never persists plaintext result payloads: the writer encrypts
//! bytes before they reach storage and the fetcher hands responders a
//! decrypting stream over the stored ciphertext. The codec itself is supplied
//! by the host system; this module defines the seam and a passthrough
//! implementation for deployments that handle encryption below the cache
//! (e.g. at the volume level).

pub mod passthrough;

pub use passthrough::PassthroughCodec;

use crate::error::CacheResult;
use std::io::Read;

/// A readable stream of decrypted result bytes handed to responder callbacks.
pub type ResultStream = Box<dyn Read + Send>;

/// Stream-level encrypt/decrypt capability
///
/// Implementations must be pure transformations: `decrypt` over the output of
/// `encrypt` yields the original bytes, and neither direction has side
/// effects the cache needs to know about.
pub trait EncryptionCodec: Send + Sync {
    /// Encrypt a plaintext payload into its stored representation
    fn encrypt(&self, plaintext: &[u8]) -> CacheResult<Vec<u8>>;

    /// Wrap a ciphertext stream in a reader that decrypts as it is consumed
    ///
    /// Decryption failures surface as `std::io::Error` from the returned
    /// reader, inside whatever responder is consuming it.
    fn decrypt(&self, ciphertext: ResultStream) -> ResultStream;

    /// Name of the codec, for logging
    fn codec_name(&self) -> &'static str;
}
