//! Symmetric key type with automatic memory zeroization.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::aead::AES_256_KEY_SIZE;
use crate::random::generate_key;

/// Raw AEAD key bytes owned for the lifetime of a cryptographic session.
///
/// The length is not validated here. An unsupported length is reported by
/// the cipher at seal/open time.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AeadKey {
    bytes: Vec<u8>,
}

impl AeadKey {
    /// Generates a new random 256-bit key.
    pub fn generate() -> Self {
        let key = generate_key();
        Self {
            bytes: key[..AES_256_KEY_SIZE].to_vec(),
        }
    }

    /// Creates a key from raw bytes, taking a copy.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Returns the raw key bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Key length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the key holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for AeadKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl std::fmt::Debug for AeadKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AeadKey")
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
