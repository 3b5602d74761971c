//! Cryptographically secure random generation.
//!
//! The cipher never picks a nonce on its own; callers that need a fresh one
//! draw it from here.

use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

use crate::aead::{AES_256_KEY_SIZE, NONCE_SIZE};

/// Generates a random 256-bit key.
pub fn generate_key() -> Zeroizing<[u8; AES_256_KEY_SIZE]> {
    let mut key = Zeroizing::new([0u8; AES_256_KEY_SIZE]);
    OsRng.fill_bytes(&mut *key);
    key
}

/// Generates a random 96-bit GCM nonce.
pub fn generate_nonce() -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);
    nonce
}
