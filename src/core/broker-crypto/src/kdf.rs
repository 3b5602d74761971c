//! Concatenation key derivation.
//!
//! Single-step KDF per NIST SP 800-56A sections 5.8.1 and 6.2.2.2, configured
//! as RFC 7518 §4.6.2 describes for ECDH-ES:
//!
//! * AlgorithmID - octets of the `enc` header value, length-prefixed
//! * PartyUInfo - length-prefixed
//! * PartyVInfo - length-prefixed
//! * SuppPubInfo - output key length in bits, 32-bit big-endian
//! * SuppPrivInfo - omitted
//!
//! Only outputs that are a whole number of SHA-256 blocks are supported.

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// Output size of the underlying hash in bytes.
pub const HASH_SIZE: usize = 32;

/// Inputs to a single derivation.
#[derive(Clone, Copy)]
pub struct KdfInput<'a> {
    /// Shared secret `Z` from the key agreement.
    pub shared_secret: &'a [u8],
    /// Requested output length in bytes.
    pub output_key_len: usize,
    /// Algorithm identifier (e.g. `A256GCM`).
    pub algorithm_id: &'a [u8],
    /// Party U information.
    pub party_u_info: &'a [u8],
    /// Party V information.
    pub party_v_info: &'a [u8],
}

impl std::fmt::Debug for KdfInput<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KdfInput")
            .field("shared_secret", &"[REDACTED]")
            .field("output_key_len", &self.output_key_len)
            .field("algorithm_id", &self.algorithm_id)
            .field("party_u_info", &self.party_u_info)
            .field("party_v_info", &self.party_v_info)
            .finish()
    }
}

fn check_present(param: &[u8], name: &'static str) -> Result<(), CryptoError> {
    if param.is_empty() {
        return Err(CryptoError::MissingField(name));
    }
    Ok(())
}

fn len32(len: usize) -> Result<[u8; 4], CryptoError> {
    u32::try_from(len)
        .map(u32::to_be_bytes)
        .map_err(|_| CryptoError::CryptoFailure("input too long".to_string()))
}

/// Derives `output_key_len` bytes of keying material.
///
/// # Errors
///
/// * [`CryptoError::EmptyOutputLength`] if the requested length is zero
/// * [`CryptoError::MissingField`] if any byte input is empty
/// * [`CryptoError::UnsupportedKeySize`] if the length is not a multiple of 32
///   or its bit count does not fit in 32 bits
pub fn derive(input: &KdfInput<'_>) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if input.output_key_len == 0 {
        return Err(CryptoError::EmptyOutputLength);
    }

    check_present(input.shared_secret, "sharedSecret")?;
    check_present(input.algorithm_id, "algorithmId")?;
    check_present(input.party_u_info, "partyUInfo")?;
    check_present(input.party_v_info, "partyVInfo")?;

    if input.output_key_len % HASH_SIZE != 0 {
        return Err(CryptoError::UnsupportedKeySize);
    }

    let key_bits = u32::try_from(input.output_key_len)
        .ok()
        .and_then(|len| len.checked_mul(8))
        .ok_or(CryptoError::UnsupportedKeySize)?;

    let mut other_info = Zeroizing::new(Vec::with_capacity(
        input.shared_secret.len()
            + input.algorithm_id.len()
            + input.party_u_info.len()
            + input.party_v_info.len()
            + 16,
    ));
    other_info.extend_from_slice(input.shared_secret);
    other_info.extend_from_slice(&len32(input.algorithm_id.len())?);
    other_info.extend_from_slice(input.algorithm_id);
    other_info.extend_from_slice(&len32(input.party_u_info.len())?);
    other_info.extend_from_slice(input.party_u_info);
    other_info.extend_from_slice(&len32(input.party_v_info.len())?);
    other_info.extend_from_slice(input.party_v_info);
    other_info.extend_from_slice(&key_bits.to_be_bytes());

    let reps = input.output_key_len / HASH_SIZE;
    let mut okm = Zeroizing::new(Vec::with_capacity(input.output_key_len));

    for counter in 1..=reps {
        let mut hasher = Sha256::new();
        hasher.update(len32(counter)?);
        hasher.update(other_info.as_slice());
        okm.extend_from_slice(&hasher.finalize());
    }

    Ok(okm)
}
