//! AES-GCM authenticated encryption with detached tags.
//!
//! Wraps the AEAD primitive over a fixed key. The caller supplies the nonce
//! on every call and receives ciphertext and tag as separate buffers, which
//! is the shape the session key exchange carries on the wire.

use aes_gcm::{
    aead::{AeadInPlace, KeyInit, Nonce, Tag},
    Aes128Gcm, Aes256Gcm,
};
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::keys::AeadKey;

/// Size of an AES-128 key in bytes.
pub const AES_128_KEY_SIZE: usize = 16;

/// Size of an AES-256 key in bytes.
pub const AES_256_KEY_SIZE: usize = 32;

/// Size of a GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;

/// Size of a GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Output of [`AuthenticatedCipher::seal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedBox {
    /// Encrypted message, same length as the plaintext.
    pub ciphertext: Vec<u8>,
    /// GCM authentication tag.
    pub tag: Vec<u8>,
}

/// AES-GCM cipher bound to one key.
///
/// The key size selects AES-128 or AES-256. Any other size is accepted at
/// construction and rejected with [`CryptoError::CryptoFailure`] on use.
#[derive(Debug)]
pub struct AuthenticatedCipher {
    key: AeadKey,
}

impl AuthenticatedCipher {
    /// Creates a cipher that owns `key`.
    pub fn new(key: AeadKey) -> Self {
        Self { key }
    }

    /// Creates a cipher from raw key bytes.
    pub fn from_key_bytes(bytes: &[u8]) -> Self {
        Self::new(AeadKey::from_bytes(bytes))
    }

    /// Encrypts `plaintext` and authenticates it together with `associated_data`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::CryptoFailure`] if the nonce or key has the wrong size.
    pub fn seal(
        &self,
        plaintext: &[u8],
        nonce: &[u8],
        associated_data: &[u8],
    ) -> Result<SealedBox, CryptoError> {
        check_nonce(nonce)?;

        match self.key.len() {
            AES_128_KEY_SIZE => {
                seal_detached::<Aes128Gcm>(self.key.as_bytes(), plaintext, nonce, associated_data)
            },
            AES_256_KEY_SIZE => {
                seal_detached::<Aes256Gcm>(self.key.as_bytes(), plaintext, nonce, associated_data)
            },
            other => Err(unsupported_key(other)),
        }
    }

    /// Verifies `tag` and decrypts `ciphertext`.
    ///
    /// Nothing but an error is returned when verification fails.
    ///
    /// # Errors
    ///
    /// * [`CryptoError::AuthenticationFailure`] if the tag does not verify
    /// * [`CryptoError::CryptoFailure`] if the nonce, tag or key has the wrong size
    pub fn open(
        &self,
        ciphertext: &[u8],
        nonce: &[u8],
        tag: &[u8],
        associated_data: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        check_nonce(nonce)?;

        if tag.len() != TAG_SIZE {
            return Err(CryptoError::CryptoFailure(format!(
                "expected {}-byte tag, got {}",
                TAG_SIZE,
                tag.len()
            )));
        }

        match self.key.len() {
            AES_128_KEY_SIZE => open_detached::<Aes128Gcm>(
                self.key.as_bytes(),
                ciphertext,
                nonce,
                tag,
                associated_data,
            ),
            AES_256_KEY_SIZE => open_detached::<Aes256Gcm>(
                self.key.as_bytes(),
                ciphertext,
                nonce,
                tag,
                associated_data,
            ),
            other => Err(unsupported_key(other)),
        }
    }
}

fn check_nonce(nonce: &[u8]) -> Result<(), CryptoError> {
    if nonce.len() != NONCE_SIZE {
        return Err(CryptoError::CryptoFailure(format!(
            "expected {}-byte nonce, got {}",
            NONCE_SIZE,
            nonce.len()
        )));
    }
    Ok(())
}

fn unsupported_key(len: usize) -> CryptoError {
    CryptoError::CryptoFailure(format!("unsupported key length: {} bytes", len))
}

fn seal_detached<C>(
    key: &[u8],
    plaintext: &[u8],
    nonce: &[u8],
    associated_data: &[u8],
) -> Result<SealedBox, CryptoError>
where
    C: KeyInit + AeadInPlace,
{
    let cipher = C::new_from_slice(key).map_err(|_| unsupported_key(key.len()))?;

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::<C>::from_slice(nonce), associated_data, &mut buffer)
        .map_err(|e| CryptoError::CryptoFailure(e.to_string()))?;

    Ok(SealedBox {
        ciphertext: buffer,
        tag: tag.to_vec(),
    })
}

fn open_detached<C>(
    key: &[u8],
    ciphertext: &[u8],
    nonce: &[u8],
    tag: &[u8],
    associated_data: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError>
where
    C: KeyInit + AeadInPlace,
{
    let cipher = C::new_from_slice(key).map_err(|_| unsupported_key(key.len()))?;

    let mut buffer = Zeroizing::new(ciphertext.to_vec());
    cipher
        .decrypt_in_place_detached(
            Nonce::<C>::from_slice(nonce),
            associated_data,
            buffer.as_mut_slice(),
            Tag::<C>::from_slice(tag),
        )
        .map_err(|_| CryptoError::AuthenticationFailure)?;

    Ok(buffer)
}
