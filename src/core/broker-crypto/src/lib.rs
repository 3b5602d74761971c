//! # Broker Crypto
//!
//! Cryptographic primitives protecting the session key exchanged between an
//! app, the broker, and the identity provider.
//!
//! This crate provides:
//! - Single-step concatenation KDF (NIST SP 800-56A, RFC 7518 §4.6.2)
//! - AES-GCM authenticated encryption with detached tags
//! - Decryption of ECDH-ES/A256GCM JWE broker responses
//! - Zeroizing key type and secure random helpers
//!
//! Neither primitive is general purpose. The KDF accepts only the input shape
//! used by the ECDH-ES session-key exchange.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aead;
pub mod error;
pub mod jwe;
pub mod kdf;
pub mod keys;
pub mod random;

pub use aead::{AuthenticatedCipher, SealedBox};
pub use error::CryptoError;
pub use jwe::{JweHeader, JweResponse};
pub use kdf::{derive, KdfInput};
pub use keys::AeadKey;
