//! Cryptographic error types.

use thiserror::Error;

/// Errors that can occur during key derivation or authenticated encryption.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Requested output key length was zero.
    #[error("output key length must be > 0")]
    EmptyOutputLength,

    /// A required KDF input was empty.
    #[error("missing input parameter: {0}")]
    MissingField(&'static str),

    /// Requested output key length is not a multiple of the hash size.
    #[error("unsupported key size")]
    UnsupportedKeySize,

    /// Authentication tag did not verify.
    #[error("authentication failed")]
    AuthenticationFailure,

    /// Malformed input to the cipher (key, nonce or tag size).
    #[error("crypto failure: {0}")]
    CryptoFailure(String),

    /// JWE response uses an algorithm other than ECDH-ES with A256GCM.
    #[error("unsupported jwe algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// JWE response could not be decoded.
    #[error("malformed jwe: {0}")]
    MalformedJwe(String),
}
