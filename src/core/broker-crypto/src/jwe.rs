//! Encrypted broker responses in JWE compact serialization.
//!
//! The broker returns its token response as
//! `{protected}.{encrypted_key}.{iv}.{ciphertext}.{tag}`, each segment
//! base64url without padding. Only direct ECDH-ES key agreement with
//! A256GCM content encryption is accepted: the content key is the concat KDF
//! output over the agreed secret, with `enc` as the algorithm id and the
//! header's `apu`/`apv` as party info. The encrypted key segment is empty.
//!
//! The ECDH step itself belongs to the key holder; this module starts from
//! the agreed shared secret.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL, Engine};
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::aead::{AuthenticatedCipher, AES_256_KEY_SIZE};
use crate::error::CryptoError;
use crate::kdf::{derive, KdfInput};

/// Key agreement algorithm accepted in the `alg` header.
pub const KEY_EXCHANGE_ALGORITHM_ECDH_ES: &str = "ECDH-ES";

/// Content encryption algorithm accepted in the `enc` header.
pub const RESPONSE_ENCRYPTION_ALGORITHM_A256GCM: &str = "A256GCM";

/// Protected header fields used for decryption.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JweHeader {
    /// Key agreement algorithm.
    pub alg: String,
    /// Content encryption algorithm.
    pub enc: String,
    /// Agreement PartyUInfo, base64url.
    #[serde(default)]
    pub apu: Option<String>,
    /// Agreement PartyVInfo, base64url.
    #[serde(default)]
    pub apv: Option<String>,
}

/// A parsed, still encrypted JWE response.
#[derive(Debug, Clone)]
pub struct JweResponse {
    header: JweHeader,
    protected: String,
    encrypted_key: Vec<u8>,
    iv: Vec<u8>,
    ciphertext: Vec<u8>,
    tag: Vec<u8>,
}

impl JweResponse {
    /// Parses a compact serialized JWE.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedJwe`] if the input does not have five
    /// base64url segments or the header is not valid JSON.
    pub fn parse(compact: &str) -> Result<Self, CryptoError> {
        let segments: Vec<&str> = compact.trim().split('.').collect();
        let [protected, encrypted_key, iv, ciphertext, tag] = segments.as_slice() else {
            return Err(CryptoError::MalformedJwe(format!(
                "expected 5 segments, got {}",
                segments.len()
            )));
        };

        let header_json = decode_segment(protected, "header")?;
        let header: JweHeader = serde_json::from_slice(&header_json)
            .map_err(|e| CryptoError::MalformedJwe(format!("invalid header: {}", e)))?;

        Ok(Self {
            header,
            protected: (*protected).to_string(),
            encrypted_key: decode_segment(encrypted_key, "encrypted key")?,
            iv: decode_segment(iv, "iv")?,
            ciphertext: decode_segment(ciphertext, "ciphertext")?,
            tag: decode_segment(tag, "tag")?,
        })
    }

    /// Protected header.
    pub fn header(&self) -> &JweHeader {
        &self.header
    }

    /// Checks that the response uses ECDH-ES with A256GCM.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::UnsupportedAlgorithm`] naming the offending
    /// header value.
    pub fn check_algorithm_supported(&self) -> Result<(), CryptoError> {
        if self.header.alg != KEY_EXCHANGE_ALGORITHM_ECDH_ES {
            return Err(CryptoError::UnsupportedAlgorithm(format!(
                "alg {}",
                self.header.alg
            )));
        }
        if self.header.enc != RESPONSE_ENCRYPTION_ALGORITHM_A256GCM {
            return Err(CryptoError::UnsupportedAlgorithm(format!(
                "enc {}",
                self.header.enc
            )));
        }
        if !self.encrypted_key.is_empty() {
            return Err(CryptoError::UnsupportedAlgorithm(
                "encrypted key must be empty for direct agreement".to_string(),
            ));
        }
        Ok(())
    }

    /// Derives the content key from `shared_secret` and decrypts the payload.
    ///
    /// The protected header segment is authenticated as associated data.
    ///
    /// # Errors
    ///
    /// * [`CryptoError::UnsupportedAlgorithm`] if the algorithms are not supported
    /// * [`CryptoError::MissingField`] if the shared secret, `apu` or `apv` is missing
    /// * [`CryptoError::AuthenticationFailure`] if the tag does not verify
    /// * [`CryptoError::CryptoFailure`] if the iv or tag has the wrong size
    pub fn decrypt(&self, shared_secret: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        self.check_algorithm_supported()?;

        let apu = self.party_info(self.header.apu.as_deref(), "apu")?;
        let apv = self.party_info(self.header.apv.as_deref(), "apv")?;

        let key = derive(&KdfInput {
            shared_secret,
            output_key_len: AES_256_KEY_SIZE,
            algorithm_id: self.header.enc.as_bytes(),
            party_u_info: &apu,
            party_v_info: &apv,
        })?;

        AuthenticatedCipher::from_key_bytes(&key).open(
            &self.ciphertext,
            &self.iv,
            &self.tag,
            self.protected.as_bytes(),
        )
    }

    /// Decrypts the payload and parses it as a JSON object.
    ///
    /// # Errors
    ///
    /// Everything [`JweResponse::decrypt`] returns, plus
    /// [`CryptoError::MalformedJwe`] if the plaintext is not a JSON object.
    pub fn decrypt_json(
        &self,
        shared_secret: &[u8],
    ) -> Result<serde_json::Map<String, serde_json::Value>, CryptoError> {
        let plaintext = self.decrypt(shared_secret)?;
        serde_json::from_slice(&plaintext)
            .map_err(|e| CryptoError::MalformedJwe(format!("invalid payload: {}", e)))
    }

    fn party_info(&self, value: Option<&str>, name: &'static str) -> Result<Vec<u8>, CryptoError> {
        match value {
            Some(encoded) if !encoded.is_empty() => decode_segment(encoded, name),
            _ => Err(CryptoError::MissingField(name)),
        }
    }
}

fn decode_segment(segment: &str, name: &str) -> Result<Vec<u8>, CryptoError> {
    BASE64URL
        .decode(segment)
        .map_err(|e| CryptoError::MalformedJwe(format!("invalid {} encoding: {}", name, e)))
}
