//! Browser presentation modes carried in `browser_modes`.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};

/// Standard alphabet, padding optional.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Bitmask of presentation modes requested by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BrowserModes(u64);

impl BrowserModes {
    /// Open the browser in a private session.
    pub const PRIVATE_SESSION: u64 = 1 << 0;

    /// Creates a mask from raw bits.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Decodes the base64 value of `browser_modes`.
    ///
    /// The payload is a little-endian integer of at least one byte; bytes
    /// past the eighth are ignored. Anything that fails to decode yields an
    /// empty mask.
    pub fn decode(value: &str) -> Self {
        // Form decoding turns an unescaped '+' into a space.
        let normalized = value.trim().replace(' ', "+");

        let bytes = match LENIENT_STANDARD.decode(normalized) {
            Ok(bytes) => bytes,
            Err(_) => return Self::default(),
        };

        let mut le = [0u8; 8];
        let take = bytes.len().min(le.len());
        le[..take].copy_from_slice(&bytes[..take]);

        Self(u64::from_le_bytes(le))
    }

    /// Raw bits.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Returns `true` if all bits of `flag` are set.
    pub const fn contains(self, flag: u64) -> bool {
        self.0 & flag == flag
    }

    /// Returns `true` if a private browser session was requested.
    pub const fn private_session(self) -> bool {
        self.contains(Self::PRIVATE_SESSION)
    }
}
