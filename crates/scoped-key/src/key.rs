//! Master key parsing and cipher key selection.
//!
//! A master key is a hexadecimal string. [`decode`] validates it and returns
//! the raw bytes; [`CipherKey::from_master_key`] turns it into the AES key
//! actually handed to the cipher, according to a [`KeyScheme`].
//!
//! Key bytes live in [`Zeroizing`] buffers and are never printed.

use serde::Deserialize;
use thiserror::Error;
use zeroize::Zeroizing;

/// Decoded master key lengths accepted, one per AES key size.
pub const SUPPORTED_KEY_LENS: [usize; 3] = [16, 24, 32];

/// Errors produced while parsing a master key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// The key is empty or whitespace-only.
    #[error("master key is required and must not be empty")]
    Missing,

    /// The key contains non-hex characters or has an odd number of digits.
    // The offending character is deliberately not reported.
    #[error("master key is not a valid hex string")]
    InvalidHex,

    /// The decoded key is not 16, 24 or 32 bytes long.
    #[error("unsupported master key length: {0} bytes (expected 16, 24 or 32)")]
    UnsupportedLength(usize),
}

/// AES variant selected by the cipher key length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySize {
    Aes128,
    Aes192,
    Aes256,
}

impl KeySize {
    /// Map a key length in bytes to its AES variant.
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            16 => Some(KeySize::Aes128),
            24 => Some(KeySize::Aes192),
            32 => Some(KeySize::Aes256),
            _ => None,
        }
    }

    /// Key length in bytes.
    pub fn key_len(self) -> usize {
        match self {
            KeySize::Aes128 => 16,
            KeySize::Aes192 => 24,
            KeySize::Aes256 => 32,
        }
    }
}

/// How a validated master key string becomes cipher key bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyScheme {
    /// 32-digit master keys are used verbatim as 32 ASCII key bytes (AES-256).
    /// Longer keys are hex-decoded. Tokens issued by existing deployments use
    /// this scheme.
    ///
    /// The hex case of a 32-digit key is significant here: `...ABCDEF` and
    /// `...abcdef` name different cipher keys, and neither opens tokens minted
    /// under the other. 48- and 64-digit keys are case-insensitive.
    #[default]
    Legacy,

    /// The hex-decoded bytes are always the key (AES-128/192/256).
    Hex,
}

/// Decode a hexadecimal master key into raw bytes.
///
/// Surrounding whitespace is ignored. Upper and lower case digits are accepted
/// and decode to the same bytes, although [`KeyScheme::Legacy`] may still
/// treat them as different keys.
///
/// # Errors
///
/// - [`KeyError::Missing`] if the key is empty or whitespace-only.
/// - [`KeyError::InvalidHex`] on non-hex characters or an odd digit count.
/// - [`KeyError::UnsupportedLength`] if the decoded length is not in
///   [`SUPPORTED_KEY_LENS`].
pub fn decode(master_key: &str) -> Result<Zeroizing<Vec<u8>>, KeyError> {
    let trimmed = master_key.trim();
    if trimmed.is_empty() {
        return Err(KeyError::Missing);
    }

    let bytes = Zeroizing::new(hex::decode(trimmed).map_err(|_| KeyError::InvalidHex)?);
    if !SUPPORTED_KEY_LENS.contains(&bytes.len()) {
        return Err(KeyError::UnsupportedLength(bytes.len()));
    }
    Ok(bytes)
}

/// AES key bytes derived from a master key.
#[derive(Clone)]
pub struct CipherKey {
    bytes: Zeroizing<Vec<u8>>,
    size: KeySize,
}

impl CipherKey {
    /// Validate `master_key` with [`decode`] and select the cipher key bytes
    /// according to `scheme`.
    ///
    /// Under [`KeyScheme::Legacy`] a 32-digit key keeps its exact characters,
    /// so changing its hex case changes the key.
    ///
    /// # Errors
    ///
    /// Returns any [`KeyError`] raised by [`decode`].
    pub fn from_master_key(master_key: &str, scheme: KeyScheme) -> Result<Self, KeyError> {
        let decoded = decode(master_key)?;

        let bytes = match scheme {
            KeyScheme::Legacy if decoded.len() == 16 => {
                Zeroizing::new(master_key.trim().as_bytes().to_vec())
            }
            KeyScheme::Legacy | KeyScheme::Hex => decoded,
        };

        let size = KeySize::from_len(bytes.len()).ok_or(KeyError::UnsupportedLength(bytes.len()))?;
        Ok(Self { bytes, size })
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// AES variant this key selects.
    pub fn size(&self) -> KeySize {
        self.size
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherKey")
            .field("size", &self.size)
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_32_DIGITS: &str = "0123456789ABCDEF0123456789ABCDEF";

    #[test]
    fn decodes_supported_lengths() {
        for len in SUPPORTED_KEY_LENS {
            let key = "ab".repeat(len);
            assert_eq!(decode(&key).unwrap().len(), len);
        }
    }

    #[test]
    fn rejects_empty_and_blank() {
        assert_eq!(decode("").unwrap_err(), KeyError::Missing);
        assert_eq!(decode("   \t").unwrap_err(), KeyError::Missing);
    }

    #[test]
    fn rejects_non_hex_and_odd_length() {
        assert_eq!(
            decode("0123456789ABCDEF0123456789ABCDEZ").unwrap_err(),
            KeyError::InvalidHex
        );
        assert_eq!(decode("0123456789ABCDEF0").unwrap_err(), KeyError::InvalidHex);
    }

    #[test]
    fn rejects_unsupported_length() {
        assert_eq!(decode("0011").unwrap_err(), KeyError::UnsupportedLength(2));
        assert_eq!(
            decode(&"00".repeat(20)).unwrap_err(),
            KeyError::UnsupportedLength(20)
        );
    }

    #[test]
    fn accepts_lower_case_and_surrounding_whitespace() {
        let upper = decode(KEY_32_DIGITS).unwrap();
        let lower = decode(&format!(" {} ", KEY_32_DIGITS.to_lowercase())).unwrap();
        assert_eq!(*upper, *lower);
    }

    #[test]
    fn legacy_scheme_uses_ascii_bytes_of_short_keys() {
        let key = CipherKey::from_master_key(KEY_32_DIGITS, KeyScheme::Legacy).unwrap();
        assert_eq!(key.size(), KeySize::Aes256);
        assert_eq!(key.as_bytes(), KEY_32_DIGITS.as_bytes());
    }

    #[test]
    fn legacy_scheme_decodes_long_keys() {
        let master = "0f".repeat(32);
        let key = CipherKey::from_master_key(&master, KeyScheme::Legacy).unwrap();
        assert_eq!(key.size(), KeySize::Aes256);
        assert_eq!(key.as_bytes(), &[0x0f; 32][..]);

        let master = "0f".repeat(24);
        let key = CipherKey::from_master_key(&master, KeyScheme::Legacy).unwrap();
        assert_eq!(key.size(), KeySize::Aes192);
    }

    #[test]
    fn legacy_scheme_is_case_sensitive_for_short_keys() {
        let upper = CipherKey::from_master_key(KEY_32_DIGITS, KeyScheme::Legacy).unwrap();
        let lower =
            CipherKey::from_master_key(&KEY_32_DIGITS.to_lowercase(), KeyScheme::Legacy).unwrap();
        assert_ne!(upper.as_bytes(), lower.as_bytes());

        let long = "AB".repeat(32);
        let upper = CipherKey::from_master_key(&long, KeyScheme::Legacy).unwrap();
        let lower = CipherKey::from_master_key(&long.to_lowercase(), KeyScheme::Legacy).unwrap();
        assert_eq!(upper.as_bytes(), lower.as_bytes());
    }

    #[test]
    fn hex_scheme_ignores_case() {
        let upper = CipherKey::from_master_key(KEY_32_DIGITS, KeyScheme::Hex).unwrap();
        let lower =
            CipherKey::from_master_key(&KEY_32_DIGITS.to_lowercase(), KeyScheme::Hex).unwrap();
        assert_eq!(upper.as_bytes(), lower.as_bytes());
    }

    #[test]
    fn hex_scheme_selects_size_from_decoded_length() {
        let key = CipherKey::from_master_key(KEY_32_DIGITS, KeyScheme::Hex).unwrap();
        assert_eq!(key.size(), KeySize::Aes128);
        assert_eq!(key.as_bytes()[0], 0x01);
    }

    #[test]
    fn both_schemes_validate_first() {
        for scheme in [KeyScheme::Legacy, KeyScheme::Hex] {
            assert_eq!(
                CipherKey::from_master_key("", scheme).unwrap_err(),
                KeyError::Missing
            );
            assert_eq!(
                CipherKey::from_master_key("xyz!", scheme).unwrap_err(),
                KeyError::InvalidHex
            );
        }
    }

    #[test]
    fn cipher_key_redacted_in_debug() {
        let key = CipherKey::from_master_key(KEY_32_DIGITS, KeyScheme::Legacy).unwrap();
        let dbg = format!("{key:?}");
        assert!(dbg.contains("REDACTED"));
        assert!(!dbg.contains("0123"));
    }

    #[test]
    fn key_scheme_deserialises_lowercase() {
        let s: KeyScheme = serde_json::from_str("\"hex\"").unwrap();
        assert_eq!(s, KeyScheme::Hex);
        let s: KeyScheme = serde_json::from_str("\"legacy\"").unwrap();
        assert_eq!(s, KeyScheme::Legacy);
    }
}
