//! Scoped key token wire format.
//!
//! ```text
//! token = hex(iv) || hex(ciphertext)
//! ```
//!
//! The IV segment is always 32 hex digits and the ciphertext segment a
//! positive multiple of 32. Tokens are emitted in upper case; decoding accepts
//! either case. Lengths are checked on the string exactly as given, so
//! surrounding whitespace makes a token invalid.

use thiserror::Error;

use crate::cipher::BLOCK_LEN;
use crate::iv::IV_LEN;

/// Hex length of the IV segment.
pub const IV_HEX_LEN: usize = IV_LEN * 2;

/// Hex length of one ciphertext block.
const BLOCK_HEX_LEN: usize = BLOCK_LEN * 2;

/// Errors produced while parsing a token string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenFormatError {
    /// The token is shorter than the IV segment.
    #[error("token too short: {0} characters, need at least {IV_HEX_LEN}")]
    TooShort(usize),

    /// The ciphertext segment is empty or not a whole number of blocks.
    #[error("token ciphertext segment of {0} characters is not a positive multiple of {BLOCK_HEX_LEN}")]
    Misaligned(usize),

    /// The token contains a non-hex character.
    #[error("token contains non-hex characters")]
    InvalidHex,
}

/// A token split into its raw parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedKeyToken {
    pub iv: [u8; IV_LEN],
    pub ciphertext: Vec<u8>,
}

impl ScopedKeyToken {
    /// Encode to the canonical upper-case hex string.
    pub fn encode(&self) -> String {
        encode(&self.iv, &self.ciphertext)
    }
}

impl std::str::FromStr for ScopedKeyToken {
    type Err = TokenFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

/// Concatenate the hex encodings of `iv` and `ciphertext`.
pub fn encode(iv: &[u8; IV_LEN], ciphertext: &[u8]) -> String {
    let mut token = String::with_capacity(IV_HEX_LEN + ciphertext.len() * 2);
    token.push_str(&hex::encode_upper(iv));
    token.push_str(&hex::encode_upper(ciphertext));
    token
}

/// Split a token into its IV and ciphertext.
///
/// # Errors
///
/// - [`TokenFormatError::TooShort`] if the token has fewer than
///   [`IV_HEX_LEN`] characters.
/// - [`TokenFormatError::Misaligned`] if the remainder is empty or not a
///   multiple of 32 characters.
/// - [`TokenFormatError::InvalidHex`] on any non-hex character.
pub fn decode(token: &str) -> Result<ScopedKeyToken, TokenFormatError> {
    if token.len() < IV_HEX_LEN {
        return Err(TokenFormatError::TooShort(token.len()));
    }
    let body_len = token.len() - IV_HEX_LEN;
    if body_len == 0 || body_len % BLOCK_HEX_LEN != 0 {
        return Err(TokenFormatError::Misaligned(body_len));
    }
    // Splitting below is only valid on a char boundary.
    if !token.is_ascii() {
        return Err(TokenFormatError::InvalidHex);
    }

    let (iv_hex, body_hex) = token.split_at(IV_HEX_LEN);
    let mut iv = [0u8; IV_LEN];
    hex::decode_to_slice(iv_hex, &mut iv).map_err(|_| TokenFormatError::InvalidHex)?;
    let ciphertext = hex::decode(body_hex).map_err(|_| TokenFormatError::InvalidHex)?;

    Ok(ScopedKeyToken { iv, ciphertext })
}
