//! Initialisation vector resolution.

use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

/// Byte length of an AES-CBC initialisation vector (one block).
pub const IV_LEN: usize = 16;

/// Errors produced while resolving a caller-supplied IV.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IvError {
    /// The IV is not a valid hex string.
    #[error("IV is not a valid hex string")]
    InvalidHex,

    /// The IV does not decode to exactly [`IV_LEN`] bytes.
    #[error("invalid IV length: expected {IV_LEN} bytes, got {0}")]
    InvalidLength(usize),
}

/// Resolve the IV for one encryption.
///
/// A supplied IV is hex-decoded (either case) and must be exactly [`IV_LEN`]
/// bytes. Without one, a fresh IV is drawn from the OS CSPRNG, which is safe to
/// call from any number of threads at once.
///
/// # Errors
///
/// Returns [`IvError`] if the supplied IV is malformed.
pub fn resolve(iv_hex: Option<&str>) -> Result<[u8; IV_LEN], IvError> {
    match iv_hex {
        Some(hex_str) => decode(hex_str),
        None => Ok(generate()),
    }
}

/// Draw a random IV from the OS CSPRNG.
pub fn generate() -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);
    iv
}

fn decode(hex_str: &str) -> Result<[u8; IV_LEN], IvError> {
    let bytes = hex::decode(hex_str.trim()).map_err(|_| IvError::InvalidHex)?;
    <[u8; IV_LEN]>::try_from(bytes.as_slice()).map_err(|_| IvError::InvalidLength(bytes.len()))
}
