//! Crate-level error type.
//!
//! Each component owns a narrow error enum; [`Error`] wraps them transparently
//! so callers can still match on the precise failure kind.

use thiserror::Error;

use crate::cipher::CipherError;
use crate::iv::IvError;
use crate::key::KeyError;
use crate::payload::PayloadError;
use crate::token::TokenFormatError;

/// Result alias used by every public operation in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Any failure produced while minting or redeeming a scoped key.
#[derive(Debug, Error)]
pub enum Error {
    /// Master key missing, malformed, or of an unsupported length.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Caller-supplied IV malformed or of the wrong length.
    #[error(transparent)]
    Iv(#[from] IvError),

    /// Policy value could not be serialised.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// Token string malformed.
    #[error(transparent)]
    TokenFormat(#[from] TokenFormatError),

    /// Ciphertext misaligned or padding invalid.
    #[error(transparent)]
    Cipher(#[from] CipherError),
}

/// Discriminant of [`Error`], for callers that only care about the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Key,
    Iv,
    Payload,
    TokenFormat,
    Cipher,
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Key(_) => ErrorKind::Key,
            Error::Iv(_) => ErrorKind::Iv,
            Error::Payload(_) => ErrorKind::Payload,
            Error::TokenFormat(_) => ErrorKind::TokenFormat,
            Error::Cipher(_) => ErrorKind::Cipher,
        }
    }
}
