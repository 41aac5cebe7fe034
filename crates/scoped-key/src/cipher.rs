//! AES-CBC encryption and decryption with PKCS#7 padding.
//!
//! **No authentication.** CBC with padding provides confidentiality only. The
//! padding check on decryption is the sole integrity signal, and a tampered
//! ciphertext whose padding happens to remain valid decrypts to garbage
//! without an error. Tokens already in circulation depend on this exact
//! construction, so do not add a MAC here without versioning the token format.

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::{
    block_padding::Pkcs7, BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyIvInit,
};
use thiserror::Error;

use crate::iv::IV_LEN;
use crate::key::{CipherKey, KeySize};

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// Errors produced by the cipher layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// The key could not initialise the block cipher. Unreachable for keys
    /// built through [`CipherKey`].
    #[error("invalid cipher key length")]
    InvalidKeyLength,

    /// The ciphertext is empty or not a whole number of blocks.
    #[error("ciphertext length {0} is not a positive multiple of {BLOCK_LEN}")]
    Misaligned(usize),

    /// Padding was invalid after decryption: wrong key, wrong IV, or a
    /// corrupted ciphertext.
    #[error("invalid padding after decryption")]
    BadPadding,
}

/// Encrypt `plaintext` under `key` and `iv`, padding it to a whole number of
/// blocks. The output is always at least one block long.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] only if `key` is inconsistent
/// with its own [`KeySize`].
pub fn encrypt(
    key: &CipherKey,
    iv: &[u8; IV_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>, CipherError> {
    match key.size() {
        KeySize::Aes128 => seal::<Aes128>(key.as_bytes(), iv, plaintext),
        KeySize::Aes192 => seal::<Aes192>(key.as_bytes(), iv, plaintext),
        KeySize::Aes256 => seal::<Aes256>(key.as_bytes(), iv, plaintext),
    }
}

/// Decrypt `ciphertext` under `key` and `iv`, verifying and stripping the
/// padding.
///
/// # Errors
///
/// - [`CipherError::Misaligned`] if `ciphertext` is empty or not block-aligned.
/// - [`CipherError::BadPadding`] if the recovered padding is invalid.
pub fn decrypt(
    key: &CipherKey,
    iv: &[u8; IV_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CipherError> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(CipherError::Misaligned(ciphertext.len()));
    }

    match key.size() {
        KeySize::Aes128 => open::<Aes128>(key.as_bytes(), iv, ciphertext),
        KeySize::Aes192 => open::<Aes192>(key.as_bytes(), iv, ciphertext),
        KeySize::Aes256 => open::<Aes256>(key.as_bytes(), iv, ciphertext),
    }
}

fn seal<C>(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CipherError>
where
    C: BlockEncryptMut + BlockCipher,
    cbc::Encryptor<C>: KeyIvInit + BlockEncryptMut,
{
    let cipher = cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| CipherError::InvalidKeyLength)?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

fn open<C>(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CipherError>
where
    C: BlockDecryptMut + BlockCipher,
    cbc::Decryptor<C>: KeyIvInit + BlockDecryptMut,
{
    let cipher = cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| CipherError::InvalidKeyLength)?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CipherError::BadPadding)
}
