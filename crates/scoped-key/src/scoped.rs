//! [`ScopedKey`]: mint and redeem scoped key tokens.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::key::{CipherKey, KeyScheme};
use crate::payload::{Clock, SystemClock};
use crate::{cipher, iv, payload, token};

/// Stateless token minter.
///
/// Holds only the [`KeyScheme`] and the [`Clock`] used for envelope
/// timestamps. The master key is passed on every call and never retained.
/// Instances are `Send + Sync` and can be shared freely between threads.
#[derive(Clone)]
pub struct ScopedKey {
    scheme: KeyScheme,
    clock: Arc<dyn Clock>,
}

impl ScopedKey {
    /// Create a minter using the system clock.
    pub fn new(scheme: KeyScheme) -> Self {
        Self::with_clock(scheme, Arc::new(SystemClock))
    }

    /// Create a minter with a custom clock, e.g. a fixed one in tests.
    pub fn with_clock(scheme: KeyScheme, clock: Arc<dyn Clock>) -> Self {
        Self { scheme, clock }
    }

    /// The key scheme applied to master keys.
    pub fn scheme(&self) -> KeyScheme {
        self.scheme
    }

    /// Seal `policy` into a scoped key token.
    ///
    /// The policy is wrapped in a timestamped JSON envelope before encryption.
    /// When `iv_hex` is `None` a random IV is generated.
    ///
    /// # Errors
    ///
    /// Fails with the kind of whichever step fails first: key, IV, payload,
    /// or cipher.
    pub fn encrypt<P>(&self, master_key: &str, policy: &P, iv_hex: Option<&str>) -> Result<String>
    where
        P: Serialize + ?Sized,
    {
        let key = CipherKey::from_master_key(master_key, self.scheme)?;
        let iv = iv::resolve(iv_hex)?;
        let plaintext = payload::encode(policy, self.clock.as_ref())?;
        self.seal(&key, &iv, &plaintext)
    }

    /// Seal `plaintext` as-is, without the JSON envelope or timestamp.
    ///
    /// # Errors
    ///
    /// Same as [`ScopedKey::encrypt`], minus payload errors.
    pub fn encrypt_string(
        &self,
        master_key: &str,
        plaintext: &str,
        iv_hex: Option<&str>,
    ) -> Result<String> {
        let key = CipherKey::from_master_key(master_key, self.scheme)?;
        let iv = iv::resolve(iv_hex)?;
        self.seal(&key, &iv, plaintext.as_bytes())
    }

    /// Open a token and return its plaintext verbatim.
    ///
    /// # Errors
    ///
    /// Fails with a key, token format, or cipher error. A token that was
    /// tampered with may also decrypt without error to unrelated text; there
    /// is no integrity check beyond the padding.
    pub fn decrypt(&self, master_key: &str, scoped_key: &str) -> Result<String> {
        let key = CipherKey::from_master_key(master_key, self.scheme)?;
        let parsed = token::decode(scoped_key)?;
        let plaintext = cipher::decrypt(&key, &parsed.iv, &parsed.ciphertext)?;
        debug!(
            key_size = ?key.size(),
            plaintext_len = plaintext.len(),
            "scoped key decrypted"
        );
        Ok(payload::decode(&plaintext))
    }

    fn seal(&self, key: &CipherKey, iv: &[u8; iv::IV_LEN], plaintext: &[u8]) -> Result<String> {
        let ciphertext = cipher::encrypt(key, iv, plaintext)?;
        debug!(
            key_size = ?key.size(),
            plaintext_len = plaintext.len(),
            "scoped key minted"
        );
        Ok(token::encode(iv, &ciphertext))
    }
}

impl Default for ScopedKey {
    fn default() -> Self {
        Self::new(KeyScheme::default())
    }
}

impl std::fmt::Debug for ScopedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedKey")
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}

/// [`ScopedKey::encrypt`] with the default scheme and system clock.
///
/// # Errors
///
/// See [`ScopedKey::encrypt`].
pub fn encrypt<P>(master_key: &str, policy: &P, iv_hex: Option<&str>) -> Result<String>
where
    P: Serialize + ?Sized,
{
    ScopedKey::default().encrypt(master_key, policy, iv_hex)
}

/// [`ScopedKey::encrypt_string`] with the default scheme.
///
/// # Errors
///
/// See [`ScopedKey::encrypt_string`].
pub fn encrypt_string(master_key: &str, plaintext: &str, iv_hex: Option<&str>) -> Result<String> {
    ScopedKey::default().encrypt_string(master_key, plaintext, iv_hex)
}

/// [`ScopedKey::decrypt`] with the default scheme.
///
/// # Errors
///
/// See [`ScopedKey::decrypt`].
pub fn decrypt(master_key: &str, scoped_key: &str) -> Result<String> {
    ScopedKey::default().decrypt(master_key, scoped_key)
}
