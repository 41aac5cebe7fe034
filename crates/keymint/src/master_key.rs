//! [`MasterKey`]: the configured master key, validated once at startup.
//!
//! # Security invariants
//!
//! - The master key is **never** logged or included in traces.
//! - The string is zeroed when the last clone is dropped.

use std::sync::Arc;

use scoped_key::key::{CipherKey, KeyError};
use scoped_key::KeyScheme;
use zeroize::Zeroizing;

/// Master key string shared by all request handlers.
///
/// Cloning is cheap; all clones share one zeroizing buffer.
#[derive(Clone)]
pub struct MasterKey(Arc<Zeroizing<String>>);

impl MasterKey {
    /// Validate `raw` under `scheme` and wrap it.
    ///
    /// The key is kept exactly as given apart from surrounding whitespace.
    /// Under [`KeyScheme::Legacy`] a 32-digit key's hex case is part of the
    /// key, so it is never normalised.
    ///
    /// # Errors
    ///
    /// Returns the [`KeyError`] describing why the key is unusable.
    pub fn load(raw: &str, scheme: KeyScheme) -> Result<Self, KeyError> {
        CipherKey::from_master_key(raw, scheme)?;
        Ok(Self(Arc::new(Zeroizing::new(raw.trim().to_owned()))))
    }

    /// Load the configured key, if any. `None` leaves the service degraded.
    ///
    /// # Errors
    ///
    /// Returns the [`KeyError`] of a configured but unusable key.
    pub fn from_config(raw: Option<&str>, scheme: KeyScheme) -> Result<Option<Self>, KeyError> {
        raw.map(|raw| Self::load(raw, scheme)).transpose()
    }

    /// Borrow the key string for a single mint or decrypt call.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("MasterKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0123456789ABCDEF0123456789ABCDEF";

    #[test]
    fn load_valid_key() {
        let key = MasterKey::load(&format!("{KEY}\n"), KeyScheme::Legacy).unwrap();
        assert_eq!(key.expose(), KEY);
    }

    #[test]
    fn load_rejects_invalid_keys() {
        assert_eq!(
            MasterKey::load("", KeyScheme::Legacy).unwrap_err(),
            KeyError::Missing
        );
        assert_eq!(
            MasterKey::load("not hex", KeyScheme::Hex).unwrap_err(),
            KeyError::InvalidHex
        );
        assert_eq!(
            MasterKey::load("abcd", KeyScheme::Hex).unwrap_err(),
            KeyError::UnsupportedLength(2)
        );
    }

    #[test]
    fn load_keeps_hex_case() {
        let lower = KEY.to_lowercase();
        let key = MasterKey::load(&lower, KeyScheme::Legacy).unwrap();
        assert_eq!(key.expose(), lower);
    }

    #[test]
    fn from_config_without_key_is_degraded() {
        assert!(MasterKey::from_config(None, KeyScheme::Legacy)
            .unwrap()
            .is_none());
    }

    #[test]
    fn from_config_loads_or_rejects_configured_key() {
        let key = MasterKey::from_config(Some(KEY), KeyScheme::Legacy).unwrap();
        assert_eq!(key.unwrap().expose(), KEY);
        assert_eq!(
            MasterKey::from_config(Some("abcd"), KeyScheme::Hex).unwrap_err(),
            KeyError::UnsupportedLength(2)
        );
    }

    #[test]
    fn clones_share_the_key() {
        let key = MasterKey::load(KEY, KeyScheme::Hex).unwrap();
        let clone = key.clone();
        assert_eq!(clone.expose(), key.expose());
    }

    #[test]
    fn master_key_redacted_in_debug() {
        let key = MasterKey::load(KEY, KeyScheme::Legacy).unwrap();
        let dbg = format!("{key:?}");
        assert!(dbg.contains("REDACTED"));
        assert!(!dbg.contains("0123"));
    }
}
