//! Scoped access tokens.
//!
//! A scoped key is an opaque hex string carrying a security policy (read or
//! write filters, allowed operations) encrypted under a shared master key. A
//! downstream service holding the same master key decrypts it to recover the
//! policy, with no round-trip to the issuer.
//!
//! # Pipeline
//!
//! ```text
//! encrypt: key::decode -> iv::resolve -> payload::encode -> cipher::encrypt -> token::encode
//! decrypt: key::decode -> token::decode -> cipher::decrypt -> payload::decode
//! ```
//!
//! # Token format
//!
//! ```text
//! hex(iv: 16 bytes) || hex(AES-CBC-PKCS#7 ciphertext)
//! ```
//!
//! The construction gives confidentiality only. There is no MAC, and callers
//! must not treat a successful decryption as proof the token is unmodified.
//!
//! ```
//! let master_key = "0123456789ABCDEF0123456789ABCDEF";
//! let policy = serde_json::json!({ "allowed_operations": ["read"] });
//!
//! let token = scoped_key::encrypt(master_key, &policy, None)?;
//! let plaintext = scoped_key::decrypt(master_key, &token)?;
//! assert!(plaintext.contains("\"timestamp\""));
//! # Ok::<(), scoped_key::Error>(())
//! ```

pub mod cipher;
pub mod error;
pub mod iv;
pub mod key;
pub mod payload;
pub mod scoped;
pub mod token;

pub use error::{Error, ErrorKind, Result};
pub use key::{KeyScheme, KeySize};
pub use payload::{Clock, SystemClock};
pub use scoped::{decrypt, encrypt, encrypt_string, ScopedKey};
