//! Request and response types exchanged with the `keymint` service.
//!
//! All bodies are JSON.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Mint endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /scoped-keys`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintRequest {
    /// Security policy to embed. Any JSON value, including `null`.
    #[serde(default)]
    pub policy: serde_json::Value,

    /// Optional IV as 32 hex digits. A random IV is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iv: Option<String>,
}

/// Successful response body for `POST /scoped-keys`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintResponse {
    /// The minted token: `hex(iv) || hex(ciphertext)`.
    pub scoped_key: String,
}

// ---------------------------------------------------------------------------
// Decrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /scoped-keys/decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptRequest {
    /// Token previously minted under the same master key.
    pub scoped_key: String,
}

/// Successful response body for `POST /scoped-keys/decrypt`.
///
/// The plaintext is returned verbatim; it is not guaranteed to be JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    pub plaintext: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Whether a master key is loaded.
    pub master_key_loaded: bool,
}
