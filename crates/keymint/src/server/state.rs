//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use common::ServiceError;
use scoped_key::ScopedKey;

use crate::master_key::MasterKey;

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable so that Axum can clone the state for each
/// request without copying key material.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Stateless token minter configured with the key scheme.
    pub minter: Arc<ScopedKey>,
    /// Master key; `None` when `MASTER_KEY` is unset, leaving the service degraded.
    pub master_key: Option<MasterKey>,
}

impl AppState {
    /// Create a new [`AppState`].
    pub fn new(minter: ScopedKey, master_key: Option<MasterKey>) -> Self {
        Self {
            minter: Arc::new(minter),
            master_key,
        }
    }

    /// Borrow the master key, or report the service as unavailable.
    pub fn master_key(&self) -> Result<&MasterKey, ServiceError> {
        self.master_key
            .as_ref()
            .ok_or_else(|| ServiceError::Unavailable("master key not loaded".into()))
    }
}

impl Default for AppState {
    /// Creates an [`AppState`] with no master key, suitable for tests.
    fn default() -> Self {
        Self::new(ScopedKey::default(), None)
    }
}
