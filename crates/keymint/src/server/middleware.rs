//! Middleware settings shared by the router and configuration.
//!
//! The layers themselves are attached in [`super::router::build`].

use std::time::Duration;

/// Per-request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
