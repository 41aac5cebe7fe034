//! Telemetry setup: structured JSON logs, plus span export over OTLP when an
//! endpoint is configured.
//!
//! # Telemetry invariants
//!
//! - **No master key, IV, policy or plaintext** may appear in any span
//!   attribute or log field. Tokens are credentials and are not logged either.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`), and
//!   `RUST_LOG` takes precedence when set.

pub mod init;

pub use init::{init_telemetry, shutdown_telemetry};
