//! Configuration loading and validation for the keymint service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is invalid.

use anyhow::{Context, Result};
use scoped_key::KeyScheme;
use serde::Deserialize;

use crate::server::middleware::DEFAULT_REQUEST_TIMEOUT;

/// Validated keymint service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Hex master key used to mint and decrypt scoped keys. When unset the
    /// service starts degraded and answers 503 until restarted with a key.
    ///
    /// Under [`KeyScheme::Legacy`] the hex case of a 32-digit key is
    /// significant: it must match the case used when tokens were minted.
    #[serde(default)]
    pub master_key: Option<String>,

    /// How the master key becomes cipher key bytes (`legacy` or `hex`).
    #[serde(default)]
    pub key_scheme: KeyScheme,

    /// Port the HTTP(S) server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Filesystem path to the PEM-encoded TLS certificate chain. Must be set
    /// together with `tls_key_path`; plain HTTP is served when both are unset.
    #[serde(default)]
    pub tls_cert_path: Option<String>,

    /// Filesystem path to the PEM-encoded TLS private key.
    #[serde(default)]
    pub tls_key_path: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// OTLP endpoint for span export. Logs only when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_port() -> u16 {
    8443
}
fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}
fn default_log_level() -> String {
    "info".into()
}

/// TLS material locations, present only when both paths are configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths<'a> {
    pub cert: &'a str,
    pub key: &'a str,
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// TLS paths if TLS is enabled.
    pub fn tls_paths(&self) -> Option<TlsPaths<'_>> {
        match (&self.tls_cert_path, &self.tls_key_path) {
            (Some(cert), Some(key)) => Some(TlsPaths { cert, key }),
            _ => None,
        }
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    ///
    /// The master key is only checked for blankness here; its format is
    /// validated when it is loaded.
    fn validate(&self) -> Result<()> {
        if let Some(key) = &self.master_key {
            ensure_non_empty(key, "MASTER_KEY")?;
        }
        ensure_non_empty(&self.log_level, "LOG_LEVEL")?;

        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }

        match (&self.tls_cert_path, &self.tls_key_path) {
            (Some(cert), Some(key)) => {
                ensure_non_empty(cert, "TLS_CERT_PATH")?;
                ensure_non_empty(key, "TLS_KEY_PATH")?;
            }
            (None, None) => {}
            _ => anyhow::bail!("TLS_CERT_PATH and TLS_KEY_PATH must be set together"),
        }
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("master_key", &"[REDACTED]")
            .field("key_scheme", &self.key_scheme)
            .field("listen_port", &self.listen_port)
            .field("tls_cert_path", &self.tls_cert_path)
            .field("tls_key_path", &self.tls_key_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("otel_exporter_otlp_endpoint", &self.otel_exporter_otlp_endpoint)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
