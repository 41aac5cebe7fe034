//! TLS server configuration using rustls.
//!
//! The certificate chain and private key are read from PEM files named in the
//! configuration.

use anyhow::{Context, Result};
use rustls::ServerConfig;
use std::sync::Arc;

use crate::config::TlsPaths;

/// Read the PEM files at `paths` and build a [`rustls::ServerConfig`].
///
/// # Errors
///
/// Returns an error if either file cannot be read or parsed.
pub fn load_server_config(paths: &TlsPaths<'_>) -> Result<Arc<ServerConfig>> {
    let cert_pem = std::fs::read(paths.cert)
        .with_context(|| format!("failed to read TLS certificate from {}", paths.cert))?;
    let key_pem = std::fs::read(paths.key)
        .with_context(|| format!("failed to read TLS private key from {}", paths.key))?;
    build_server_config(&cert_pem, &key_pem)
}

/// Build a [`rustls::ServerConfig`] from PEM-encoded certificate and private key bytes.
///
/// # Errors
///
/// Returns an error if the certificate or key cannot be parsed, or if rustls
/// rejects the configuration.
pub fn build_server_config(cert_pem: &[u8], key_pem: &[u8]) -> Result<Arc<ServerConfig>> {
    let certs = rustls_pemfile::certs(&mut std::io::BufReader::new(cert_pem))
        .collect::<Result<Vec<_>, _>>()
        .context("failed to parse TLS certificate chain")?;
    if certs.is_empty() {
        anyhow::bail!("no certificates found in PEM data");
    }

    let key = rustls_pemfile::private_key(&mut std::io::BufReader::new(key_pem))
        .context("failed to read TLS private key")?
        .context("no private key found in PEM data")?;

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let mut config = ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .context("failed to select TLS protocol versions")?
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .context("failed to build rustls ServerConfig")?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Ok(Arc::new(config))
}
