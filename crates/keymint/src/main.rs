//! `keymint` — scoped key service entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (JSON logs, optional OTLP export).
//! 3. Validate the master key, or start degraded when none is configured.
//! 4. Build the Axum router and serve it over TLS or plain HTTP.

mod config;
mod master_key;
mod server;
mod telemetry;

use std::time::Duration;

use anyhow::{Context, Result};
use scoped_key::ScopedKey;
use tracing::{info, warn};

use config::Config;
use master_key::MasterKey;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        key_scheme = ?cfg.key_scheme,
        tls = cfg.tls_paths().is_some(),
        master_key_configured = cfg.master_key.is_some(),
        "keymint starting"
    );

    // -----------------------------------------------------------------------
    // 3. Master key
    // -----------------------------------------------------------------------
    let master_key = MasterKey::from_config(cfg.master_key.as_deref(), cfg.key_scheme)
        .context("MASTER_KEY is invalid")?;
    if master_key.is_none() {
        warn!("MASTER_KEY not set; serving degraded until restarted with a key");
    }

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(ScopedKey::new(cfg.key_scheme), master_key);
    let router = server::router::build(state, Duration::from_secs(cfg.request_timeout_secs));

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "listening");

    let served = match cfg.tls_paths() {
        Some(paths) => {
            let tls = server::tls::load_server_config(&paths)?;
            server::listener::serve_tls(listener, router, tls).await
        }
        None => server::listener::serve_plain(listener, router).await,
    };

    info!("keymint stopped");
    telemetry::shutdown_telemetry();
    served
}
