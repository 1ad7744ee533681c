//! # agritrust-api — Binary Entry Point
//!
//! Starts the HTTP server on `AGRITRUST_PORT` (default 8080).

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use agritrust_api::{AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("loading configuration")?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.json_logs {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    if config.dev_secret {
        tracing::warn!("AGRITRUST_PROOF_SECRET is not set; signing with the development secret");
    }

    let port = config.port;
    let state = AppState::from_config(config).context("building ledger")?;
    let app = agritrust_api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "agritrust-api listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
