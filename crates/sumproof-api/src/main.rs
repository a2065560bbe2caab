//! # sumproof-api — Binary Entry Point
//!
//! Parses configuration, installs logging and the Prometheus recorder,
//! optionally runs key setup, then serves until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use sumproof_api::{AppConfig, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::parse();
    init_tracing(config.log_json);

    let mut state = AppState::from_config(&config);
    if config.metrics_enabled {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("failed to install Prometheus recorder")?;
        state = state.with_prometheus(handle);
    }

    if config.eager_setup {
        let service = Arc::clone(&state.service);
        let result = tokio::task::spawn_blocking(move || service.ensure_ready())
            .await
            .context("eager setup task panicked")?;
        // Failure stays recorded; requests will report it.
        if let Err(e) = result {
            tracing::error!(error = %e, "eager key setup failed");
        }
    }

    let app = sumproof_api::app(state);
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, backend = ?config.backend, "sumproof API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down gracefully");
}
