//! decomp-server - subtask generation over HTTP
//!
//! Builds the subtask engine once at startup and serves it on a TCP socket.

use anyhow::Context;
use decomp_core::SubtaskEngine;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod error;
mod routes;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging
    let filter = EnvFilter::from_default_env()
        .add_directive("decomp_server=info".parse()?)
        .add_directive("decomp_core=info".parse()?);
    if config.json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }

    info!("decomp-server v{}", env!("CARGO_PKG_VERSION"));
    info!("Config loaded from {:?}", config.config_path);

    // Catalog or model problems are fatal: never serve without an engine
    let engine = SubtaskEngine::bootstrap(&config.engine)
        .await
        .with_context(|| {
            format!(
                "failed to start engine from {}",
                config.engine.catalog_path.display()
            )
        })?;

    let state = state::AppState::new(config, engine);
    let listener = tokio::net::TcpListener::bind(state.config.bind)
        .await
        .with_context(|| format!("failed to bind {}", state.config.bind))?;
    info!("Listening on {}", listener.local_addr()?);

    let app = routes::create_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
