//! Scratch Reaper - Upload scratch file server
//!
//! Accepts document uploads for Markdown conversion and reclaims expired
//! scratch files in the background.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scratch_reaper::api::create_router;
use scratch_reaper::{spawn_reaper_task, AppState, Config};

/// Main entry point for the scratch file server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the scratch registry and its directory
/// 4. Start the background reaper
/// 5. Serve the HTTP API until SIGINT/SIGTERM
/// 6. Stop the reaper and wait for it to finish
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scratch_reaper=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting scratch file server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: dir={}, max_upload={} bytes, expiry={}s, sweep_interval={}s, port={}",
        config.scratch.scratch_dir.display(),
        config.scratch.max_upload_bytes,
        config.scratch.expiry.as_secs(),
        config.scratch.sweep_interval.as_secs(),
        config.server_port
    );

    let state = AppState::from_config(&config).context("failed to prepare scratch directory")?;
    info!("Scratch registry initialized");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let reaper_handle = spawn_reaper_task(
        state.registry.clone(),
        config.scratch.sweep_interval,
        shutdown_rx,
    );

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if shutdown_tx.send(true).is_err() {
        warn!("Scratch reaper already stopped");
    }
    if let Err(e) = reaper_handle.await {
        warn!("Scratch reaper ended abnormally: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
