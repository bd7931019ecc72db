use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use weather_core::{Config, OpenWeatherClient};

use crate::{routes, state::AppState};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    if config.api_key.is_none() {
        warn!("No OpenWeatherMap API key configured; weather routes will answer 500");
    }

    let upstream =
        OpenWeatherClient::from_config(&config).context("Failed to initialize upstream client")?;

    info!(
        port = config.port,
        base_url = %config.base_url,
        timeout_secs = config.timeout_secs,
        "Configuration loaded"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = routes::create_router(AppState::new(config, Arc::new(upstream)));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on port {}", addr.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
