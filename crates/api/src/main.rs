//! `lucky-api` -- daily lucky scratch draw server.
//!
//! Configuration comes from the environment (see [`ServerConfig`] and
//! [`GameConfig`]); a `.env` file is honored.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use lucky_api::bootstrap::start_engine;
use lucky_api::config::{GameConfig, ServerConfig};
use lucky_api::router::build_app_router;
use lucky_api::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lucky_api=debug,lucky_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid server configuration");
        std::process::exit(1);
    });
    let game = GameConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid game configuration");
        std::process::exit(1);
    });

    // --- Draw engine ---
    let engine = start_engine(&game).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to start draw engine");
        std::process::exit(1);
    });
    tracing::info!(
        reset_time = %game.window_reset_time,
        utc_offset = ?game.window_utc_offset,
        "Draw engine started"
    );

    // --- App state ---
    let state = AppState {
        draw: engine.service.handle(),
        prizes: Arc::clone(&engine.prizes),
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let host: IpAddr = config.host.parse().unwrap_or_else(|e| {
        tracing::error!(host = %config.host, error = %e, "Invalid HOST address");
        std::process::exit(1);
    });
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap_or_else(|e| {
        tracing::error!(%addr, error = %e, "Failed to bind to address");
        std::process::exit(1);
    });

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
    }

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    engine.service.shutdown().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
