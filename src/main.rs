//! Pong Match Server - process entry point
//!
//! Builds the engine state and waits for shutdown. The transport adapter
//! that drives the engine (websocket gateway or otherwise) is wired in by
//! the embedding deployment; this binary hosts the engine alone.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pong_match_server::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting Pong Match Server");
    info!(
        tick_interval_ms = config.tick_interval.as_millis() as u64,
        pairing_policy = ?config.pairing_policy,
        "Engine configuration loaded"
    );

    // Create engine state
    let state = AppState::new(config);

    // Wait for shutdown
    shutdown_signal().await;

    info!(
        active_lobbies = state.registry.lobby_count(),
        "Server shutdown complete"
    );
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, starting graceful shutdown"),
        Err(e) => info!(error = %e, "Signal handler failed, shutting down"),
    }
}
