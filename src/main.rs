// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::application::console_session::ConsoleSession;
use crate::infrastructure::config::load_console_config;
use crate::infrastructure::random_source::ThreadRngSource;
use crate::presentation::app_state::AppState;
use crate::presentation::router::create_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_console_config()?;

    // One console session per process, starting at the login screen
    let session = ConsoleSession::new(config.telemetry.clone(), Arc::new(ThreadRngSource));
    let state = Arc::new(AppState::new(session, config.telemetry.stream_compression));

    let router = create_router(state.clone());

    let addr = config.server.bind_address;
    tracing::info!("Starting membrane console on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    Ok(())
}

/// Waits for Ctrl-C, then tears the session down so the engine timer is released
async fn shutdown_signal(state: Arc<AppState>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutting down");
    state.session.lock().await.reset();
}
