//! watt-web — Axum web server entry point.
//! Serves the chat sessions, appliance catalog, bills and profile as JSON.

mod server;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use watt_core::chat::ChatCommand;
use watt_core::config::Config;

use server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let project_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = Config::load_from_dir(&project_root)?;
    let port = config.port;

    let state = Arc::new(AppState::new(config));
    let state_for_shutdown = Arc::clone(&state);
    let app = server::router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    eprintln!("  Energy assistant listening on http://localhost:{}\n", port);

    // Graceful shutdown on Ctrl+C
    let shutdown = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received, stopping chat sessions...");

        let sessions = state_for_shutdown.sessions.read().await;
        for (id, handle) in sessions.iter() {
            handle.send(ChatCommand::Stop).await;
            info!("{} stopping...", id);
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")?;

    info!("Server stopped.");
    Ok(())
}
