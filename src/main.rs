use std::sync::Arc;

use tokio::net::TcpListener;

use kcall_signaling::adapters::websocket::{app, ConnectionRegistry, WebSocketState};
use kcall_signaling::config::AppConfig;
use kcall_signaling::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    telemetry::init(&config.server)?;

    tracing::info!("KCall signaling v{} starting", env!("CARGO_PKG_VERSION"));

    // Lives for the whole process; dropped after the server stops
    let registry = Arc::new(ConnectionRegistry::new());
    let state = WebSocketState::new(registry.clone());

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    tracing::info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!(
        open_connections = registry.connection_count().await,
        "Server stopped"
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
