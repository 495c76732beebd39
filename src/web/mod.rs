//! Web server exposing the sensor state.
//!
//! Two read-only endpoints render the state store: `/json` for
//! programmatic consumers and `/prometheus` for scrapers. Requests
//! never block on the sampler beyond the store's brief record lock.

pub mod config;
pub mod handlers;
pub mod router;

// Re-export commonly used items
pub use config::WebConfig;
pub use router::create_app;

use crate::error::{MonitorError, Result};
use crate::sensor::state::StateStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Start the web server and serve until ctrl-c.
pub async fn start_web_server(config: WebConfig, store: Arc<StateStore>) -> Result<()> {
    let app = create_app(&config, store);

    let addr = config
        .bind_address()
        .parse::<SocketAddr>()
        .map_err(|e| MonitorError::config_error(format!("invalid bind address: {}", e)))?;

    info!("Starting doorwatch web server on http://{}", addr);
    info!("State endpoint: http://{}/json", addr);
    info!("Metrics endpoint: http://{}/prometheus", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MonitorError::web_server_error(format!("failed to bind to address: {}", e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MonitorError::web_server_error(format!("server error: {}", e)))?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
