//! Ingestion API for readings pushed by sensor nodes.
//!
//! Accepts single readings (temperature plus optional CO2, noise and light),
//! stamps and stores them, and answers range and aggregate queries. Reading
//! routes can be gated by a shared secret.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod router;
pub mod store;

// Re-export commonly used items
pub use config::WebConfig;
pub use router::create_app;
pub use store::ReadingStore;

use crate::error::{Result, SensorError};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Start the ingestion server and serve until it fails.
pub async fn start_web_server(config: WebConfig, store: Arc<ReadingStore>) -> Result<()> {
    let app = create_app(&config, store);

    // Parse the bind address
    let addr = config
        .bind_address()
        .parse::<SocketAddr>()
        .map_err(|e| SensorError::config_error(format!("Invalid bind address: {}", e)))?;

    info!("Starting sensorlink ingestion API on http://{}", addr);
    info!("Readings endpoint: http://{}/sensor-data", addr);
    info!("Aggregates endpoint: http://{}/sensor-data/stats", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SensorError::web_server_error(format!("Failed to bind to address: {}", e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| SensorError::web_server_error(format!("Server error: {}", e)))?;

    Ok(())
}
