//! Storefront - demo shop with real-time activity tracking
//!
//! Serves the product catalog and streams page views, product views,
//! add-to-cart and purchase events to Azure Event Hubs.

use std::sync::Arc;

use storefront::{
    api::{self, AppState, HealthState},
    config::Config,
    error::Result,
    logging, Catalog, EventHubSink, EventPublisher,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Arc::new(Config::from_env()?);

    // Missing or invalid sink settings stop the process here
    config.validate()?;

    // Initialize logging/tracing
    logging::init_tracing(&config.server)?;

    // Log configuration (with sensitive data masked)
    config.log_config();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Storefront");

    let health = Arc::new(HealthState::new());
    let sink = Arc::new(EventHubSink::new(&config.event_hub)?);
    let publisher = EventPublisher::new(sink, health.clone());
    let state = AppState::new(Arc::new(Catalog::demo()), publisher.clone(), health);

    let served = api::server::create_server(config.clone(), state).await;

    tracing::info!("Shutting down, closing event publisher");
    if tokio::time::timeout(config.server.shutdown_timeout(), publisher.close())
        .await
        .is_err()
    {
        tracing::warn!("Timed out closing event publisher");
    }

    served?;
    tracing::info!("Storefront shutdown complete");
    Ok(())
}
