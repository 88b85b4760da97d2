//! Storefront Library
//!
//! A demo storefront serving an in-memory catalog as HTML pages and
//! publishing every visitor action to Azure Event Hubs. The modules are
//! exposed for the binary and for integration tests.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod eventhub;
pub mod logging;
pub mod models;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export commonly used types at the crate root
pub use catalog::Catalog;
pub use config::Config;
pub use error::{Error, Result};

// Re-export model types
pub use models::{EventType, Product, UserEvent};

// Re-export event publishing types
pub use eventhub::{EventHubSink, EventPublisher, EventSink, SinkError};

// Re-export API server functions
pub use api::server::{create_router, create_server, shutdown_signal};
pub use api::{AppState, HealthState};

#[cfg(any(test, feature = "test-utils"))]
pub use test_utils::MockEventSink;
