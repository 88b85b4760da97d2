//! Event Hubs integration for user activity events
//!
//! This module provides:
//! - Connection-string parsing and producer configuration for the Event Hubs
//!   Kafka endpoint (or a plain Kafka broker for local runs)
//! - A size-bounded [`EventBatch`] mirroring the SDK batch API
//! - The [`EventSink`] seam and its rdkafka-backed [`EventHubSink`]
//! - The [`EventPublisher`] used by request handlers
//!
//! Every published batch holds exactly one event. There is no retry,
//! partitioning or coalescing; failures go straight back to the caller.

mod batch;
mod config;
mod publisher;
mod sink;

pub use batch::EventBatch;
pub use config::{EventHubConfig, SinkEndpoint};
pub use publisher::{EventPublisher, SINK_COMPONENT};
pub use sink::{EventHubSink, EventSink};

use rdkafka::error::KafkaError;
use thiserror::Error;

/// Errors raised while publishing to the event sink
#[derive(Debug, Error)]
pub enum SinkError {
    /// A single event does not fit in an empty batch
    #[error("Event is too large for the batch ({size} bytes, limit {max} bytes)")]
    BatchTooLarge { size: usize, max: usize },

    /// The sink cannot be reached or has been closed
    #[error("Event sink unavailable: {0}")]
    Unavailable(String),

    /// The send call itself was rejected
    #[error("Event send failed: {0}")]
    Transport(#[from] KafkaError),

    /// The event could not be encoded
    #[error("Event serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
