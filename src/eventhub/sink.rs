//! Event sink backed by the Event Hubs Kafka endpoint

use async_trait::async_trait;
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info};

use super::{EventBatch, EventHubConfig, SinkError};

/// External streaming endpoint that accepts batches of encoded events
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Name of the target stream, for logs
    fn name(&self) -> &str;

    /// Start a new empty batch sized to the sink's limit
    async fn create_batch(&self) -> Result<EventBatch, SinkError>;

    /// Submit a batch in one call
    async fn send_batch(&self, batch: EventBatch) -> Result<(), SinkError>;

    /// Release the underlying connection
    async fn close(&self) -> Result<(), SinkError>;
}

/// Producer for the configured event hub
pub struct EventHubSink {
    /// Kafka producer instance
    producer: FutureProducer,

    /// Event hub name, used as the Kafka topic
    topic: String,

    /// Size limit handed to new batches
    max_batch_bytes: usize,

    /// Timeout for send and flush operations
    send_timeout: Duration,

    closed: AtomicBool,
}

impl EventHubSink {
    /// Create the producer from configuration.
    ///
    /// The connection is opened lazily; a bad config fails here, an
    /// unreachable endpoint fails on the first send.
    pub fn new(config: &EventHubConfig) -> crate::error::Result<Self> {
        config.validate()?;

        let producer: FutureProducer = config
            .build_producer_config()?
            .create()
            .map_err(|e| SinkError::Unavailable(format!("Failed to create producer: {}", e)))?;

        info!(event_hub = %config.name, "Event Hub producer initialized");

        Ok(Self {
            producer,
            topic: config.name.clone(),
            max_batch_bytes: config.max_batch_bytes,
            send_timeout: config.send_timeout(),
            closed: AtomicBool::new(false),
        })
    }

    fn ensure_open(&self) -> Result<(), SinkError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(SinkError::Unavailable("producer is closed".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl EventSink for EventHubSink {
    fn name(&self) -> &str {
        &self.topic
    }

    async fn create_batch(&self) -> Result<EventBatch, SinkError> {
        self.ensure_open()?;
        Ok(EventBatch::new(self.max_batch_bytes))
    }

    async fn send_batch(&self, batch: EventBatch) -> Result<(), SinkError> {
        self.ensure_open()?;

        for payload in batch.payloads() {
            let record = FutureRecord::<(), [u8]>::to(&self.topic).payload(payload.as_slice());

            match self.producer.send(record, Timeout::After(self.send_timeout)).await {
                Ok((partition, offset)) => {
                    debug!(
                        "Sent event to '{}' partition {} offset {}",
                        self.topic, partition, offset
                    );
                },
                Err((KafkaError::MessageProduction(RDKafkaErrorCode::MessageSizeTooLarge), _)) => {
                    return Err(SinkError::BatchTooLarge {
                        size: payload.len(),
                        max: self.max_batch_bytes,
                    });
                },
                Err((kafka_error, _)) => return Err(SinkError::Transport(kafka_error)),
            }
        }

        Ok(())
    }

    async fn close(&self) -> Result<(), SinkError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let producer = self.producer.clone();
        let timeout = self.send_timeout;
        tokio::task::spawn_blocking(move || producer.flush(Timeout::After(timeout)))
            .await
            .map_err(|e| SinkError::Unavailable(format!("flush task failed: {}", e)))??;

        info!(event_hub = %self.topic, "Event Hub producer closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config() -> EventHubConfig {
        EventHubConfig {
            connection_string: "localhost:9092".to_string(),
            name: "user-events".to_string(),
            send_timeout_ms: 5000,
            max_batch_bytes: 1024,
        }
    }

    #[test]
    fn test_sink_creation() {
        let sink = EventHubSink::new(&local_config()).unwrap();
        assert_eq!(sink.name(), "user-events");
    }

    #[test]
    fn test_sink_creation_requires_name() {
        let mut config = local_config();
        config.name = String::new();
        assert!(EventHubSink::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_batches_use_configured_limit() {
        let sink = EventHubSink::new(&local_config()).unwrap();
        let batch = sink.create_batch().await.unwrap();
        assert_eq!(batch.max_size_bytes(), 1024);
    }

    #[tokio::test]
    async fn test_closed_sink_is_unavailable() {
        let sink = EventHubSink::new(&local_config()).unwrap();
        sink.close().await.unwrap();
        // closing twice is a no-op
        sink.close().await.unwrap();

        assert!(matches!(
            sink.create_batch().await,
            Err(SinkError::Unavailable(_))
        ));
        assert!(matches!(
            sink.send_batch(EventBatch::new(10)).await,
            Err(SinkError::Unavailable(_))
        ));
    }

    // Integration test would require a running Kafka instance
    #[ignore]
    #[tokio::test]
    async fn test_send_to_local_broker() {
        let sink = EventHubSink::new(&local_config()).unwrap();
        let mut batch = sink.create_batch().await.unwrap();
        assert!(batch.try_add(br#"{"eventType":"PageView"}"#.to_vec()));
        assert!(sink.send_batch(batch).await.is_ok());
    }
}
