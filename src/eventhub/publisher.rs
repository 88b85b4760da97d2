//! Publishes user events to the event sink, one event per batch

use std::sync::Arc;
use tracing::{info, warn};

use super::{EventSink, SinkError};
use crate::api::{HealthState, HealthStatus};
use crate::logging::Timer;
use crate::models::UserEvent;

/// Component name reported on the readiness endpoint
pub const SINK_COMPONENT: &str = "event_hub";

/// Sends each user event to the sink as its own batch
#[derive(Clone)]
pub struct EventPublisher {
    sink: Arc<dyn EventSink>,
    health: Arc<HealthState>,
}

impl EventPublisher {
    /// Create a publisher over a sink, reporting sink state into `health`
    pub fn new(sink: Arc<dyn EventSink>, health: Arc<HealthState>) -> Self {
        Self { sink, health }
    }

    /// Publish one event and wait for the sink to accept it.
    ///
    /// Errors are logged and returned unchanged; nothing is retried.
    pub async fn send_event(&self, event: &UserEvent) -> Result<(), SinkError> {
        let timer = Timer::start("event_hub_send");
        let result = self.send_single(event).await;
        let elapsed = timer.stop();

        match &result {
            Ok(()) => {
                info!(
                    event_type = %event.event_type,
                    product_name = %event.product_name,
                    event_hub = %self.sink.name(),
                    duration_ms = elapsed.as_millis() as u64,
                    "Event sent"
                );
                self.health
                    .update_component(SINK_COMPONENT.to_string(), HealthStatus::Healthy, None)
                    .await;
            },
            Err(e) => {
                crate::log_error!(
                    e,
                    "Error sending event",
                    event_type = event.event_type,
                    event_id = event.event_id,
                );
                self.health
                    .update_component(
                        SINK_COMPONENT.to_string(),
                        HealthStatus::Degraded,
                        Some(e.to_string()),
                    )
                    .await;
            },
        }

        result
    }

    async fn send_single(&self, event: &UserEvent) -> Result<(), SinkError> {
        let payload = event.to_payload()?;
        let size = payload.len();

        let mut batch = self.sink.create_batch().await?;
        if !batch.try_add(payload) {
            return Err(SinkError::BatchTooLarge {
                size,
                max: batch.max_size_bytes(),
            });
        }

        self.sink.send_batch(batch).await
    }

    /// Release the sink connection. Best-effort: failures are only logged.
    pub async fn close(&self) {
        match self.sink.close().await {
            Ok(()) => info!(event_hub = %self.sink.name(), "Event publisher closed"),
            Err(e) => warn!(error = %e, "Failed to close event sink cleanly"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventType, Product};
    use crate::test_utils::MockEventSink;

    fn publisher(sink: &MockEventSink) -> (EventPublisher, Arc<HealthState>) {
        let health = Arc::new(HealthState::new());
        (
            EventPublisher::new(Arc::new(sink.clone()), health.clone()),
            health,
        )
    }

    #[tokio::test]
    async fn test_send_event_wraps_single_event_batch() {
        let sink = MockEventSink::new();
        let (publisher, _) = publisher(&sink);

        let event = UserEvent::listing_view("user-1", "sess-1");
        publisher.send_event(&event).await.unwrap();
        publisher.send_event(&event).await.unwrap();

        let batches = sink.batches();
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| b.count() == 1));
        assert_eq!(sink.sent_events()[0].event_id, event.event_id);
    }

    #[tokio::test]
    async fn test_oversized_event_is_rejected_before_sending() {
        let sink = MockEventSink::with_max_batch_bytes(64);
        let (publisher, _) = publisher(&sink);

        let product = Product::new("P1", "x".repeat(200), "d", 1.0, "c", "i");
        let event = UserEvent::for_product(EventType::Purchase, &product, "user-1", "sess-1");

        let err = publisher.send_event(&event).await.unwrap_err();
        assert!(matches!(err, SinkError::BatchTooLarge { max: 64, .. }));
        assert!(sink.batches().is_empty());
    }

    #[tokio::test]
    async fn test_sink_failure_propagates_and_degrades_health() {
        let sink = MockEventSink::new();
        let (publisher, health) = publisher(&sink);

        sink.fail_next_send("connection refused");
        let err = publisher
            .send_event(&UserEvent::listing_view("user-1", "sess-1"))
            .await
            .unwrap_err();

        assert!(matches!(err, SinkError::Unavailable(_)));
        assert!(sink.batches().is_empty());
        assert_eq!(health.get_status().await, HealthStatus::Degraded);

        // next send succeeds without any retry of the failed one
        publisher
            .send_event(&UserEvent::listing_view("user-1", "sess-1"))
            .await
            .unwrap();
        assert_eq!(sink.batches().len(), 1);
        assert_eq!(health.get_status().await, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn test_close_releases_sink() {
        let sink = MockEventSink::new();
        let (publisher, _) = publisher(&sink);

        publisher.close().await;
        assert!(sink.is_closed());
        assert!(publisher
            .send_event(&UserEvent::listing_view("user-1", "sess-1"))
            .await
            .is_err());
    }
}
