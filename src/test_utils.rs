//! Test utilities for Storefront
//!
//! This module provides mock implementations and utilities for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::api::{AppState, HealthState};
use crate::catalog::Catalog;
use crate::config::{Config, ServerConfig, SessionConfig};
use crate::eventhub::{EventBatch, EventHubConfig, EventPublisher, EventSink, SinkError};
use crate::models::UserEvent;

/// In-memory event sink that records every batch it receives
#[derive(Debug, Clone)]
pub struct MockEventSink {
    batches: Arc<Mutex<Vec<EventBatch>>>,
    fail_next: Arc<Mutex<Option<String>>>,
    closed: Arc<AtomicBool>,
    max_batch_bytes: usize,
}

impl Default for MockEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEventSink {
    /// Create a mock sink with the Event Hubs batch limit
    pub fn new() -> Self {
        Self::with_max_batch_bytes(1024 * 1024)
    }

    /// Create a mock sink with a custom batch limit
    pub fn with_max_batch_bytes(max_batch_bytes: usize) -> Self {
        Self {
            batches: Arc::new(Mutex::new(Vec::new())),
            fail_next: Arc::new(Mutex::new(None)),
            closed: Arc::new(AtomicBool::new(false)),
            max_batch_bytes,
        }
    }

    /// Configure the mock to reject the next send
    pub fn fail_next_send(&self, error_message: &str) {
        *self.fail_next.lock().unwrap() = Some(error_message.to_string());
    }

    /// Batches accepted so far
    pub fn batches(&self) -> Vec<EventBatch> {
        self.batches.lock().unwrap().clone()
    }

    /// Events accepted so far, decoded from their payloads
    pub fn sent_events(&self) -> Vec<UserEvent> {
        self.batches
            .lock()
            .unwrap()
            .iter()
            .flat_map(|b| b.payloads().to_vec())
            .map(|p| serde_json::from_slice(&p).unwrap())
            .collect()
    }

    /// Forget recorded batches
    pub fn clear(&self) {
        self.batches.lock().unwrap().clear();
    }

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn check_open(&self) -> Result<(), SinkError> {
        if self.is_closed() {
            return Err(SinkError::Unavailable("mock sink closed".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl EventSink for MockEventSink {
    fn name(&self) -> &str {
        "mock-events"
    }

    async fn create_batch(&self) -> Result<EventBatch, SinkError> {
        self.check_open()?;
        Ok(EventBatch::new(self.max_batch_bytes))
    }

    async fn send_batch(&self, batch: EventBatch) -> Result<(), SinkError> {
        self.check_open()?;
        if let Some(message) = self.fail_next.lock().unwrap().take() {
            return Err(SinkError::Unavailable(message));
        }
        self.batches.lock().unwrap().push(batch);
        Ok(())
    }

    async fn close(&self) -> Result<(), SinkError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Configuration suitable for router tests
pub fn create_test_config() -> Arc<Config> {
    Arc::new(Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            log_level: "debug".to_string(),
            environment: "test".to_string(),
            request_timeout_secs: 30,
            shutdown_timeout_secs: 30,
        },
        session: SessionConfig {
            secret: "test-session-secret".to_string(),
            max_age_minutes: 30,
            cookie_name: "storefront.sid".to_string(),
            secure_cookie: false,
            sweep_interval_secs: 60,
        },
        event_hub: EventHubConfig {
            connection_string: "localhost:9092".to_string(),
            name: "test-events".to_string(),
            send_timeout_ms: 5000,
            max_batch_bytes: 1024 * 1024,
        },
    })
}

/// Application state over the demo catalog and the given mock sink
pub fn create_test_state(sink: &MockEventSink) -> AppState {
    let health = Arc::new(HealthState::new());
    let publisher = EventPublisher::new(Arc::new(sink.clone()), health.clone());
    AppState::new(Arc::new(Catalog::demo()), publisher, health)
}
