//! Shared application state

use axum::extract::FromRef;
use std::sync::Arc;

use crate::api::{HealthState, VisitorStore};
use crate::catalog::Catalog;
use crate::eventhub::EventPublisher;

/// State handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// Read-only product table
    pub catalog: Arc<Catalog>,
    /// Event publisher shared by all requests
    pub publisher: EventPublisher,
    /// Component health tracking
    pub health: Arc<HealthState>,
    /// Server-side session records
    pub sessions: VisitorStore,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>, publisher: EventPublisher, health: Arc<HealthState>) -> Self {
        Self {
            catalog,
            publisher,
            health,
            sessions: VisitorStore::new(),
        }
    }
}

impl FromRef<AppState> for Arc<HealthState> {
    fn from_ref(state: &AppState) -> Self {
        state.health.clone()
    }
}
