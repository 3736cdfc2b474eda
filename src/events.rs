//! Lifecycle events published by the workflow facade
//!
//! Consumers that want to mirror the audit trail elsewhere subscribe by
//! injecting an [`EventPublisher`]. The core publishes synchronously and
//! never retries; a publisher must not fail.

use crate::identifiers::RecordId;
use crate::stage::Stage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Something that happened to a workflow record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordEvent {
    /// A record was created (not yet advanced anywhere)
    RecordCreated {
        /// The new record
        record_id: RecordId,
        /// Stage the record was created at
        stage: Stage,
        /// Creation timestamp
        created_at: DateTime<Utc>,
    },

    /// Fields were merged into a record's data bag
    FieldsMerged {
        /// The updated record
        record_id: RecordId,
        /// Keys that were written (added or overwritten)
        keys: Vec<String>,
    },

    /// A record completed a stage and its history grew by one entry
    StageCompleted {
        /// The advanced record
        record_id: RecordId,
        /// The completed stage
        stage: Stage,
        /// True when the entry is synthetic (bypassed stage, no form shown)
        synthetic: bool,
        /// When the stage completed
        recorded_at: DateTime<Utc>,
    },

    /// A single-vendor record was moved past `Negotiation` without input
    NegotiationAutoSkipped {
        /// The skipped record
        record_id: RecordId,
    },

    /// A record passed the last working stage
    RecordCompleted {
        /// The finished record
        record_id: RecordId,
        /// When it completed
        completed_at: DateTime<Utc>,
    },
}

impl RecordEvent {
    /// Event type name for logging and routing
    pub fn event_type(&self) -> &'static str {
        match self {
            RecordEvent::RecordCreated { .. } => "RecordCreated",
            RecordEvent::FieldsMerged { .. } => "FieldsMerged",
            RecordEvent::StageCompleted { .. } => "StageCompleted",
            RecordEvent::NegotiationAutoSkipped { .. } => "NegotiationAutoSkipped",
            RecordEvent::RecordCompleted { .. } => "RecordCompleted",
        }
    }

    /// The record this event concerns
    pub fn record_id(&self) -> RecordId {
        match self {
            RecordEvent::RecordCreated { record_id, .. }
            | RecordEvent::FieldsMerged { record_id, .. }
            | RecordEvent::StageCompleted { record_id, .. }
            | RecordEvent::NegotiationAutoSkipped { record_id }
            | RecordEvent::RecordCompleted { record_id, .. } => *record_id,
        }
    }
}

/// Sink for lifecycle events emitted by the facade
pub trait EventPublisher: Send + Sync {
    /// Publish one event
    fn publish(&self, event: RecordEvent);
}

/// Publisher that drops every event; the default when none is injected
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventPublisher;

impl EventPublisher for NullEventPublisher {
    fn publish(&self, _event: RecordEvent) {}
}

/// In-memory publisher for tests and simple consumers
#[derive(Clone, Default)]
pub struct MemoryEventPublisher {
    events: Arc<RwLock<Vec<RecordEvent>>>,
}

impl MemoryEventPublisher {
    /// Create an empty in-memory publisher
    pub fn new() -> Self {
        Self::default()
    }

    /// All events published so far, in order
    pub fn events(&self) -> Vec<RecordEvent> {
        self.events.read().unwrap().clone()
    }

    /// Event type names published so far, in order
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events
            .read()
            .unwrap()
            .iter()
            .map(RecordEvent::event_type)
            .collect()
    }
}

impl EventPublisher for MemoryEventPublisher {
    fn publish(&self, event: RecordEvent) {
        self.events.write().unwrap().push(event);
    }
}
