//! # The event record delivered to subscribers.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use super::data::{EventData, EventKind};

/// Immutable record of a completed domain mutation.
///
/// Constructed once by the producing service after its store mutation
/// commits, delivered to zero or more subscribers, then discarded. The bus
/// itself never persists events.
///
/// ### Invariant
/// `kind` and `entity_id` are derived from `data` at construction and never
/// diverge from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Event classification, derived from the payload.
    pub kind: EventKind,
    /// Id of the acting principal.
    pub user_id: String,
    /// Id of the affected entity, derived from the payload.
    pub entity_id: String,
    /// Unix timestamp (seconds) assigned at construction.
    ///
    /// Monotonic enough for display/audit ordering; the bus does not use it
    /// for sequencing.
    pub timestamp: i64,
    /// Typed payload.
    pub data: EventData,
}

impl Event {
    /// Creates an event for the given acting user and payload.
    ///
    /// `kind` and `entity_id` are taken from the payload; construction
    /// cannot fail.
    pub fn new(user_id: impl Into<String>, data: EventData) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();

        Self {
            kind: data.kind(),
            user_id: user_id.into(),
            entity_id: data.entity_id().to_string(),
            timestamp,
            data,
        }
    }

    /// Renders the event as a JSON string (for audit logs).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
