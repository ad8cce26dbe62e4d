//! # Typed event payloads.
//!
//! [`EventData`] is a closed set of payload variants: one {Created, Updated,
//! Deleted} family per entity type. Each variant knows its own [`EventKind`]
//! and the id of the entity it refers to; [`Event::new`](crate::Event::new)
//! uses those accessors to populate the event's top-level fields, so the
//! fields can never disagree with the payload.

use serde::Serialize;

/// Classification of domain mutation events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    ItemCreated,
    ItemUpdated,
    ItemDeleted,
    UserCreated,
    UserUpdated,
    UserDeleted,
}

impl EventKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::ItemCreated => "item_created",
            EventKind::ItemUpdated => "item_updated",
            EventKind::ItemDeleted => "item_deleted",
            EventKind::UserCreated => "user_created",
            EventKind::UserUpdated => "user_updated",
            EventKind::UserDeleted => "user_deleted",
        }
    }
}

/// Payload of a domain mutation event.
///
/// Closed set: one Created/Updated/Deleted variant per entity family. Each
/// variant carries the id of the mutated entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EventData {
    ItemCreated { id: String },
    ItemUpdated { id: String },
    ItemDeleted { id: String },
    UserCreated { id: String },
    UserUpdated { id: String },
    UserDeleted { id: String },
}

impl EventData {
    /// The event classification this payload implies.
    pub fn kind(&self) -> EventKind {
        match self {
            EventData::ItemCreated { .. } => EventKind::ItemCreated,
            EventData::ItemUpdated { .. } => EventKind::ItemUpdated,
            EventData::ItemDeleted { .. } => EventKind::ItemDeleted,
            EventData::UserCreated { .. } => EventKind::UserCreated,
            EventData::UserUpdated { .. } => EventKind::UserUpdated,
            EventData::UserDeleted { .. } => EventKind::UserDeleted,
        }
    }

    /// Id of the entity this payload refers to.
    pub fn entity_id(&self) -> &str {
        match self {
            EventData::ItemCreated { id }
            | EventData::ItemUpdated { id }
            | EventData::ItemDeleted { id }
            | EventData::UserCreated { id }
            | EventData::UserUpdated { id }
            | EventData::UserDeleted { id } => id,
        }
    }
}
