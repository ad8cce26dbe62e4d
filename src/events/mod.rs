//! # Domain mutation events.
//!
//! An [`Event`] is the immutable record of a completed state change: which
//! kind of mutation, which principal performed it, which entity it touched,
//! and when. The typed payload ([`EventData`]) is the source of truth — the
//! event's `kind` and `entity_id` are derived from it at construction and
//! can never diverge.

mod data;
mod event;

pub use data::{EventData, EventKind};
pub use event::Event;
