//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait — the extension point for
//! consumers of domain mutation events — and [`LogWriter`], a built-in
//! audit-logging subscriber.
//!
//! ## Contract
//! - A subscriber is invoked **once per delivered event**, on its own spawned
//!   task; slow subscribers never block the dispatch loop, other subscribers,
//!   or producers.
//! - Failures are returned, logged by the invoking worker, and never retried.
//! - Implementations must tolerate being invoked concurrently with
//!   themselves (for different events) and with other subscribers.
//!
//! ## Implementing a subscriber
//! ```rust
//! use notibus::{Event, Subscribe, SubscriberError};
//! use async_trait::async_trait;
//!
//! struct CacheInvalidator;
//!
//! #[async_trait]
//! impl Subscribe for CacheInvalidator {
//!     async fn on_event(&self, event: &Event) -> Result<(), SubscriberError> {
//!         // evict event.entity_id from the cache...
//!         Ok(())
//!     }
//!     fn name(&self) -> &'static str { "cache_invalidator" }
//! }
//! ```

mod log;
mod subscribe;

pub use log::LogWriter;
pub use subscribe::Subscribe;
