//! # The event bus: rendezvous submission, fan-out dispatch, bounded drain.
//!
//! Construction splits the bus into two halves:
//! - [`Bus`] — the cloneable producer handle, injected into domain services
//!   (usually behind the [`Notifier`] capability trait);
//! - [`Dispatcher`] — the single consumer, owning the subscriber set and the
//!   in-flight accounting. [`Dispatcher::close_and_drain`] consumes it, which
//!   makes the single-shot shutdown contract a compile-time property.
//!
//! [`FakeBus`] and [`NullBus`] are test collaborators for callers that do not
//! need delivery.

mod core;
mod fake;
mod handoff;

pub use core::{Bus, Dispatcher};
pub use fake::{FakeBus, Notifier, NullBus};
