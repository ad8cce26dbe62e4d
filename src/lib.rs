//! # notibus
//!
//! **notibus** is a small in-process event notification bus for services that
//! want to decouple domain mutations (user/item created, updated, deleted)
//! from their side-effecting consumers (audit logging, cache invalidation,
//! future subscribers).
//!
//! ## Architecture
//! ```text
//! Producers (many):                          Dispatcher (one):
//!   item service ──┐
//!   user service ──┼── notify(Event) ──► [rendezvous queue] ──► listen loop
//!   admin flows  ──┘   (suspends until                              │ fan-out
//!                       the loop takes it)           ┌──────────────┼──────────────┐
//!                                                    ▼              ▼              ▼
//!                                               task (sub 1)   task (sub 2)   task (sub N)
//!                                                    │              │              │
//!                                              sub1.on_event  sub2.on_event  subN.on_event
//!                                                    │              │              │
//!                                                    └──────── TaskTracker ───────┘
//!                                                          (in-flight accounting)
//! ```
//!
//! ### Queueing discipline
//! Submission is a **rendezvous**: [`Bus::notify`] does not return until the
//! dispatch loop has taken ownership of the event. A slow loop therefore
//! throttles producers naturally; there is no hidden buffer to overflow.
//! Events are dequeued in submission order (single consumer), but delivery to
//! the N subscribers is concurrent and unordered, both within one event and
//! across events.
//!
//! ### Shutdown
//! ```text
//! stop.cancel() ──► listen loop exits (no draining here)
//!                        │
//! close_and_drain(grace) ┤ phase 1: close the queue
//!                        │   - a producer already mid-handoff completes it
//!                        │   - any later notify() panics ("closed")
//!                        ┤ phase 2: dispatch what was still queued, then
//!                        │   wait for all in-flight subscriber tasks,
//!                        │   bounded by `grace`
//!                        ▼
//!              Ok(()) ── all work finished
//!              Err(BusError::DrainTimeout) ── deadline hit, leftovers abandoned
//! ```
//!
//! Subscriber failures and panics are logged by the invoking worker and never
//! reach producers: delivery is deliberately at-most-once, fire-and-forget.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use notibus::{Bus, Event, EventData, LogWriter, Subscribe};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter)];
//!     let (bus, mut dispatcher) = Bus::new(subs);
//!
//!     let stop = CancellationToken::new();
//!     let loop_handle = tokio::spawn({
//!         let stop = stop.clone();
//!         async move {
//!             dispatcher.listen(stop).await;
//!             dispatcher
//!         }
//!     });
//!
//!     bus.notify(Event::new("user-1", EventData::ItemCreated { id: "item-9".into() })).await;
//!
//!     stop.cancel();
//!     let dispatcher = loop_handle.await?;
//!     dispatcher.close_and_drain(Duration::from_secs(15)).await?;
//!     Ok(())
//! }
//! ```

mod bus;
mod error;
mod events;
mod subscribers;

// ---- Public re-exports ----

pub use bus::{Bus, Dispatcher, FakeBus, Notifier, NullBus};
pub use error::{BusError, SubscriberError};
pub use events::{Event, EventData, EventKind};
pub use subscribers::{LogWriter, Subscribe};
