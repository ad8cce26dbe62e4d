//! # Bus producer handle and dispatch loop.
//!
//! ## Rules
//! - **Rendezvous submission**: [`Bus::notify`] suspends the producer until
//!   the dispatch loop has taken the event. Backpressure is the queue.
//! - **FIFO dequeue**: a single consumer dequeues events in submission order
//!   across all producers.
//! - **Unordered fan-out**: one task is spawned per subscriber per event;
//!   completions have no ordering, within an event or across events.
//! - **Fire-and-forget**: subscriber errors and panics are logged by the
//!   invoking worker and never reach producers. At-most-once, no retries.
//! - **Single-shot shutdown**: [`Dispatcher::close_and_drain`] takes the
//!   dispatcher by value; there is no second drain.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{info, warn};

use super::handoff;
use crate::error::BusError;
use crate::events::Event;
use crate::subscribers::Subscribe;

/// Cloneable producer handle for the event bus.
///
/// Domain services hold one of these (or the [`Notifier`](super::Notifier)
/// capability trait) and call [`notify`](Bus::notify) after each committed
/// mutation.
#[derive(Clone)]
pub struct Bus {
    tx: handoff::Sender<Event>,
}

/// Single consumer of the bus: dequeues events, fans them out, and performs
/// the two-phase graceful drain.
pub struct Dispatcher {
    rx: handoff::Receiver<Event>,
    subscribers: Arc<[Arc<dyn Subscribe>]>,
    in_flight: TaskTracker,
}

impl Bus {
    /// Creates a bus with a fixed subscriber set.
    ///
    /// The subscriber set is immutable for the bus's lifetime: there is no
    /// registration or deregistration while running, which keeps the fan-out
    /// path lock-free.
    ///
    /// Returns the producer handle and the dispatcher half; run
    /// [`Dispatcher::listen`] on a dedicated task for the process lifetime.
    pub fn new(subscribers: Vec<Arc<dyn Subscribe>>) -> (Bus, Dispatcher) {
        let (tx, rx) = handoff::channel();
        let dispatcher = Dispatcher {
            rx,
            subscribers: subscribers.into(),
            in_flight: TaskTracker::new(),
        };
        (Bus { tx }, dispatcher)
    }

    /// Submits an event, suspending the caller until the dispatch loop (or
    /// the drain phase) has taken ownership of it.
    ///
    /// Cannot fail while the bus is open; producers only learn that the event
    /// was accepted, never whether every subscriber processed it.
    ///
    /// # Panics
    /// Panics if called after [`Dispatcher::close_and_drain`] has closed the
    /// queue (or the dispatcher was dropped). Submitting to a closed bus is a
    /// wiring bug, and failing loudly beats silently dropping the event.
    pub async fn notify(&self, event: Event) {
        let kind = event.kind;
        if self.tx.send(event).await.is_err() {
            panic!(
                "Bus::notify({}) after close: the event bus no longer accepts events",
                kind.as_label()
            );
        }
    }
}

impl Dispatcher {
    /// Runs the dispatch loop until `stop` is cancelled.
    ///
    /// On each dequeued event, spawns one tracked task per subscriber and
    /// immediately returns to the queue. On cancellation the loop exits
    /// right away without draining — flushing leftovers is
    /// [`close_and_drain`](Dispatcher::close_and_drain)'s job.
    ///
    /// Also exits if every [`Bus`] handle has been dropped.
    pub async fn listen(&mut self, stop: CancellationToken) {
        loop {
            let event = tokio::select! {
                _ = stop.cancelled() => return,
                ev = self.rx.recv() => match ev {
                    Some(ev) => ev,
                    None => return,
                },
            };
            self.fan_out(event);
        }
    }

    /// Closes the queue and drains outstanding work, bounded by `grace`.
    ///
    /// Two phases, run exactly once (enforced by taking `self`):
    /// 1. **Close** — no further submissions are accepted. A producer whose
    ///    `notify` was already accepted into the queue completes its handoff
    ///    below; any later `notify` panics.
    /// 2. **Drain** — dequeue and dispatch whatever is still queued (same
    ///    fan-out as the live loop), then wait for all in-flight subscriber
    ///    tasks, up to `grace`.
    ///
    /// On deadline expiry the remaining invocations are abandoned, not
    /// cancelled: they keep running on the runtime, but shutdown stops
    /// waiting for them. Returns [`BusError::DrainTimeout`] in that case so
    /// the orchestrator can log the partial completion at elevated severity.
    pub async fn close_and_drain(mut self, grace: Duration) -> Result<(), BusError> {
        self.rx.close();
        info!("event bus queue closed");

        while let Some(event) = self.rx.recv().await {
            self.fan_out(event);
        }

        self.in_flight.close();
        match tokio::time::timeout(grace, self.in_flight.wait()).await {
            Ok(()) => {
                info!("event bus drained");
                Ok(())
            }
            Err(_) => {
                let abandoned = self.in_flight.len();
                warn!(
                    grace_ms = grace.as_millis() as u64,
                    abandoned, "drain deadline exceeded; abandoning in-flight subscriber work"
                );
                Err(BusError::DrainTimeout { grace, abandoned })
            }
        }
    }

    /// Spawns one tracked invocation per subscriber for `event`.
    ///
    /// Each worker logs its subscriber's failure or panic and completes
    /// regardless, so one bad subscriber never affects the others.
    fn fan_out(&self, event: Event) {
        let event = Arc::new(event);
        for sub in self.subscribers.iter() {
            let sub = Arc::clone(sub);
            let event = Arc::clone(&event);
            self.in_flight.spawn(async move {
                let fut = sub.on_event(&event);
                match AssertUnwindSafe(fut).catch_unwind().await {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => {
                        warn!(
                            subscriber = sub.name(),
                            event = event.kind.as_label(),
                            entity_id = %event.entity_id,
                            error = %err,
                            "subscriber failed"
                        );
                    }
                    Err(panic_err) => {
                        let info = if let Some(msg) = panic_err.downcast_ref::<&'static str>() {
                            (*msg).to_string()
                        } else if let Some(msg) = panic_err.downcast_ref::<String>() {
                            msg.clone()
                        } else {
                            "unknown panic".to_string()
                        };
                        warn!(
                            subscriber = sub.name(),
                            event = event.kind.as_label(),
                            panic = %info,
                            "subscriber panicked"
                        );
                    }
                }
            });
        }
    }
}
