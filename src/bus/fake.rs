//! # Producer-side capability trait and delivery-free substitutes.
//!
//! Domain services depend on [`Notifier`] rather than on the concrete
//! [`Bus`], so the process-wide bus is threaded through service constructors
//! explicitly (no ambient global). Tests swap in [`FakeBus`] to assert on
//! submissions, or [`NullBus`] when delivery is irrelevant.

use std::sync::Mutex;

use async_trait::async_trait;

use super::Bus;
use crate::events::Event;

/// Capability to submit a domain mutation event.
///
/// The only promise made to callers is acceptance: once `notify` returns the
/// event has been handed to the dispatcher (or recorded, for fakes). Whether
/// every subscriber processed it is deliberately not observable.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: Event);
}

#[async_trait]
impl Notifier for Bus {
    async fn notify(&self, event: Event) {
        Bus::notify(self, event).await;
    }
}

/// Record-only bus substitute for tests.
///
/// Accepts every event immediately and keeps it for inspection; nothing is
/// ever delivered.
#[derive(Default)]
pub struct FakeBus {
    messages: Mutex<Vec<Event>>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything submitted so far, in submission order.
    pub fn recorded(&self) -> Vec<Event> {
        self.messages.lock().expect("fake bus lock poisoned").clone()
    }
}

#[async_trait]
impl Notifier for FakeBus {
    async fn notify(&self, event: Event) {
        self.messages.lock().expect("fake bus lock poisoned").push(event);
    }
}

/// Bus substitute that drops every event.
#[derive(Default, Clone, Copy)]
pub struct NullBus;

#[async_trait]
impl Notifier for NullBus {
    async fn notify(&self, _event: Event) {}
}
