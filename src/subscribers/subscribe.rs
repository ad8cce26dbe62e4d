//! # Core subscriber trait.

use async_trait::async_trait;

use crate::error::SubscriberError;
use crate::events::Event;

/// Contract for event subscribers.
///
/// Called from a per-invocation worker task owned by the bus. The bus treats
/// implementations as stateless capabilities: any state a subscriber touches
/// belongs to the subscriber, not the bus.
///
/// Implementations should avoid blocking the async runtime (prefer async I/O
/// and cooperative waits). Returning an error marks this one invocation as
/// failed; it is logged and never retried, and no other invocation is
/// affected.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single event.
    async fn on_event(&self, event: &Event) -> Result<(), SubscriberError>;

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
