//! # Audit-logging subscriber.
//!
//! [`LogWriter`] emits one structured log line per delivered event, including
//! the event's JSON rendering, which is the shape an external audit store
//! ingests. Wire a custom [`Subscribe`] implementation instead when the
//! audit record needs to go anywhere other than the process log.
//!
//! ## Output (fields)
//! ```text
//! INFO event received: event=item_created user_id=u-1 entity_id=i-9 payload={...}
//! ```

use async_trait::async_trait;
use tracing::info;

use crate::error::SubscriberError;
use crate::events::Event;
use crate::subscribers::Subscribe;

/// Structured-log audit subscriber.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, event: &Event) -> Result<(), SubscriberError> {
        let payload = event
            .to_json()
            .map_err(|e| SubscriberError::failed(format!("serialize event: {e}")))?;

        info!(
            event = event.kind.as_label(),
            user_id = %event.user_id,
            entity_id = %event.entity_id,
            timestamp = event.timestamp,
            payload = %payload,
            "event received"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
