//! # Demo: a CRUD-style service wired to the event bus.
//!
//! Shows the intended process wiring: build the subscriber set once at
//! startup, split the bus, run the dispatch loop on its own task, inject the
//! producer handle into services, and shut down with the two-phase drain.
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example demo
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use notibus::{Bus, Event, EventData, LogWriter, Notifier, Subscribe};

/// A domain service holding the bus as an injected capability.
struct ItemService {
    bus: Arc<dyn Notifier>,
}

impl ItemService {
    fn new(bus: Arc<dyn Notifier>) -> Self {
        Self { bus }
    }

    async fn create(&self, user_id: &str, id: &str) {
        // ... store mutation commits here ...
        self.bus.notify(Event::new(user_id, EventData::ItemCreated { id: id.into() })).await;
    }

    async fn update(&self, user_id: &str, id: &str) {
        self.bus.notify(Event::new(user_id, EventData::ItemUpdated { id: id.into() })).await;
    }

    async fn delete(&self, user_id: &str, id: &str) {
        self.bus.notify(Event::new(user_id, EventData::ItemDeleted { id: id.into() })).await;
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let subscribers: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter)];
    let (bus, mut dispatcher) = Bus::new(subscribers);

    let stop = CancellationToken::new();
    let loop_handle = tokio::spawn({
        let stop = stop.clone();
        async move {
            dispatcher.listen(stop).await;
            dispatcher
        }
    });

    let items = ItemService::new(Arc::new(bus));
    items.create("user-42", "item-1").await;
    items.update("user-42", "item-1").await;
    items.delete("user-42", "item-1").await;

    // Shutdown: stop the loop first, then flush and wait, bounded by grace.
    stop.cancel();
    let dispatcher = loop_handle.await?;
    match dispatcher.close_and_drain(Duration::from_secs(15)).await {
        Ok(()) => info!("shutdown complete"),
        Err(err) => tracing::warn!(error = %err, "shutdown proceeded with lost in-flight work"),
    }

    Ok(())
}
