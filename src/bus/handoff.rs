//! # Rendezvous handoff between producers and the dispatch loop.
//!
//! A zero-capacity synchronous queue: [`Sender::send`] completes only once
//! the receiver has actually taken the item, so the producer and consumer
//! meet at a synchronization point rather than passing through a buffer.
//!
//! Tokio's mpsc channels have a minimum capacity of one, so the rendezvous is
//! built from a capacity-1 channel carrying the item together with a oneshot
//! acknowledgement: `recv` fires the ack as it takes the item, and `send`
//! waits for it.
//!
//! ## Close semantics
//! [`Receiver::close`] stops further sends without dropping items already
//! handed to the channel:
//! - a send that was already accepted into the channel completes normally
//!   once the receiver drains it;
//! - a send that had not yet been accepted resolves to [`Closed`].

use tokio::sync::{mpsc, oneshot};

/// Error returned by [`Sender::send`] once the receiving side has closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Closed;

/// Creates a linked rendezvous sender/receiver pair.
pub(crate) fn channel<T>() -> (Sender<T>, Receiver<T>) {
    let (tx, rx) = mpsc::channel(1);
    (Sender { tx }, Receiver { rx })
}

/// Producer half of the rendezvous queue. Cheap to clone.
pub(crate) struct Sender<T> {
    tx: mpsc::Sender<(T, oneshot::Sender<()>)>,
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T> Sender<T> {
    /// Hands `item` to the receiver, suspending until it has been taken.
    pub(crate) async fn send(&self, item: T) -> Result<(), Closed> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx.send((item, ack_tx)).await.map_err(|_| Closed)?;
        // The ack sender is dropped without firing only if the receiver is
        // dropped with the item still queued; a drained item always acks.
        ack_rx.await.map_err(|_| Closed)
    }
}

/// Consumer half of the rendezvous queue.
pub(crate) struct Receiver<T> {
    rx: mpsc::Receiver<(T, oneshot::Sender<()>)>,
}

impl<T> Receiver<T> {
    /// Takes the next item, releasing its producer. `None` once the queue is
    /// closed (or all senders dropped) and empty.
    pub(crate) async fn recv(&mut self) -> Option<T> {
        let (item, ack) = self.rx.recv().await?;
        let _ = ack.send(());
        Some(item)
    }

    /// Closes the queue: pending sends not yet accepted resolve to
    /// [`Closed`]; items already accepted remain receivable.
    pub(crate) fn close(&mut self) {
        self.rx.close();
    }
}
