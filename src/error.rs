//! Error types used by the bus and its subscribers.
//!
//! Two enums, one per boundary:
//!
//! - [`BusError`] — raised by the bus runtime itself (today: the drain
//!   deadline expiring with work still in flight).
//! - [`SubscriberError`] — raised by an individual subscriber invocation;
//!   swallowed at the bus boundary after being logged, never propagated to
//!   producers.
//!
//! Both types provide `as_label`/`as_message` helpers for logs.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the bus runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BusError {
    /// The drain deadline elapsed with subscriber invocations still running.
    ///
    /// The leftover invocations are abandoned, not cancelled: shutdown
    /// proceeded with possible lost audit/side-effect work, which the
    /// orchestrator should log at elevated severity.
    #[error("drain deadline {grace:?} exceeded; {abandoned} subscriber invocation(s) abandoned")]
    DrainTimeout {
        /// The deadline that was exceeded.
        grace: Duration,
        /// Number of invocations still outstanding when the deadline fired.
        abandoned: usize,
    },
}

impl BusError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::DrainTimeout { .. } => "bus_drain_timeout",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            BusError::DrainTimeout { grace, abandoned } => {
                format!("drain incomplete after {grace:?}; abandoned={abandoned}")
            }
        }
    }
}

/// # Errors produced by a single subscriber invocation.
///
/// Delivery is at-most-once and fire-and-forget: these never reach producers
/// and are never retried. The invoking worker logs them and moves on.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SubscriberError {
    /// The subscriber's side effect failed.
    #[error("subscriber failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },
}

impl SubscriberError {
    /// Builds a [`SubscriberError::Failed`] from any displayable cause.
    pub fn failed(error: impl Into<String>) -> Self {
        SubscriberError::Failed { error: error.into() }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SubscriberError::Failed { .. } => "subscriber_failed",
        }
    }
}
