//! Dashboard event system.
//!
//! The pipeline publishes everything a renderer needs over a broadcast
//! channel: new readings, newly triggered alerts, transport failures, and
//! history lifecycle changes. Whether readings arrive by polling or by a
//! push subscription is invisible to subscribers.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use tirta_types::HistoryItem;

/// Events emitted by the pipeline.
///
/// All events are serializable for logging and IPC.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new event types
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum DashboardEvent {
    /// A new reading passed through the pipeline and was stored.
    Reading {
        /// The normalized, stored item.
        item: HistoryItem,
    },
    /// A danger threshold was newly breached.
    Alert {
        /// Human-readable alert message.
        message: String,
    },
    /// A fetch cycle failed; display as a banner, nothing was stored.
    FetchFailed {
        /// Which endpoint failed ("latest" or "history").
        endpoint: String,
        /// Error description.
        error: String,
    },
    /// The history store was backfilled from the history endpoint.
    HistorySeeded {
        /// Number of items now stored.
        count: usize,
    },
    /// The history store was cleared.
    HistoryCleared,
}

/// Sender for dashboard events.
pub type EventSender = broadcast::Sender<DashboardEvent>;

/// Receiver for dashboard events.
pub type EventReceiver = broadcast::Receiver<DashboardEvent>;

/// Event dispatcher fanning events out to any number of receivers.
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    sender: EventSender,
}

impl EventDispatcher {
    /// Create a new event dispatcher with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events.
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Send an event.
    pub fn send(&self, event: DashboardEvent) {
        // Ignore error if no receivers
        let _ = self.sender.send(event);
    }

    /// Get the number of active receivers.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new(100)
    }
}
