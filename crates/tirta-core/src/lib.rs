//! Core pipeline for the tirta water-quality dashboard.
//!
//! This crate implements the client-side time-series reconciliation
//! pipeline that sits between an unreliable sensor API and a renderer:
//!
//! - **Timestamp normalization**: backend timestamps arrive in seconds,
//!   milliseconds, or not at all; [`timestamp::normalize_epoch_ms`] turns
//!   them into canonical UTC epoch-milliseconds with the local clock as the
//!   safe fallback.
//! - **History store**: a bounded, deduplicated, insertion-ordered buffer of
//!   readings, persisted wholesale to a JSON file and reloaded on startup.
//! - **Classification**: server status strings and numeric thresholds map
//!   each reading to a `(label, severity)` pair.
//! - **Alerting**: danger thresholds with edge-triggered state so a
//!   sustained breach notifies once, not on every poll.
//! - **Chart feed**: projects the history window into label/series arrays
//!   for an external chart renderer.
//! - **Poll loop**: fetches the latest/history endpoints on timers and
//!   drives every new reading through the same `ingest` entry point a push
//!   transport would use.
//!
//! # Quick start
//!
//! ```no_run
//! use tirta_core::{ApiClient, EventDispatcher, HistoryOptions, HistoryStore, Poller};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new("http://localhost:8080")?;
//!     let store = HistoryStore::open(HistoryOptions::default());
//!     let dispatcher = EventDispatcher::default();
//!
//!     let mut poller = Poller::new(client, store, dispatcher.clone());
//!     poller.seed_history().await;
//!     poller.poll_latest().await;
//!     Ok(())
//! }
//! ```

pub mod alerts;
pub mod chart;
pub mod classify;
pub mod client;
pub mod error;
pub mod events;
pub mod history;
pub mod poll;
pub mod timestamp;

pub use alerts::{AlertEngine, AlertKind, AlertState, AlertThresholds};
pub use chart::{ChartFeed, ChartSeries};
pub use classify::{Classification, Classifier, ClassifierConfig, ItemStatus};
pub use client::ApiClient;
pub use error::{Error, Result};
pub use events::{DashboardEvent, EventDispatcher, EventReceiver, EventSender};
pub use history::{HistoryOptions, HistoryStore};
pub use poll::{PollOptions, Poller, PollerCommand, PollerHandle};
pub use timestamp::{normalize_epoch_ms, now_ms};

// Re-export the shared data model.
pub use tirta_types::{HistoryItem, RawReading, SensorKind, Severity};
