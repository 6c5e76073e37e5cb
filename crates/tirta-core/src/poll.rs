//! Poll loop driving the reconciliation pipeline.
//!
//! [`Poller`] is the explicit application context the dashboard runs on:
//! it owns the API client, the history store, the alert engine and its
//! edge-trigger state, and the event dispatcher. No component lives in a
//! global.
//!
//! Transport-agnostic by construction: [`Poller::ingest`] is the single
//! "a reading arrived" entry point. The built-in HTTP poll loop calls it,
//! and a push-style subscription would call the exact same method.
//!
//! Cancellation safety: every fetch is wrapped in `tokio::time::timeout`;
//! a timed-out or failed cycle applies no store mutation and no state
//! change; it only emits a [`DashboardEvent::FetchFailed`].

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use tirta_types::{HistoryItem, RawReading};

use crate::alerts::{AlertEngine, AlertState};
use crate::client::ApiClient;
use crate::error::Error;
use crate::events::{DashboardEvent, EventDispatcher};
use crate::history::HistoryStore;
use crate::timestamp::{normalize_epoch_ms, now_ms};

/// Timer configuration for the poll loop.
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// How often to poll the latest-reading endpoint.
    pub latest_interval: Duration,
    /// How often to re-sync from the history endpoint.
    pub history_interval: Duration,
    /// Deadline for a single fetch cycle; an overrun cycle is abandoned.
    pub fetch_timeout: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            latest_interval: Duration::from_secs(10),
            history_interval: Duration::from_secs(60),
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

/// Commands a UI can send to the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerCommand {
    /// Clear the history store (user reset / logout).
    ClearHistory,
    /// Re-sync from the history endpoint now.
    RefreshHistory,
}

/// Cloneable handle for sending [`PollerCommand`]s.
#[derive(Debug, Clone)]
pub struct PollerHandle {
    commands: mpsc::Sender<PollerCommand>,
}

impl PollerHandle {
    /// Request a history clear. Returns false if the poller is gone.
    pub async fn clear_history(&self) -> bool {
        self.commands.send(PollerCommand::ClearHistory).await.is_ok()
    }

    /// Request an immediate history re-sync.
    pub async fn refresh_history(&self) -> bool {
        self.commands
            .send(PollerCommand::RefreshHistory)
            .await
            .is_ok()
    }
}

/// The dashboard's polling controller.
pub struct Poller {
    client: ApiClient,
    store: HistoryStore,
    engine: AlertEngine,
    state: AlertState,
    dispatcher: EventDispatcher,
    options: PollOptions,
    commands: mpsc::Receiver<PollerCommand>,
    handle: PollerHandle,
}

impl Poller {
    /// Create a poller with default options and alert thresholds.
    pub fn new(client: ApiClient, store: HistoryStore, dispatcher: EventDispatcher) -> Self {
        let (tx, rx) = mpsc::channel(8);
        Self {
            client,
            store,
            engine: AlertEngine::default(),
            state: AlertState::default(),
            dispatcher,
            options: PollOptions::default(),
            commands: rx,
            handle: PollerHandle { commands: tx },
        }
    }

    /// Replace the alert engine.
    pub fn with_alert_engine(mut self, engine: AlertEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Replace the timer options.
    pub fn with_options(mut self, options: PollOptions) -> Self {
        self.options = options;
        self
    }

    /// Get a command handle for UIs.
    pub fn handle(&self) -> PollerHandle {
        self.handle.clone()
    }

    /// The underlying store (e.g. for an initial snapshot before `run`).
    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    /// Current alert state.
    pub fn alert_state(&self) -> AlertState {
        self.state
    }

    /// Drive one reading through the pipeline: normalize the timestamp,
    /// append to the store, evaluate alerts, publish events.
    ///
    /// This is the transport-agnostic entry point; polling and push
    /// subscriptions both reduce to calling it. Returns the stored item
    /// and any newly triggered alert messages.
    pub fn ingest(&mut self, raw: &RawReading, now_ms: i64) -> (HistoryItem, Vec<String>) {
        let timestamp_ms = normalize_epoch_ms(raw.timestamp, now_ms);
        let item = HistoryItem::from_raw(raw, timestamp_ms);

        self.store.append(item.clone());

        let (messages, state) = self.engine.evaluate(&item, self.state);
        self.state = state;

        self.dispatcher
            .send(DashboardEvent::Reading { item: item.clone() });
        for message in &messages {
            tracing::warn!(alert = %message, "danger threshold breached");
            self.dispatcher.send(DashboardEvent::Alert {
                message: message.clone(),
            });
        }

        (item, messages)
    }

    /// Backfill variant of [`ingest`](Self::ingest): appends without alert
    /// evaluation, so stale history cannot fire notifications.
    fn ingest_backfill(&mut self, raw: &RawReading, now_ms: i64) {
        let timestamp_ms = normalize_epoch_ms(raw.timestamp, now_ms);
        self.store.append(HistoryItem::from_raw(raw, timestamp_ms));
    }

    /// Poll the latest-reading endpoint once.
    ///
    /// A failed or timed-out fetch mutates nothing; it is surfaced as a
    /// `FetchFailed` event only.
    pub async fn poll_latest(&mut self) {
        let fetch = tokio::time::timeout(self.options.fetch_timeout, self.client.latest());
        match fetch.await {
            Ok(Ok(raw)) => {
                self.ingest(&raw, now_ms());
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "latest fetch failed");
                self.dispatcher.send(DashboardEvent::FetchFailed {
                    endpoint: "latest".to_string(),
                    error: e.to_string(),
                });
            }
            Err(_) => {
                let e = Error::timeout("latest", self.options.fetch_timeout);
                tracing::warn!(error = %e, "latest fetch timed out");
                self.dispatcher.send(DashboardEvent::FetchFailed {
                    endpoint: "latest".to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    /// Backfill the store from the history endpoint.
    ///
    /// Items are sorted by normalized timestamp and only those newer than
    /// the current tail are ingested, so a re-sync never rewinds or
    /// duplicates the stored sequence. Alerts are suppressed for backfill.
    pub async fn seed_history(&mut self) {
        let fetch = tokio::time::timeout(self.options.fetch_timeout, self.client.history());
        let list = match fetch.await {
            Ok(Ok(list)) => list,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "history fetch failed");
                self.dispatcher.send(DashboardEvent::FetchFailed {
                    endpoint: "history".to_string(),
                    error: e.to_string(),
                });
                return;
            }
            Err(_) => {
                let e = Error::timeout("history", self.options.fetch_timeout);
                tracing::warn!(error = %e, "history fetch timed out");
                self.dispatcher.send(DashboardEvent::FetchFailed {
                    endpoint: "history".to_string(),
                    error: e.to_string(),
                });
                return;
            }
        };

        let now = now_ms();
        let mut normalized: Vec<(i64, RawReading)> = list
            .into_iter()
            .map(|raw| (normalize_epoch_ms(raw.timestamp, now), raw))
            .collect();
        normalized.sort_by_key(|(ts, _)| *ts);

        let tail = self.store.last().map(|i| i.timestamp_ms);
        let mut appended = 0usize;
        for (ts, raw) in normalized {
            if tail.is_some_and(|t| ts <= t) {
                continue;
            }
            self.ingest_backfill(&raw, ts);
            appended += 1;
        }

        tracing::debug!(appended, total = self.store.len(), "history seeded");
        self.dispatcher.send(DashboardEvent::HistorySeeded {
            count: self.store.len(),
        });
    }

    /// Clear the store (user reset / logout) and announce it.
    pub fn clear_history(&mut self) {
        self.store.clear();
        self.state = AlertState::default();
        self.dispatcher.send(DashboardEvent::HistoryCleared);
    }

    /// Run the poll loop until cancelled. Consumes the poller and returns
    /// the store so callers can inspect the final state.
    pub async fn run(mut self, cancel: CancellationToken) -> HistoryStore {
        self.seed_history().await;
        self.poll_latest().await;

        let mut latest_tick = tokio::time::interval(self.options.latest_interval);
        let mut history_tick = tokio::time::interval(self.options.history_interval);
        // Both just fired above.
        latest_tick.reset();
        history_tick.reset();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("poll loop cancelled");
                    return self.store;
                }
                _ = latest_tick.tick() => {
                    self.poll_latest().await;
                }
                _ = history_tick.tick() => {
                    self.seed_history().await;
                }
                cmd = self.commands.recv() => {
                    match cmd {
                        Some(PollerCommand::ClearHistory) => self.clear_history(),
                        Some(PollerCommand::RefreshHistory) => self.seed_history().await,
                        // All handles dropped; timers keep the loop alive.
                        None => {}
                    }
                }
            }
        }
    }
}
