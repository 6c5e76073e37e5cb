//! Application state for the dashboard TUI.

use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyModifiers};

use tirta_core::{ChartFeed, Classifier, DashboardEvent, HistoryOptions};
use tirta_types::HistoryItem;

/// How many alert messages the banner keeps.
const ALERT_RING: usize = 3;

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Quit,
    RefreshHistory,
    ClearHistory,
}

/// View model mirrored from pipeline events.
pub struct App {
    items: Vec<HistoryItem>,
    capacity: usize,
    dedup_window_ms: i64,
    alerts: VecDeque<String>,
    fetch_error: Option<String>,
    pub classifier: Classifier,
    pub feed: ChartFeed,
}

impl App {
    /// Create an app mirroring a store with the given options, starting
    /// from a snapshot of its current items.
    pub fn new(snapshot: &[HistoryItem], options: &HistoryOptions) -> Self {
        Self {
            items: snapshot.to_vec(),
            capacity: options.capacity,
            dedup_window_ms: options.dedup_window_ms,
            alerts: VecDeque::new(),
            fetch_error: None,
            classifier: Classifier::default(),
            feed: ChartFeed::local(),
        }
    }

    /// The mirrored reading window, oldest first.
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    /// The newest reading, if any.
    pub fn latest(&self) -> Option<&HistoryItem> {
        self.items.last()
    }

    /// Recent alert messages, newest last.
    pub fn alerts(&self) -> impl Iterator<Item = &str> {
        self.alerts.iter().map(String::as_str)
    }

    /// The last fetch error, cleared by the next successful reading.
    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    /// Apply one pipeline event, using the same dedup rule as the store so
    /// the mirror never drifts from it.
    pub fn on_event(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::Reading { item } => {
                self.fetch_error = None;
                match self.items.last_mut() {
                    Some(last) if item.timestamp_ms - last.timestamp_ms < self.dedup_window_ms => {
                        let timestamp_ms = item.timestamp_ms.max(last.timestamp_ms);
                        *last = HistoryItem {
                            timestamp_ms,
                            ..item
                        };
                    }
                    _ => {
                        self.items.push(item);
                        let excess = self.items.len().saturating_sub(self.capacity);
                        if excess > 0 {
                            self.items.drain(..excess);
                        }
                    }
                }
            }
            DashboardEvent::Alert { message } => {
                self.alerts.push_back(message);
                while self.alerts.len() > ALERT_RING {
                    self.alerts.pop_front();
                }
            }
            DashboardEvent::FetchFailed { endpoint, error } => {
                self.fetch_error = Some(format!("{}: {}", endpoint, error));
            }
            DashboardEvent::HistoryCleared => {
                self.items.clear();
                self.alerts.clear();
            }
            _ => {}
        }
    }

    /// Map a key press to an action.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
            KeyCode::Char('r') => KeyAction::RefreshHistory,
            KeyCode::Char('c') => KeyAction::ClearHistory,
            _ => KeyAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(ts_ms: i64, temperature: f64) -> HistoryItem {
        HistoryItem {
            timestamp_ms: ts_ms,
            temperature,
            level_percent: 45.0,
            ntu: 150.0,
            level_status: String::new(),
            turb_status: String::new(),
        }
    }

    fn app() -> App {
        App::new(&[], &HistoryOptions::default())
    }

    #[test]
    fn test_reading_events_accumulate() {
        let mut app = app();
        for i in 0..3 {
            app.on_event(DashboardEvent::Reading {
                item: item(1_700_000_000_000 + i * 10_000, 25.0 + i as f64),
            });
        }
        assert_eq!(app.items().len(), 3);
        assert!((app.latest().unwrap().temperature - 27.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mirror_applies_dedup() {
        let mut app = app();
        app.on_event(DashboardEvent::Reading {
            item: item(1_700_000_000_000, 25.0),
        });
        app.on_event(DashboardEvent::Reading {
            item: item(1_700_000_002_000, 26.0),
        });
        assert_eq!(app.items().len(), 1);
        assert!((app.latest().unwrap().temperature - 26.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_alert_ring_is_bounded() {
        let mut app = app();
        for i in 0..5 {
            app.on_event(DashboardEvent::Alert {
                message: format!("alert {}", i),
            });
        }
        let alerts: Vec<&str> = app.alerts().collect();
        assert_eq!(alerts, vec!["alert 2", "alert 3", "alert 4"]);
    }

    #[test]
    fn test_fetch_error_cleared_by_next_reading() {
        let mut app = app();
        app.on_event(DashboardEvent::FetchFailed {
            endpoint: "latest".to_string(),
            error: "timed out".to_string(),
        });
        assert!(app.fetch_error().is_some());

        app.on_event(DashboardEvent::Reading {
            item: item(1_700_000_000_000, 25.0),
        });
        assert!(app.fetch_error().is_none());
    }

    #[test]
    fn test_clear_event_empties_mirror() {
        let mut app = app();
        app.on_event(DashboardEvent::Reading {
            item: item(1_700_000_000_000, 25.0),
        });
        app.on_event(DashboardEvent::HistoryCleared);
        assert!(app.items().is_empty());
    }

    #[test]
    fn test_key_mapping() {
        let mut app = app();
        assert_eq!(
            app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE),
            KeyAction::Quit
        );
        assert_eq!(
            app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            KeyAction::Quit
        );
        assert_eq!(
            app.handle_key(KeyCode::Char('c'), KeyModifiers::NONE),
            KeyAction::ClearHistory
        );
        assert_eq!(
            app.handle_key(KeyCode::Char('r'), KeyModifiers::NONE),
            KeyAction::RefreshHistory
        );
        assert_eq!(
            app.handle_key(KeyCode::Up, KeyModifiers::NONE),
            KeyAction::None
        );
    }
}
