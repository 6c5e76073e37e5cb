//! Bounded, persisted history of sensor readings.
//!
//! The store is the only owner of [`HistoryItem`]s: append is the sole
//! mutator and always happens at the tail, so `window()` is guaranteed to
//! return items in non-decreasing timestamp order. Capacity eviction is
//! FIFO by position, not by timestamp comparison.
//!
//! Persistence is a single JSON file rewritten wholesale after every
//! mutation. Load failures (absent file, corrupt JSON) yield an empty store
//! with a warning, never an error to the caller.
//!
//! Deduplication policy: an incoming item less than `dedup_window_ms` newer
//! than the last stored item overwrites the last item in place. This keeps
//! the displayed values freshest while holding the minimum spacing between
//! chart points.

use std::fs;
use std::path::PathBuf;

use tirta_types::HistoryItem;

/// Configuration for a [`HistoryStore`].
#[derive(Debug, Clone)]
pub struct HistoryOptions {
    /// Maximum number of items retained. Oldest items are evicted first.
    pub capacity: usize,
    /// Minimum spacing between stored items in milliseconds; closer
    /// arrivals overwrite the tail item instead of appending.
    pub dedup_window_ms: i64,
    /// Persistence file. `None` keeps the store purely in memory.
    pub path: Option<PathBuf>,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            capacity: 30,
            dedup_window_ms: 5_000,
            path: None,
        }
    }
}

impl HistoryOptions {
    /// Set the persistence file path.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the retention capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Set the dedup window in milliseconds.
    pub fn with_dedup_window_ms(mut self, window_ms: i64) -> Self {
        self.dedup_window_ms = window_ms.max(0);
        self
    }
}

/// Bounded, ordered, deduplicated reading history.
#[derive(Debug)]
pub struct HistoryStore {
    items: Vec<HistoryItem>,
    options: HistoryOptions,
}

impl HistoryStore {
    /// Open a store, loading any persisted items.
    ///
    /// A missing or corrupt persistence file results in an empty store;
    /// the failure is logged, not surfaced.
    pub fn open(options: HistoryOptions) -> Self {
        let mut store = Self {
            items: Vec::new(),
            options,
        };
        store.load();
        store
    }

    fn load(&mut self) {
        let Some(path) = self.options.path.clone() else {
            return;
        };
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read history file");
                return;
            }
        };
        match serde_json::from_str::<Vec<HistoryItem>>(&content) {
            Ok(items) => {
                self.items = items;
                // Enforce capacity in case the file was written with a
                // larger configured capacity.
                let excess = self.items.len().saturating_sub(self.options.capacity);
                if excess > 0 {
                    self.items.drain(..excess);
                }
                tracing::debug!(count = self.items.len(), "loaded history");
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt history file, starting empty");
            }
        }
    }

    fn persist(&self) {
        let Some(path) = &self.options.path else {
            return;
        };
        if let Some(parent) = path.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            tracing::warn!(path = %parent.display(), error = %e, "failed to create history directory");
            return;
        }
        let json = match serde_json::to_string(&self.items) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize history");
                return;
            }
        };
        if let Err(e) = fs::write(path, json) {
            tracing::warn!(path = %path.display(), error = %e, "failed to write history file");
        }
    }

    /// Append a reading at the tail, applying dedup and capacity eviction,
    /// then persist the full sequence.
    pub fn append(&mut self, item: HistoryItem) {
        match self.items.last_mut() {
            Some(last) if item.timestamp_ms - last.timestamp_ms < self.options.dedup_window_ms => {
                // Within the dedup window (or clock-skewed backwards):
                // overwrite the tail, keeping timestamps non-decreasing.
                let timestamp_ms = item.timestamp_ms.max(last.timestamp_ms);
                *last = HistoryItem {
                    timestamp_ms,
                    ..item
                };
            }
            _ => {
                self.items.push(item);
                let excess = self.items.len().saturating_sub(self.options.capacity);
                if excess > 0 {
                    self.items.drain(..excess);
                }
            }
        }
        self.persist();
    }

    /// The most recent `max_count` items, oldest first.
    pub fn window(&self, max_count: usize) -> &[HistoryItem] {
        let start = self.items.len().saturating_sub(max_count);
        &self.items[start..]
    }

    /// All stored items, oldest first.
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    /// The most recent item, if any.
    pub fn last(&self) -> Option<&HistoryItem> {
        self.items.last()
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Empty the store and persist the empty state.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// The configured options.
    pub fn options(&self) -> &HistoryOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(ts_ms: i64, temperature: f64) -> HistoryItem {
        HistoryItem {
            timestamp_ms: ts_ms,
            temperature,
            level_percent: 50.0,
            ntu: 100.0,
            level_status: String::new(),
            turb_status: String::new(),
        }
    }

    fn memory_store(capacity: usize) -> HistoryStore {
        HistoryStore::open(HistoryOptions {
            capacity,
            dedup_window_ms: 5_000,
            path: None,
        })
    }

    #[test]
    fn test_append_and_window() {
        let mut store = memory_store(10);
        for i in 0..3 {
            store.append(item(1_700_000_000_000 + i * 10_000, 25.0 + i as f64));
        }
        assert_eq!(store.len(), 3);
        let window = store.window(2);
        assert_eq!(window.len(), 2);
        assert!((window[0].temperature - 26.0).abs() < f64::EPSILON);
        assert!((window[1].temperature - 27.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_capacity_evicts_oldest_first() {
        let mut store = memory_store(5);
        for i in 0..12 {
            store.append(item(1_700_000_000_000 + i * 10_000, i as f64));
        }
        assert_eq!(store.len(), 5);
        // Survivors are exactly the last five appended.
        let temps: Vec<f64> = store.items().iter().map(|i| i.temperature).collect();
        assert_eq!(temps, vec![7.0, 8.0, 9.0, 10.0, 11.0]);
    }

    #[test]
    fn test_window_larger_than_store() {
        let mut store = memory_store(10);
        store.append(item(1_700_000_000_000, 25.0));
        assert_eq!(store.window(100).len(), 1);
    }

    #[test]
    fn test_dedup_overwrites_tail() {
        let mut store = memory_store(10);
        store.append(item(1_700_000_000_000, 25.0));
        // Two seconds later: inside the 5 s window, overwrites in place.
        store.append(item(1_700_000_002_000, 26.0));
        assert_eq!(store.len(), 1);
        assert!((store.last().unwrap().temperature - 26.0).abs() < f64::EPSILON);
        assert_eq!(store.last().unwrap().timestamp_ms, 1_700_000_002_000);

        // Past the window: appends.
        store.append(item(1_700_000_008_000, 27.0));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_dedup_keeps_timestamps_monotonic() {
        let mut store = memory_store(10);
        store.append(item(1_700_000_010_000, 25.0));
        // Skewed clock: an *older* timestamp arrives. It overwrites the
        // tail but must not move the timeline backwards.
        store.append(item(1_700_000_009_000, 26.0));
        assert_eq!(store.len(), 1);
        assert_eq!(store.last().unwrap().timestamp_ms, 1_700_000_010_000);
        assert!((store.last().unwrap().temperature - 26.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_window_order_non_decreasing() {
        let mut store = memory_store(30);
        for i in 0..20 {
            store.append(item(1_700_000_000_000 + i * 7_000, i as f64));
        }
        let window = store.window(30);
        for pair in window.windows(2) {
            assert!(pair[0].timestamp_ms <= pair[1].timestamp_ms);
        }
    }

    #[test]
    fn test_persistence_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let options = HistoryOptions::default().with_path(&path);

        let mut store = HistoryStore::open(options.clone());
        store.append(item(1_700_000_000_000, 25.0));
        store.append(item(1_700_000_010_000, 26.0));

        let reloaded = HistoryStore::open(options);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.items(), store.items());
    }

    #[test]
    fn test_corrupt_file_yields_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "{not json!").unwrap();

        let store = HistoryStore::open(HistoryOptions::default().with_path(&path));
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_file_yields_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(
            HistoryOptions::default().with_path(dir.path().join("does-not-exist.json")),
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_persists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let options = HistoryOptions::default().with_path(&path);

        let mut store = HistoryStore::open(options.clone());
        store.append(item(1_700_000_000_000, 25.0));
        store.clear();
        assert!(store.is_empty());

        let reloaded = HistoryStore::open(options);
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_load_enforces_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut big = HistoryStore::open(
            HistoryOptions::default()
                .with_capacity(50)
                .with_path(&path),
        );
        for i in 0..40 {
            big.append(item(1_700_000_000_000 + i * 10_000, i as f64));
        }

        // Reopen with a smaller capacity: only the newest survive.
        let small = HistoryStore::open(
            HistoryOptions::default()
                .with_capacity(10)
                .with_path(&path),
        );
        assert_eq!(small.len(), 10);
        assert!((small.items()[0].temperature - 30.0).abs() < f64::EPSILON);
    }
}
