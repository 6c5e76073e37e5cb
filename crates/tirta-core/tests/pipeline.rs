//! End-to-end pipeline tests: raw JSON in, stored items, classification,
//! alerts, and chart projection out.

use tempfile::TempDir;
use time::UtcOffset;

use tirta_core::{
    AlertEngine, AlertState, ChartFeed, Classifier, HistoryOptions, HistoryStore, Severity,
    normalize_epoch_ms,
};
use tirta_types::{HistoryItem, RawReading, SensorKind};

const NOW_MS: i64 = 1_800_000_000_000;

fn ingest(store: &mut HistoryStore, json: &str, now_ms: i64) -> HistoryItem {
    let raw: RawReading = serde_json::from_str(json).expect("valid reading JSON");
    let ts = normalize_epoch_ms(raw.timestamp, now_ms);
    let item = HistoryItem::from_raw(&raw, ts);
    store.append(item.clone());
    item
}

#[test]
fn healthy_reading_flows_through_the_whole_pipeline() {
    let mut store = HistoryStore::open(HistoryOptions::default());
    let item = ingest(
        &mut store,
        r#"{"temperature": "26.5", "levelPercent": 45, "ntu": 150, "timestamp": 1700000000}"#,
        NOW_MS,
    );

    // Seconds-scale timestamp promoted to milliseconds.
    assert_eq!(item.timestamp_ms, 1_700_000_000_000);
    assert_eq!(store.len(), 1);

    // All three dimensions classify as Good with Indonesian labels.
    let classifier = Classifier::default();
    let status = classifier.classify_item(&item);
    assert_eq!(status.temperature.severity, Severity::Good);
    assert_eq!(status.temperature.label, "Ideal");
    assert_eq!(status.level.severity, Severity::Good);
    assert_eq!(status.level.label, "Stabil");
    assert_eq!(status.turbidity.severity, Severity::Good);
    assert_eq!(status.turbidity.label, "Jernih");

    // No danger thresholds crossed.
    let engine = AlertEngine::default();
    let (messages, state) = engine.evaluate(&item, AlertState::default());
    assert!(messages.is_empty());
    assert!(!state.any_active());

    // Chart projection carries the reading with an HH:MM:SS label.
    let feed = ChartFeed::new(UtcOffset::UTC);
    let series = feed.project_at(store.window(30), NOW_MS);
    assert_eq!(series.labels, vec!["22:13:20"]);
    assert_eq!(series.temperature, vec![26.5]);
    assert_eq!(series.level, vec![45.0]);
    assert_eq!(series.ntu, vec![150.0]);
}

#[test]
fn server_status_overrides_numeric_classification() {
    let mut store = HistoryStore::open(HistoryOptions::default());
    let item = ingest(
        &mut store,
        r#"{"temperature": 27, "levelPercent": 45, "ntu": 150,
            "levelStatus": "KOSONG", "turbStatus": "Agak KERUH"}"#,
        NOW_MS,
    );

    let classifier = Classifier::default();
    let status = classifier.classify_item(&item);
    // Numerically Good, but the server strings win.
    assert_eq!(status.level.severity, Severity::Danger);
    assert_eq!(status.level.label, "KOSONG");
    assert_eq!(status.turbidity.severity, Severity::Warning);
    assert_eq!(status.turbidity.label, "Agak KERUH");
}

#[test]
fn dangerous_burst_alerts_once_per_edge() {
    let mut store = HistoryStore::open(HistoryOptions::default());
    let engine = AlertEngine::default();
    let mut state = AlertState::default();
    let mut alert_counts = Vec::new();

    let temps = [60.0, 60.0, 60.0, 20.0, 60.0];
    for (i, temp) in temps.iter().enumerate() {
        let json = format!(
            r#"{{"temperature": {temp}, "levelPercent": 45, "ntu": 150, "timestamp": {}}}"#,
            1_700_000_000 + i as i64 * 10
        );
        let item = ingest(&mut store, &json, NOW_MS);
        let (messages, next) = engine.evaluate(&item, state);
        state = next;
        alert_counts.push(messages.len());
    }

    assert_eq!(alert_counts, vec![1, 0, 0, 0, 1]);
    assert_eq!(store.len(), temps.len());
}

#[test]
fn store_survives_a_restart() {
    let dir = TempDir::new().unwrap();
    let options = HistoryOptions::default().with_path(dir.path().join("history.json"));

    {
        let mut store = HistoryStore::open(options.clone());
        ingest(
            &mut store,
            r#"{"temperature": 26.5, "levelPercent": 45, "ntu": 150, "timestamp": 1700000000}"#,
            NOW_MS,
        );
        ingest(
            &mut store,
            r#"{"temperature": 27.0, "levelPercent": 46, "ntu": 160, "timestamp": 1700000060}"#,
            NOW_MS,
        );
        // Every append persists; nothing explicit to flush.
    }

    let reopened = HistoryStore::open(options);
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.last().unwrap().timestamp_ms, 1_700_000_060_000);
    assert!((reopened.items()[0].temperature - 26.5).abs() < f64::EPSILON);
}

#[test]
fn garbage_payload_degrades_to_zeroes_not_errors() {
    let mut store = HistoryStore::open(HistoryOptions::default());
    let item = ingest(
        &mut store,
        r#"{"temperature": "n/a", "levelPercent": null, "ntu": {}, "timestamp": "soon"}"#,
        NOW_MS,
    );

    assert_eq!(item.temperature, 0.0);
    assert_eq!(item.level_percent, 0.0);
    assert_eq!(item.ntu, 0.0);
    // Unparseable timestamp falls back to the local clock.
    assert_eq!(item.timestamp_ms, NOW_MS);

    // Zeroes still classify (cold, empty-ish, clear) rather than panic.
    let status = Classifier::default().classify_item(&item);
    assert_eq!(status.temperature.label, "Terlalu Dingin");
    assert_eq!(status.turbidity.severity, Severity::Good);
    assert_eq!(item.value(SensorKind::Turbidity), 0.0);
}

#[test]
fn empty_store_still_produces_a_drawable_chart() {
    let store = HistoryStore::open(HistoryOptions::default());
    let feed = ChartFeed::new(UtcOffset::UTC);
    let series = feed.project_at(store.window(30), NOW_MS);
    assert_eq!(series.len(), 1);
    assert_eq!(series.temperature, vec![0.0]);
}
