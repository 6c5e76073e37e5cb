//! Watch command implementation.
//!
//! Polls the sensor API on an interval and prints one classified line per
//! reading. Readings flow through the same pipeline the dashboard uses, so
//! the local history file stays in sync while watching.

use std::time::Duration;

use anyhow::Result;

use tirta_core::{
    AlertEngine, ApiClient, ChartFeed, Classifier, DashboardEvent, EventDispatcher, HistoryStore,
    PollOptions, Poller,
};
use tirta_types::HistoryItem;

use crate::config::Config;
use crate::style;

/// Arguments for the watch command.
pub struct WatchArgs {
    pub interval: u64,
    pub count: u32,
    pub no_color: bool,
    pub quiet: bool,
}

pub async fn cmd_watch(config: &Config, args: WatchArgs) -> Result<()> {
    let WatchArgs {
        interval,
        count,
        no_color,
        quiet,
    } = args;

    let client = ApiClient::new(&config.api_url)?;
    let store = HistoryStore::open(config.history_options());
    let dispatcher = EventDispatcher::default();
    let mut rx = dispatcher.subscribe();

    let mut poller = Poller::new(client, store, dispatcher)
        .with_alert_engine(AlertEngine::new(config.alert_thresholds()))
        .with_options(PollOptions {
            latest_interval: Duration::from_secs(interval),
            ..PollOptions::default()
        });

    if !quiet {
        eprintln!("Watching: {}", config.api_url);
        if count > 0 {
            eprintln!(
                "Interval: {}s | Count: {} | Press Ctrl+C to stop",
                interval, count
            );
        } else {
            eprintln!("Interval: {}s | Press Ctrl+C to stop", interval);
        }
        eprintln!("{}", "-".repeat(60));
    }

    let classifier = Classifier::default();
    let feed = ChartFeed::local();
    let mut readings_taken: u32 = 0;

    // Backfill first so trends have something to compare against.
    poller.seed_history().await;
    drain_events(&mut rx, no_color, true, &classifier, &feed, &mut None);
    let mut previous: Option<HistoryItem> = poller.store().last().cloned();

    loop {
        poller.poll_latest().await;
        readings_taken +=
            drain_events(&mut rx, no_color, false, &classifier, &feed, &mut previous);

        if count > 0 && readings_taken >= count {
            if !quiet {
                eprintln!("Completed {} readings.", readings_taken);
            }
            return Ok(());
        }

        // Wait for next interval with graceful shutdown support
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nShutting down...");
                return Ok(());
            }
            _ = tokio::time::sleep(Duration::from_secs(interval)) => {}
        }
    }
}

/// Print everything the pipeline published since the last drain. Returns
/// the number of readings printed.
fn drain_events(
    rx: &mut tirta_core::EventReceiver,
    no_color: bool,
    suppress_readings: bool,
    classifier: &Classifier,
    feed: &ChartFeed,
    previous: &mut Option<HistoryItem>,
) -> u32 {
    let mut printed = 0;
    while let Ok(event) = rx.try_recv() {
        match event {
            DashboardEvent::Reading { item } => {
                if !suppress_readings {
                    println!(
                        "{}",
                        format_watch_line(&item, previous.as_ref(), classifier, feed, no_color)
                    );
                    printed += 1;
                }
                *previous = Some(item);
            }
            DashboardEvent::Alert { message } => {
                eprintln!("{}", style::format_alert(&message, no_color));
            }
            DashboardEvent::FetchFailed { endpoint, error } => {
                eprintln!("Fetch failed ({}): {}", endpoint, error);
            }
            _ => {}
        }
    }
    printed
}

/// Format a watch line with trend indicators comparing to the previous
/// reading. `~` marks the first reading, where no trend exists yet.
fn format_watch_line(
    item: &HistoryItem,
    previous: Option<&HistoryItem>,
    classifier: &Classifier,
    feed: &ChartFeed,
    no_color: bool,
) -> String {
    let timestamp = feed.format_label(item.timestamp_ms);
    let status = classifier.classify_item(item);

    let temp_trend = previous
        .map(|p| style::trend_indicator(item.temperature, p.temperature, no_color))
        .unwrap_or("~");
    let level_trend = previous
        .map(|p| style::trend_indicator(item.level_percent, p.level_percent, no_color))
        .unwrap_or("~");
    let ntu_trend = previous
        .map(|p| style::trend_indicator(item.ntu, p.ntu, no_color))
        .unwrap_or("~");

    format!(
        "[{}] {:.1} °C {} ({}) | {:.0}% {} ({}) | {:.0} NTU {} ({})",
        timestamp,
        item.temperature,
        temp_trend,
        style::format_severity_colored(
            &status.temperature.label,
            status.temperature.severity,
            no_color
        ),
        item.level_percent,
        level_trend,
        style::format_severity_colored(&status.level.label, status.level.severity, no_color),
        item.ntu,
        ntu_trend,
        style::format_severity_colored(
            &status.turbidity.label,
            status.turbidity.severity,
            no_color
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::UtcOffset;

    fn item(temperature: f64, level: f64, ntu: f64) -> HistoryItem {
        HistoryItem {
            timestamp_ms: 1_700_000_000_000,
            temperature,
            level_percent: level,
            ntu,
            level_status: String::new(),
            turb_status: String::new(),
        }
    }

    #[test]
    fn test_watch_line_without_previous() {
        let line = format_watch_line(
            &item(26.5, 45.0, 150.0),
            None,
            &Classifier::default(),
            &ChartFeed::new(UtcOffset::UTC),
            true,
        );
        assert_eq!(
            line,
            "[22:13:20] 26.5 °C ~ (Ideal) | 45% ~ (Stabil) | 150 NTU ~ (Jernih)"
        );
    }

    #[test]
    fn test_watch_line_with_trends() {
        let line = format_watch_line(
            &item(28.0, 40.0, 150.0),
            Some(&item(26.0, 45.0, 150.2)),
            &Classifier::default(),
            &ChartFeed::new(UtcOffset::UTC),
            true,
        );
        assert!(line.contains("28.0 °C ^"));
        assert!(line.contains("40% v"));
        assert!(line.contains("150 NTU -"));
    }
}
