//! History command implementation.

use anyhow::Result;

use tirta_core::{ChartFeed, Classifier, HistoryStore};
use tirta_types::HistoryItem;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::style;

pub fn cmd_history(config: &Config, count: u32, format: OutputFormat, no_color: bool) -> Result<()> {
    let store = HistoryStore::open(config.history_options());
    let items = if count > 0 {
        store.window(count as usize)
    } else {
        store.items()
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(items)?);
        }
        OutputFormat::Csv => {
            println!("timestamp_ms,temperature_c,level_percent,ntu,level_status,turb_status");
            for item in items {
                println!(
                    "{},{},{},{},{},{}",
                    item.timestamp_ms,
                    item.temperature,
                    item.level_percent,
                    item.ntu,
                    item.level_status,
                    item.turb_status
                );
            }
        }
        OutputFormat::Text => {
            if items.is_empty() {
                println!("No readings stored. Run `tirta watch` to start collecting.");
                return Ok(());
            }
            let feed = ChartFeed::local();
            let classifier = Classifier::default();
            for item in items {
                println!("{}", format_history_line(item, &classifier, &feed, no_color));
            }
            println!(
                "{} readings (capacity {})",
                items.len(),
                store.options().capacity
            );
        }
    }

    Ok(())
}

fn format_history_line(
    item: &HistoryItem,
    classifier: &Classifier,
    feed: &ChartFeed,
    no_color: bool,
) -> String {
    let status = classifier.classify_item(item);
    format!(
        "[{}] {:>5.1} °C ({}) | {:>3.0}% ({}) | {:>4.0} NTU ({})",
        feed.format_label(item.timestamp_ms),
        item.temperature,
        style::format_severity_colored(
            &status.temperature.label,
            status.temperature.severity,
            no_color
        ),
        item.level_percent,
        style::format_severity_colored(&status.level.label, status.level.severity, no_color),
        item.ntu,
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

    #[test]
    fn test_history_line_alignment() {
        let item = HistoryItem {
            timestamp_ms: 1_700_000_000_000,
            temperature: 26.5,
            level_percent: 45.0,
            ntu: 150.0,
            level_status: String::new(),
            turb_status: String::new(),
        };
        let line = format_history_line(
            &item,
            &Classifier::default(),
            &ChartFeed::new(UtcOffset::UTC),
            true,
        );
        assert_eq!(
            line,
            "[22:13:20]  26.5 °C (Ideal) |  45% (Stabil) |  150 NTU (Jernih)"
        );
    }
}
