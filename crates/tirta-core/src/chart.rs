//! Chart projection of the history window.
//!
//! Turns an ordered slice of history items into the parallel label/series
//! arrays an external chart renderer consumes. Labels are formatted in a
//! single offset chosen at startup; stored timestamps are never mutated
//! for timezone purposes.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use tirta_types::HistoryItem;

use crate::timestamp::now_ms;

const LABEL_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]:[second]");

/// Parallel arrays for the chart renderer. All four vectors always have
/// the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    /// `HH:MM:SS` labels, one per point.
    pub labels: Vec<String>,
    /// Temperature series in °C.
    pub temperature: Vec<f64>,
    /// Water level series in %.
    pub level: Vec<f64>,
    /// Turbidity series in NTU.
    pub ntu: Vec<f64>,
}

impl ChartSeries {
    /// Number of points.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the projection holds no points. Note that an empty *input*
    /// still produces a one-point placeholder, so this is only true for a
    /// manually constructed empty series.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Projects history windows into chart series.
#[derive(Debug, Clone, Copy)]
pub struct ChartFeed {
    offset: UtcOffset,
}

impl ChartFeed {
    /// Create a feed rendering labels in the given offset.
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    /// Create a feed using the local offset, falling back to UTC when the
    /// local offset cannot be determined.
    pub fn local() -> Self {
        Self::new(UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
    }

    /// The display offset in use.
    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// Project a history window into chart series, using the current time
    /// for the empty-input placeholder.
    pub fn project(&self, items: &[HistoryItem]) -> ChartSeries {
        self.project_at(items, now_ms())
    }

    /// Project with an explicit "now" for the empty placeholder.
    pub fn project_at(&self, items: &[HistoryItem], now_ms: i64) -> ChartSeries {
        if items.is_empty() {
            // A defined one-point "empty chart" instead of zero-length
            // series the renderer would choke on.
            return ChartSeries {
                labels: vec![self.format_label(now_ms)],
                temperature: vec![0.0],
                level: vec![0.0],
                ntu: vec![0.0],
            };
        }

        ChartSeries {
            labels: items
                .iter()
                .map(|i| self.format_label(i.timestamp_ms))
                .collect(),
            temperature: items.iter().map(|i| i.temperature).collect(),
            level: items.iter().map(|i| i.level_percent).collect(),
            ntu: items.iter().map(|i| i.ntu).collect(),
        }
    }

    /// Format one timestamp as a fixed-width `HH:MM:SS` label in the feed's
    /// offset. Out-of-range timestamps degrade to a dash placeholder.
    pub fn format_label(&self, timestamp_ms: i64) -> String {
        OffsetDateTime::from_unix_timestamp_nanos(timestamp_ms as i128 * 1_000_000)
            .map(|dt| dt.to_offset(self.offset))
            .ok()
            .and_then(|dt| dt.format(LABEL_FORMAT).ok())
            .unwrap_or_else(|| "--:--:--".to_string())
    }
}

impl Default for ChartFeed {
    fn default() -> Self {
        Self::local()
    }
}
