//! Timestamp normalization.
//!
//! The backend's timestamp semantics are unreliable: some deployments send
//! seconds since the epoch, some send milliseconds, some omit the field
//! entirely, and at least one sends locally-offset wall clock values. The
//! policy here is deliberately conservative: a value is only trusted when
//! its magnitude clearly identifies the unit, and anything ambiguous is
//! replaced with the caller's `now` so a bad timestamp can never corrupt
//! the chart ordering.
//!
//! Stored timestamps are always true UTC epoch-milliseconds; timezone
//! handling is a display concern (see [`crate::chart`]).

use time::OffsetDateTime;

/// Values at or above this magnitude are unambiguously epoch-milliseconds
/// (1e12 ms ≈ September 2001).
const MS_FLOOR: f64 = 1e12;

/// Values below this magnitude are plausible epoch-seconds (1e10 s ≈ year
/// 2286). The band between `SECONDS_CEIL` and `MS_FLOOR` cannot be either
/// unit for any current date and is rejected rather than guessed.
const SECONDS_CEIL: f64 = 1e10;

/// Convert a raw backend timestamp into canonical epoch-milliseconds.
///
/// - Absent or non-finite values yield `now_ms`.
/// - Values `>= 1e12` are taken as milliseconds verbatim.
/// - Values in `[1, 1e10)` are taken as seconds and scaled.
/// - Everything else (sub-second fractions, zero, negative, the ambiguous
///   `1e10..1e12` band) yields `now_ms`.
///
/// Never fails and never panics.
pub fn normalize_epoch_ms(raw: Option<f64>, now_ms: i64) -> i64 {
    match raw {
        Some(value) if value.is_finite() => {
            if value >= MS_FLOOR {
                value as i64
            } else if value >= 1.0 && value < SECONDS_CEIL {
                (value * 1000.0) as i64
            } else {
                now_ms
            }
        }
        _ => now_ms,
    }
}

/// Current UTC time as epoch-milliseconds.
pub fn now_ms() -> i64 {
    let now = OffsetDateTime::now_utc();
    (now.unix_timestamp_nanos() / 1_000_000) as i64
}
