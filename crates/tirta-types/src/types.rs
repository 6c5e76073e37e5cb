//! Core types for tirta sensor data.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Coerce a JSON value to `f64`, defaulting to `0.0`.
///
/// The backend emits numeric fields as numbers or as strings (sometimes
/// non-numeric); anything that does not parse becomes `0.0` so the rest of
/// the pipeline can assume well-typed floats.
pub fn coerce_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn f64_or_zero<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    Ok(coerce_f64(&value))
}

fn opt_f64<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    Ok(match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn string_or_empty<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    Ok(match value {
        Value::String(s) => s,
        _ => String::new(),
    })
}

/// One raw sensor sample as returned by the backend API.
///
/// Every field is untrusted. Numeric fields coerce to `0.0` on any failure,
/// status strings default to empty, and the timestamp (when present) may be
/// in seconds or milliseconds; unit detection is the normalizer's job, not
/// this type's.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawReading {
    /// Water temperature in °C.
    #[serde(deserialize_with = "f64_or_zero")]
    pub temperature: f64,
    /// Water level as a percentage of tank capacity.
    #[serde(rename = "levelPercent", deserialize_with = "f64_or_zero")]
    pub level_percent: f64,
    /// Turbidity in NTU.
    #[serde(deserialize_with = "f64_or_zero")]
    pub ntu: f64,
    /// Server-side water level status string, if any.
    #[serde(rename = "levelStatus", deserialize_with = "string_or_empty")]
    pub level_status: String,
    /// Server-side turbidity status string, if any.
    #[serde(rename = "turbStatus", deserialize_with = "string_or_empty")]
    pub turb_status: String,
    /// Raw timestamp in seconds or milliseconds since the epoch.
    #[serde(deserialize_with = "opt_f64")]
    pub timestamp: Option<f64>,
}

/// A normalized reading as stored in the history buffer.
///
/// `timestamp_ms` is always true UTC epoch milliseconds; timezone handling
/// happens at display time only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// Canonical UTC epoch milliseconds.
    pub timestamp_ms: i64,
    /// Water temperature in °C.
    pub temperature: f64,
    /// Water level percentage.
    pub level_percent: f64,
    /// Turbidity in NTU.
    pub ntu: f64,
    /// Server-side level status (possibly empty).
    #[serde(default)]
    pub level_status: String,
    /// Server-side turbidity status (possibly empty).
    #[serde(default)]
    pub turb_status: String,
}

impl HistoryItem {
    /// Build a history item from a raw reading and an already-normalized
    /// timestamp. Pure field mapping; timestamp policy lives in tirta-core.
    pub fn from_raw(raw: &RawReading, timestamp_ms: i64) -> Self {
        Self {
            timestamp_ms,
            temperature: raw.temperature,
            level_percent: raw.level_percent,
            ntu: raw.ntu,
            level_status: raw.level_status.clone(),
            turb_status: raw.turb_status.clone(),
        }
    }

    /// The measured value for a given sensor dimension.
    pub fn value(&self, kind: SensorKind) -> f64 {
        match kind {
            SensorKind::Temperature => self.temperature,
            SensorKind::WaterLevel => self.level_percent,
            SensorKind::Turbidity => self.ntu,
        }
    }

    /// The server-supplied status string for a dimension, if the backend
    /// sent one. Temperature has no server status in the API.
    pub fn server_status(&self, kind: SensorKind) -> &str {
        match kind {
            SensorKind::Temperature => "",
            SensorKind::WaterLevel => &self.level_status,
            SensorKind::Turbidity => &self.turb_status,
        }
    }
}

/// The three monitored sensor dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorKind {
    /// Water temperature.
    Temperature,
    /// Water level percentage.
    WaterLevel,
    /// Water turbidity.
    Turbidity,
}

impl SensorKind {
    /// All dimensions, in display order.
    pub const ALL: [SensorKind; 3] = [
        SensorKind::Temperature,
        SensorKind::WaterLevel,
        SensorKind::Turbidity,
    ];

    /// Measurement unit suffix.
    pub fn unit(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "°C",
            SensorKind::WaterLevel => "%",
            SensorKind::Turbidity => "NTU",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::Temperature => write!(f, "Suhu"),
            SensorKind::WaterLevel => write!(f, "Level Air"),
            SensorKind::Turbidity => write!(f, "Kekeruhan"),
        }
    }
}

/// Status severity for a classified reading.
///
/// # Ordering
///
/// Severities are ordered `Good < Warning < Danger`, which allows threshold
/// comparisons like `if severity >= Severity::Warning { ... }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Reading is within the ideal range.
    Good,
    /// Reading needs attention.
    Warning,
    /// Reading is in the danger range.
    Danger,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Good => write!(f, "Good"),
            Severity::Warning => write!(f, "Warning"),
            Severity::Danger => write!(f, "Danger"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_reading_numeric_fields() {
        let raw: RawReading = serde_json::from_str(
            r#"{"temperature": 26.5, "levelPercent": 45, "ntu": 150, "timestamp": 1700000000}"#,
        )
        .unwrap();
        assert!((raw.temperature - 26.5).abs() < f64::EPSILON);
        assert!((raw.level_percent - 45.0).abs() < f64::EPSILON);
        assert!((raw.ntu - 150.0).abs() < f64::EPSILON);
        assert_eq!(raw.timestamp, Some(1_700_000_000.0));
    }

    #[test]
    fn test_raw_reading_string_numbers() {
        let raw: RawReading =
            serde_json::from_str(r#"{"temperature": "26.5", "levelPercent": " 45 "}"#).unwrap();
        assert!((raw.temperature - 26.5).abs() < f64::EPSILON);
        assert!((raw.level_percent - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_raw_reading_garbage_coerces_to_zero() {
        let raw: RawReading = serde_json::from_str(
            r#"{"temperature": "n/a", "levelPercent": null, "ntu": {}, "timestamp": "soon"}"#,
        )
        .unwrap();
        assert_eq!(raw.temperature, 0.0);
        assert_eq!(raw.level_percent, 0.0);
        assert_eq!(raw.ntu, 0.0);
        assert_eq!(raw.timestamp, None);
    }

    #[test]
    fn test_raw_reading_missing_fields() {
        let raw: RawReading = serde_json::from_str("{}").unwrap();
        assert_eq!(raw.temperature, 0.0);
        assert_eq!(raw.level_status, "");
        assert_eq!(raw.turb_status, "");
        assert_eq!(raw.timestamp, None);
    }

    #[test]
    fn test_raw_reading_status_strings() {
        let raw: RawReading = serde_json::from_str(
            r#"{"levelStatus": "Stabil", "turbStatus": "Agak Keruh"}"#,
        )
        .unwrap();
        assert_eq!(raw.level_status, "Stabil");
        assert_eq!(raw.turb_status, "Agak Keruh");

        // Null status strings degrade to empty, not an error.
        let raw: RawReading =
            serde_json::from_str(r#"{"levelStatus": null, "turbStatus": 3}"#).unwrap();
        assert_eq!(raw.level_status, "");
        assert_eq!(raw.turb_status, "");
    }

    #[test]
    fn test_history_item_from_raw() {
        let raw: RawReading = serde_json::from_str(
            r#"{"temperature": 27.0, "levelPercent": 50, "ntu": 120, "levelStatus": "Stabil"}"#,
        )
        .unwrap();
        let item = HistoryItem::from_raw(&raw, 1_700_000_000_000);
        assert_eq!(item.timestamp_ms, 1_700_000_000_000);
        assert!((item.temperature - 27.0).abs() < f64::EPSILON);
        assert_eq!(item.level_status, "Stabil");
        assert_eq!(item.server_status(SensorKind::WaterLevel), "Stabil");
        assert_eq!(item.server_status(SensorKind::Temperature), "");
        assert!((item.value(SensorKind::Turbidity) - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_history_item_round_trip() {
        let item = HistoryItem {
            timestamp_ms: 1_700_000_000_000,
            temperature: 26.5,
            level_percent: 45.0,
            ntu: 150.0,
            level_status: "Stabil".to_string(),
            turb_status: String::new(),
        };
        let json = serde_json::to_string(&item).unwrap();
        let back: HistoryItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Danger > Severity::Warning);
        assert!(Severity::Warning > Severity::Good);
    }

    #[test]
    fn test_sensor_kind_units() {
        assert_eq!(SensorKind::Temperature.unit(), "°C");
        assert_eq!(SensorKind::WaterLevel.unit(), "%");
        assert_eq!(SensorKind::Turbidity.unit(), "NTU");
    }
}
