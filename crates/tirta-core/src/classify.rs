//! Reading classification into status categories.
//!
//! The backend sometimes sends its own status strings (`levelStatus`,
//! `turbStatus`). When one is present and not a "no data" sentinel it wins:
//! the string is used verbatim as the label and its keywords decide the
//! severity. Otherwise severity comes from numeric thresholds.
//!
//! # Example
//!
//! ```
//! use tirta_core::{Classifier, SensorKind, Severity};
//!
//! let classifier = Classifier::default();
//!
//! let status = classifier.classify(SensorKind::Temperature, 26.5, "");
//! assert_eq!(status.severity, Severity::Good);
//! assert_eq!(status.label, "Ideal");
//! ```

use serde::{Deserialize, Serialize};

use tirta_types::{HistoryItem, SensorKind, Severity};

/// Server status strings that mean "no reading available". Matched
/// case-insensitively; an empty string counts too.
const NO_DATA_SENTINELS: [&str; 2] = ["TIDAK TERDETEKSI", "NO DATA"];

/// Keywords in a server status string that force `Danger`.
const DANGER_KEYWORDS: [&str; 2] = ["KOSONG", "EKSTREM"];

/// Keywords in a server status string that force `Warning`.
const WARNING_KEYWORDS: [&str; 2] = ["RENDAH", "KERUH"];

/// A classified reading: display label plus severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Human-readable status label (Indonesian, matching the dashboard).
    pub label: String,
    /// Severity category.
    pub severity: Severity,
}

impl Classification {
    fn new(label: impl Into<String>, severity: Severity) -> Self {
        Self {
            label: label.into(),
            severity,
        }
    }
}

/// Numeric threshold configuration for the classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Lower bound of the ideal temperature band in °C.
    pub temp_ideal_min: f64,
    /// Upper bound of the ideal temperature band in °C.
    pub temp_ideal_max: f64,
    /// Below this level percentage the tank is dangerously low.
    pub level_low: f64,
    /// Above this level percentage overflow becomes a risk.
    pub level_high: f64,
    /// Up to this NTU the water counts as clear.
    pub turb_clear_max: f64,
    /// Up to this NTU the water is merely murky; above is danger.
    pub turb_murky_max: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            temp_ideal_min: 25.0,
            temp_ideal_max: 30.0,
            level_low: 10.0,
            level_high: 70.0,
            turb_clear_max: 200.0,
            turb_murky_max: 1000.0,
        }
    }
}

/// Classifier for sensor readings.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

/// Classifications for all three dimensions of one reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStatus {
    pub temperature: Classification,
    pub level: Classification,
    pub turbidity: Classification,
}

impl Classifier {
    /// Create a classifier with the given thresholds.
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a single value, preferring the server status string when it
    /// carries information.
    ///
    /// Pure and total: never fails, no side effects.
    pub fn classify(&self, kind: SensorKind, value: f64, server_status: &str) -> Classification {
        let trimmed = server_status.trim();
        if !trimmed.is_empty() && !is_no_data_sentinel(trimmed) {
            return classify_server_status(trimmed);
        }
        match kind {
            SensorKind::Temperature => self.classify_temperature(value),
            SensorKind::WaterLevel => self.classify_level(value),
            SensorKind::Turbidity => self.classify_turbidity(value),
        }
    }

    /// Classify all three dimensions of a stored reading.
    pub fn classify_item(&self, item: &HistoryItem) -> ItemStatus {
        ItemStatus {
            temperature: self.classify(
                SensorKind::Temperature,
                item.temperature,
                item.server_status(SensorKind::Temperature),
            ),
            level: self.classify(
                SensorKind::WaterLevel,
                item.level_percent,
                item.server_status(SensorKind::WaterLevel),
            ),
            turbidity: self.classify(
                SensorKind::Turbidity,
                item.ntu,
                item.server_status(SensorKind::Turbidity),
            ),
        }
    }

    fn classify_temperature(&self, value: f64) -> Classification {
        if value < self.config.temp_ideal_min {
            Classification::new("Terlalu Dingin", Severity::Warning)
        } else if value > self.config.temp_ideal_max {
            Classification::new("Terlalu Panas", Severity::Warning)
        } else {
            Classification::new("Ideal", Severity::Good)
        }
    }

    fn classify_level(&self, value: f64) -> Classification {
        if value < self.config.level_low {
            Classification::new("Air Kurang", Severity::Danger)
        } else if value > self.config.level_high {
            Classification::new("Risiko Meluap", Severity::Warning)
        } else {
            Classification::new("Stabil", Severity::Good)
        }
    }

    fn classify_turbidity(&self, value: f64) -> Classification {
        if value < self.config.turb_clear_max {
            Classification::new("Jernih", Severity::Good)
        } else if value <= self.config.turb_murky_max {
            Classification::new("Agak Keruh", Severity::Warning)
        } else {
            Classification::new("Sangat Keruh", Severity::Danger)
        }
    }
}

fn is_no_data_sentinel(status: &str) -> bool {
    let upper = status.to_uppercase();
    NO_DATA_SENTINELS.iter().any(|s| upper == *s)
}

/// Derive severity from keywords in a server status string; the string
/// itself becomes the label verbatim.
fn classify_server_status(status: &str) -> Classification {
    let upper = status.to_uppercase();
    let severity = if DANGER_KEYWORDS.iter().any(|k| upper.contains(k)) {
        Severity::Danger
    } else if WARNING_KEYWORDS.iter().any(|k| upper.contains(k)) {
        Severity::Warning
    } else {
        Severity::Good
    };
    Classification::new(status, severity)
}
