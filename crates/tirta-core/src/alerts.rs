//! Danger-threshold alerting with edge-triggered state.
//!
//! Alert thresholds sit well beyond the classifier's warning bands: they
//! mark conditions that warrant an immediate notification, not a colored
//! badge. To keep a sustained breach from spamming the user on every poll,
//! each dimension carries a boolean state and a message is emitted only on
//! the false→true transition. When the value drops back under the
//! threshold the state re-arms.

use serde::{Deserialize, Serialize};

use tirta_types::{HistoryItem, SensorKind};

/// Alert dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    /// Water temperature past the danger threshold.
    TemperatureHigh,
    /// Water level past the overflow danger threshold.
    LevelHigh,
    /// Turbidity past the danger threshold.
    TurbidityHigh,
}

impl AlertKind {
    /// The sensor dimension this alert watches.
    pub fn sensor(&self) -> SensorKind {
        match self {
            AlertKind::TemperatureHigh => SensorKind::Temperature,
            AlertKind::LevelHigh => SensorKind::WaterLevel,
            AlertKind::TurbidityHigh => SensorKind::Turbidity,
        }
    }
}

/// Danger thresholds, strictly more extreme than the classifier's warning
/// bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Temperature above this (°C) alerts.
    pub temperature_max: f64,
    /// Level above this (%) alerts.
    pub level_max: f64,
    /// Turbidity above this (NTU) alerts.
    pub ntu_max: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            temperature_max: 50.0,
            level_max: 85.0,
            ntu_max: 1800.0,
        }
    }
}

/// Per-dimension "currently breaching" flags. Not persisted; alerting
/// starts re-armed on every application start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertState {
    pub temperature_high: bool,
    pub level_high: bool,
    pub turbidity_high: bool,
}

impl AlertState {
    /// Whether a given alert is currently active.
    pub fn is_active(&self, kind: AlertKind) -> bool {
        match kind {
            AlertKind::TemperatureHigh => self.temperature_high,
            AlertKind::LevelHigh => self.level_high,
            AlertKind::TurbidityHigh => self.turbidity_high,
        }
    }

    /// Whether any alert is currently active.
    pub fn any_active(&self) -> bool {
        self.temperature_high || self.level_high || self.turbidity_high
    }
}

/// Evaluates danger thresholds against readings.
#[derive(Debug, Clone, Default)]
pub struct AlertEngine {
    thresholds: AlertThresholds,
}

impl AlertEngine {
    /// Create an engine with the given thresholds.
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }

    /// Get the thresholds.
    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    /// Evaluate a reading against the prior state.
    ///
    /// Returns the messages newly triggered by this reading (empty while a
    /// breach persists) and the fully recomputed state. Side-effect free;
    /// the caller owns displaying the messages and carrying the state.
    pub fn evaluate(&self, item: &HistoryItem, prior: AlertState) -> (Vec<String>, AlertState) {
        let state = AlertState {
            temperature_high: item.temperature > self.thresholds.temperature_max,
            level_high: item.level_percent > self.thresholds.level_max,
            turbidity_high: item.ntu > self.thresholds.ntu_max,
        };

        let mut messages = Vec::new();
        if state.temperature_high && !prior.temperature_high {
            messages.push(format!(
                "Suhu air ekstrem: {:.1} °C (batas {:.0} °C)",
                item.temperature, self.thresholds.temperature_max
            ));
        }
        if state.level_high && !prior.level_high {
            messages.push(format!(
                "Level air kritis: {:.0}% (batas {:.0}%)",
                item.level_percent, self.thresholds.level_max
            ));
        }
        if state.turbidity_high && !prior.turbidity_high {
            messages.push(format!(
                "Kekeruhan sangat tinggi: {:.0} NTU (batas {:.0} NTU)",
                item.ntu, self.thresholds.ntu_max
            ));
        }

        (messages, state)
    }
}
