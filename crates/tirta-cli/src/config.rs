//! Configuration file management.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use tirta_core::{AlertThresholds, HistoryOptions};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the sensor API
    pub api_url: String,

    /// Poll interval for the latest-reading endpoint, in seconds
    pub poll_interval_secs: u64,

    /// Re-sync interval for the history endpoint, in seconds
    pub history_interval_secs: u64,

    /// Maximum number of readings retained locally
    pub history_capacity: usize,

    /// Minimum spacing between stored readings, in seconds
    pub dedup_window_secs: u64,

    /// History file path; defaults to the platform data directory
    pub history_file: Option<PathBuf>,

    /// Disable colored output
    pub no_color: bool,

    /// Alert thresholds
    pub alerts: AlertConfig,
}

/// Danger thresholds that trigger alert notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Alert when temperature exceeds this value, in °C
    pub temperature_max: f64,

    /// Alert when water level exceeds this percentage
    pub level_max: f64,

    /// Alert when turbidity exceeds this value, in NTU
    pub ntu_max: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            poll_interval_secs: 10,
            history_interval_secs: 60,
            history_capacity: 30,
            dedup_window_secs: 5,
            history_file: None,
            no_color: false,
            alerts: AlertConfig::default(),
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        let t = AlertThresholds::default();
        Self {
            temperature_max: t.temperature_max,
            level_max: t.level_max,
            ntu_max: t.ntu_max,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tirta")
            .join("config.toml")
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        let path = Self::path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// The history file path: the configured one, or the platform data
    /// directory default.
    pub fn history_path(&self) -> PathBuf {
        self.history_file.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tirta")
                .join("history.json")
        })
    }

    /// Build store options from this config.
    pub fn history_options(&self) -> HistoryOptions {
        HistoryOptions::default()
            .with_capacity(self.history_capacity)
            .with_dedup_window_ms(self.dedup_window_secs as i64 * 1_000)
            .with_path(self.history_path())
    }

    /// Build alert thresholds from this config.
    pub fn alert_thresholds(&self) -> AlertThresholds {
        AlertThresholds {
            temperature_max: self.alerts.temperature_max,
            level_max: self.alerts.level_max,
            ntu_max: self.alerts.ntu_max,
        }
    }
}
