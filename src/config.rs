//! Configuration management for the posture monitor

use crate::{
    constants::{
        DEFAULT_CHECK_INTERVAL_MS, DEFAULT_PERSISTENCE_RATIO, DEFAULT_STARTUP_TIMEOUT_MS,
        DEFAULT_STRETCH_REMINDER_SECS, DEFAULT_SUSTAINED_BAD_SECS, DEFAULT_TRAY_STICK_MS, DEFAULT_WINDOW_CAPACITY,
    },
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::{path::Path, str::FromStr};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sampling and smoothing window
    pub smoothing: SmoothingConfig,

    /// Session reminders
    pub session: SessionConfig,

    /// Monitor behaviour
    pub monitor: MonitorConfig,

    /// Tray icon behaviour
    pub tray: TrayConfig,
}

/// Smoothing window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Minimum time between samples (ms)
    pub check_interval_ms: u64,

    /// Samples per aggregated verdict
    pub window_capacity: usize,

    /// Fraction of samples an issue must exceed to persist
    pub persistence_ratio: f64,
}

/// Session reminder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Period of the stretch reminder (s)
    pub stretch_reminder_secs: u64,

    /// Open bad-posture streak age that raises an alert (s)
    pub sustained_bad_secs: u64,
}

/// Which classifier drives the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Posture,
    Exercise,
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "posture" => Ok(Self::Posture),
            "exercise" => Ok(Self::Exercise),
            other => Err(Error::InvalidInput(format!("Unknown mode: {other}"))),
        }
    }
}

/// Monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Active classifier
    pub mode: Mode,

    /// Maximum wait for the pose source to become ready (ms)
    pub startup_timeout_ms: u64,
}

/// Tray configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrayConfig {
    /// Minimum time between icon changes (ms)
    pub stick_ms: u64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: DEFAULT_CHECK_INTERVAL_MS,
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            persistence_ratio: DEFAULT_PERSISTENCE_RATIO,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stretch_reminder_secs: DEFAULT_STRETCH_REMINDER_SECS,
            sustained_bad_secs: DEFAULT_SUSTAINED_BAD_SECS,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Posture,
            startup_timeout_ms: DEFAULT_STARTUP_TIMEOUT_MS,
        }
    }
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            stick_ms: DEFAULT_TRAY_STICK_MS,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.smoothing.check_interval_ms == 0 {
            return Err(Error::ConfigError(
                "Check interval must be greater than 0".to_string(),
            ));
        }
        if self.smoothing.window_capacity == 0 {
            return Err(Error::ConfigError(
                "Window capacity must be greater than 0".to_string(),
            ));
        }
        if !(self.smoothing.persistence_ratio > 0.0 && self.smoothing.persistence_ratio < 1.0) {
            return Err(Error::ConfigError(
                "Persistence ratio must be between 0.0 and 1.0 (exclusive)".to_string(),
            ));
        }

        if self.session.stretch_reminder_secs == 0 {
            return Err(Error::ConfigError(
                "Stretch reminder interval must be greater than 0".to_string(),
            ));
        }
        if self.session.sustained_bad_secs == 0 {
            return Err(Error::ConfigError(
                "Sustained bad posture duration must be greater than 0".to_string(),
            ));
        }

        if self.monitor.startup_timeout_ms == 0 {
            return Err(Error::ConfigError(
                "Startup timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Posture Monitor Configuration

# Sampling and smoothing
smoothing:
  check_interval_ms: 1000
  window_capacity: 30
  persistence_ratio: 0.7

# Session reminders
session:
  stretch_reminder_secs: 60
  sustained_bad_secs: 30

# Monitor behaviour (mode: posture | exercise)
monitor:
  mode: posture
  startup_timeout_ms: 10000

# Tray icon
tray:
  stick_ms: 4000
"#;
