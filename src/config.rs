//! Configuration management for wpm-speedometer
//!
//! Configuration is read from a platform-specific config file; a missing file
//! means defaults.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/wpm-speedometer/config.toml` |
//! | macOS | `~/Library/Application Support/wpm-speedometer/config.toml` |
//! | Windows | `%APPDATA%\wpm-speedometer\config.toml` |
//!
//! ## Example
//!
//! ```no_run
//! use wpm_speedometer::Config;
//!
//! let mut config = Config::load().unwrap_or_default();
//! config.estimator.window_ms = 3000;
//! config.save().expect("Failed to save config");
//! ```

pub use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Returns the path to the config file.
///
/// Creates the config directory if it doesn't exist.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = config_dir.join("wpm-speedometer");

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir.join("config.toml"))
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Rate estimation settings
    #[serde(default)]
    pub estimator: EstimatorConfig,
    /// Keyboard capture settings
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Diagnostic metric emission
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// UI settings
    #[serde(default)]
    pub ui: UiConfig,
}

/// Which rate policy drives the estimate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Average over a trailing window, recomputed at high frequency
    #[default]
    RollingWindow,
    /// Raw count per one-second bucket
    SecondBucket,
}

/// Rate estimator configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EstimatorConfig {
    pub policy: PolicyKind,
    /// Rolling window length in milliseconds
    pub window_ms: u64,
    /// Recompute interval in milliseconds (rolling window only)
    pub tick_interval_ms: u64,
    /// Cap on retained keystroke timestamps
    pub max_retained: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::RollingWindow,
            window_ms: 2000,
            tick_interval_ms: 20,
            max_retained: 1000,
        }
    }
}

impl EstimatorConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Capture backend selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaptureBackend {
    /// evdev on Linux when readable, device_query otherwise
    #[default]
    Auto,
    Evdev,
    DeviceQuery,
}

/// Keyboard capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    pub backend: CaptureBackend,
    /// How often the backend checks for new key state, in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            backend: CaptureBackend::Auto,
            poll_interval_ms: 2,
        }
    }
}

impl CaptureConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Metric emission configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Minimum gap between emitted samples, in milliseconds
    pub emit_interval_ms: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            emit_interval_ms: 100,
        }
    }
}

impl TelemetryConfig {
    pub fn emit_interval(&self) -> Duration {
        Duration::from_millis(self.emit_interval_ms)
    }
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// Refresh rate for the readout (in Hz)
    pub refresh_rate_hz: u32,
    /// Color theme (dark/light)
    pub theme: Theme,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_hz: 30,
            theme: Theme::Dark,
        }
    }
}

/// Color theme options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Reject values that would stall the ticker or disable the log cap
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            (self.estimator.window_ms == 0, "estimator.window_ms must be positive"),
            (
                self.estimator.tick_interval_ms == 0,
                "estimator.tick_interval_ms must be positive",
            ),
            (self.estimator.max_retained == 0, "estimator.max_retained must be positive"),
            (self.capture.poll_interval_ms == 0, "capture.poll_interval_ms must be positive"),
            (self.ui.refresh_rate_hz == 0, "ui.refresh_rate_hz must be positive"),
        ];
        match checks.iter().find(|(failed, _)| *failed) {
            Some((_, message)) => Err(ConfigError::Invalid(message.to_string())),
            None => Ok(()),
        }
    }

    /// Get UI refresh interval as Duration
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.ui.refresh_rate_hz.max(1) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_config_path(tag: &str) -> PathBuf {
        env::temp_dir().join(format!(
            "wpm-speedometer-test-{}-{}.toml",
            tag,
            std::process::id()
        ))
    }

    #[test]
    fn config_default_values() {
        let config = Config::default();
        assert_eq!(config.estimator.policy, PolicyKind::RollingWindow);
        assert_eq!(config.estimator.window_ms, 2000);
        assert_eq!(config.estimator.tick_interval_ms, 20);
        assert_eq!(config.estimator.max_retained, 1000);
        assert_eq!(config.capture.backend, CaptureBackend::Auto);
        assert_eq!(config.telemetry.emit_interval_ms, 100);
        assert_eq!(config.ui.refresh_rate_hz, 30);
        assert_eq!(config.ui.theme, Theme::Dark);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_durations() {
        let config = Config::default();
        assert_eq!(config.estimator.window(), Duration::from_secs(2));
        assert_eq!(config.estimator.tick_interval(), Duration::from_millis(20));
        assert_eq!(config.telemetry.emit_interval(), Duration::from_millis(100));
        assert_eq!(config.refresh_interval().as_micros(), 33333);
    }

    #[test]
    fn config_save_and_load_roundtrip() {
        let path = temp_config_path("roundtrip");

        let mut config = Config::default();
        config.estimator.policy = PolicyKind::SecondBucket;
        config.ui.theme = Theme::Light;

        config.save_to(&path).expect("Failed to save config");
        let loaded = Config::load_from(&path).expect("Failed to load config");
        assert_eq!(loaded, config);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn config_load_missing_file_fails() {
        let path = PathBuf::from("/nonexistent/path/config.toml");
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Io(_))));
    }

    #[test]
    fn config_load_rejects_invalid_values() {
        let path = temp_config_path("invalid");
        fs::write(&path, "[estimator]\nwindow_ms = 0\n").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn config_partial_file_fills_defaults() {
        let toml_str = r#"
[estimator]
policy = "second_bucket"
"#;
        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");
        assert_eq!(config.estimator.policy, PolicyKind::SecondBucket);
        assert_eq!(config.estimator.window_ms, 2000);
        assert_eq!(config.ui, UiConfig::default());
    }

    #[test]
    fn config_deserializes_from_toml() {
        let toml_str = r#"
[estimator]
policy = "rolling_window"
window_ms = 3000
tick_interval_ms = 50
max_retained = 500

[capture]
backend = "device_query"
poll_interval_ms = 5

[telemetry]
emit_interval_ms = 250

[ui]
refresh_rate_hz = 60
theme = "Light"
"#;

        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");

        assert_eq!(config.estimator.window_ms, 3000);
        assert_eq!(config.estimator.tick_interval_ms, 50);
        assert_eq!(config.estimator.max_retained, 500);
        assert_eq!(config.capture.backend, CaptureBackend::DeviceQuery);
        assert_eq!(config.capture.poll_interval_ms, 5);
        assert_eq!(config.telemetry.emit_interval_ms, 250);
        assert_eq!(config.ui.refresh_rate_hz, 60);
        assert_eq!(config.ui.theme, Theme::Light);
    }

    #[test]
    fn config_serializes_to_toml() {
        let toml_str = toml::to_string_pretty(&Config::default()).expect("Failed to serialize");

        assert!(toml_str.contains("[estimator]"));
        assert!(toml_str.contains("[capture]"));
        assert!(toml_str.contains("[telemetry]"));
        assert!(toml_str.contains("[ui]"));
        assert!(toml_str.contains("policy = \"rolling_window\""));
        assert!(toml_str.contains("theme = \"Dark\""));
    }

    #[test]
    fn validate_rejects_zero_values() {
        let mut config = Config::default();
        config.estimator.max_retained = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_retained"));

        let mut config = Config::default();
        config.ui.refresh_rate_hz = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_path_points_into_app_dir() {
        if let Ok(path) = config_path() {
            assert!(path.to_string_lossy().contains("wpm-speedometer"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
