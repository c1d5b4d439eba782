//! Error types shared across the crate
//!
//! None of these are fatal: every failure leaves the estimator idle with the
//! metric held at zero.

use std::io;
use thiserror::Error;

/// Errors raised while installing or running a capture source
#[derive(Debug, Error)]
pub enum CaptureError {
    /// No keyboard devices found
    #[error("No keyboard devices found")]
    NoDevices,

    /// The platform refused access to input devices
    #[error("Permission denied accessing {0}")]
    PermissionDenied(String),

    /// The source is already delivering events
    #[error("Capture source is already installed")]
    AlreadyInstalled,

    /// The platform input backend could not be reached
    #[error("Capture backend unavailable: {0}")]
    Unavailable(String),

    /// The upstream event feed is gone
    #[error("Capture source disconnected")]
    Disconnected,

    #[error("IO error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for CaptureError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::PermissionDenied {
            CaptureError::PermissionDenied("device".to_string())
        } else {
            CaptureError::Io(e)
        }
    }
}

/// Errors returned by [`Monitor::start`](crate::monitor::Monitor::start)
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Input observation is not permitted; the monitor stays idle
    #[error("Input monitoring permission denied: {0}")]
    PermissionDenied(String),

    /// The capture source could not be installed; start was rolled back
    #[error("Failed to install capture source: {0}")]
    CaptureInstall(#[from] CaptureError),

    /// The tick scheduler thread could not be spawned
    #[error("Failed to start ticker: {0}")]
    Ticker(io::Error),
}

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Could not determine config directory")]
    NoConfigDir,

    /// IO error reading or writing config file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Failed to parse config file
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_permission_denied_maps_to_capture_denial() {
        let err = CaptureError::from(io::Error::new(io::ErrorKind::PermissionDenied, "nope"));
        assert!(matches!(err, CaptureError::PermissionDenied(_)));

        let err = CaptureError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(matches!(err, CaptureError::Io(_)));
    }

    #[test]
    fn monitor_error_wraps_capture_error() {
        let err: MonitorError = CaptureError::NoDevices.into();
        assert_eq!(
            err.to_string(),
            "Failed to install capture source: No keyboard devices found"
        );
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::NoConfigDir;
        assert_eq!(err.to_string(), "Could not determine config directory");

        let io_err = ConfigError::Io(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        assert!(io_err.to_string().contains("IO error"));
    }
}
