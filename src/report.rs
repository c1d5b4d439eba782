//! Session report and export functionality

use crate::estimator::RateMetric;
use crate::telemetry::SessionStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Complete session report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Typing speed summary
    pub summary: SessionSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report generation timestamp
    pub generated_at: String,
    /// Application version
    pub version: String,
    /// Session duration in seconds
    pub duration_secs: f64,
    /// Rate policy in use
    pub policy: String,
    /// Capture backend in use
    pub capture: String,
}

/// Typing speed summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// WPM at the moment of export
    pub current_wpm: u32,
    /// Highest WPM seen
    pub peak_wpm: Option<u32>,
    /// Lowest non-zero WPM seen
    pub slowest_wpm: Option<u32>,
    /// Mean WPM while typing
    pub average_wpm: Option<f64>,
    /// Keystrokes counted toward the rate
    pub keystrokes_counted: u64,
    /// Keystrokes observed but not counted
    pub keystrokes_ignored: u64,
}

/// Identifies where a report's numbers came from
#[derive(Debug, Clone, Copy)]
pub struct ReportSource<'a> {
    pub policy: &'a str,
    pub capture: &'a str,
    pub counted: u64,
    pub ignored: u64,
}

impl SessionReport {
    /// Create a new session report
    pub fn new(stats: &SessionStats, current: &RateMetric, source: ReportSource<'_>) -> Self {
        let now: DateTime<Utc> = Utc::now();

        Self {
            metadata: ReportMetadata {
                generated_at: now.to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                duration_secs: stats.elapsed().as_secs_f64(),
                policy: source.policy.to_string(),
                capture: source.capture.to_string(),
            },
            summary: SessionSummary {
                current_wpm: current.rounded(),
                peak_wpm: stats.peak_wpm,
                slowest_wpm: stats.slowest_wpm,
                average_wpm: stats.average_wpm(),
                keystrokes_counted: source.counted,
                keystrokes_ignored: source.ignored,
            },
        }
    }

    /// Export report to JSON file
    pub fn export_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Export report to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
