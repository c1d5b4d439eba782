//! Main application state and logic

use crate::config::Config;
use crate::error::MonitorError;
use crate::estimator::RateMetric;
use crate::monitor::Monitor;
use crate::report::{ReportSource, SessionReport};
use crate::telemetry::SessionStats;
use std::path::Path;
use std::time::Instant;

/// Application running state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Monitoring keystrokes
    Running,
    /// Monitoring stopped; the readout shows zero
    Paused,
    Quitting,
}

impl AppState {
    pub fn label(&self) -> &'static str {
        match self {
            AppState::Running => "RUNNING",
            AppState::Paused => "PAUSED",
            AppState::Quitting => "QUITTING",
        }
    }
}

/// Main application
pub struct App {
    /// Application state
    pub state: AppState,
    /// Configuration
    pub config: Config,
    /// Monitoring lifecycle
    pub monitor: Monitor,
    /// Statistics since launch or last reset
    pub stats: SessionStats,
    /// Last metric read by [`App::refresh`]
    pub metric: RateMetric,
    /// Last status message
    pub status_message: Option<String>,
    /// Status message timestamp
    pub status_time: Option<Instant>,
}

impl App {
    /// Create the app in the paused state; call [`App::start`] to begin
    pub fn new(config: Config, monitor: Monitor) -> Self {
        Self {
            state: AppState::Paused,
            config,
            monitor,
            stats: SessionStats::new(),
            metric: RateMetric::default(),
            status_message: None,
            status_time: None,
        }
    }

    /// Start monitoring, reporting failure in the status bar
    pub fn start(&mut self) -> Result<(), MonitorError> {
        match self.monitor.start() {
            Ok(()) => {
                self.state = AppState::Running;
                self.set_status("Monitoring started".to_string());
                Ok(())
            }
            Err(e) => {
                self.state = AppState::Paused;
                self.set_status(format!("Estimation unavailable: {}", e));
                Err(e)
            }
        }
    }

    /// Stop monitoring and zero the readout
    pub fn stop(&mut self) {
        if self.monitor.stop() {
            self.set_status("Monitoring stopped".to_string());
        }
        if self.state != AppState::Quitting {
            self.state = AppState::Paused;
        }
        self.metric = self.monitor.estimator().current_value();
    }

    /// Toggle monitoring on or off
    pub fn toggle_pause(&mut self) {
        match self.state {
            AppState::Running => self.stop(),
            AppState::Paused => {
                let _ = self.start();
            }
            AppState::Quitting => {}
        }
    }

    /// Read the latest metric and fold it into the session statistics
    pub fn refresh(&mut self) -> RateMetric {
        self.metric = self.monitor.estimator().current_value();
        self.stats.record(&self.metric);
        self.metric
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.state = AppState::Quitting;
        self.monitor.stop();
    }

    /// Reset session statistics and keystroke counters
    pub fn reset_stats(&mut self) {
        self.stats.reset();
        self.monitor.sink().reset_counts();
        self.set_status("Session statistics reset".to_string());
    }

    /// Set a status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_time = Some(Instant::now());
    }

    /// Get status message if still valid (within 3 seconds)
    pub fn get_status(&self) -> Option<&str> {
        match (&self.status_message, self.status_time) {
            (Some(msg), Some(time)) if time.elapsed().as_secs() < 3 => Some(msg),
            _ => None,
        }
    }

    /// Label/value rows for the statistics panel
    pub fn summary_rows(&self) -> Vec<(&'static str, String)> {
        let sink = self.monitor.sink();
        let optional = |value: Option<u32>| value.map_or("-".to_string(), |v| v.to_string());
        vec![
            ("Peak WPM", optional(self.stats.peak_wpm)),
            ("Slowest WPM", optional(self.stats.slowest_wpm)),
            (
                "Average WPM",
                self.stats
                    .average_wpm()
                    .map_or("-".to_string(), |v| format!("{:.0}", v)),
            ),
            ("Keystrokes", sink.accepted().to_string()),
            ("Ignored", sink.rejected().to_string()),
            ("In window", self.metric.sample_count.to_string()),
            ("Policy", self.monitor.estimator().policy_name().to_string()),
            ("Capture", self.monitor.capture_name().to_string()),
        ]
    }

    /// Generate a session report
    pub fn generate_report(&self) -> SessionReport {
        let sink = self.monitor.sink();
        SessionReport::new(
            &self.stats,
            &self.monitor.estimator().current_value(),
            ReportSource {
                policy: self.monitor.estimator().policy_name(),
                capture: self.monitor.capture_name(),
                counted: sink.accepted(),
                ignored: sink.rejected(),
            },
        )
    }

    /// Export session report to JSON file
    pub fn export_report(&mut self, filename: &str) -> Result<String, std::io::Error> {
        let report = self.generate_report();
        report.export_json(Path::new(filename))?;
        let msg = format!("Exported to {}", filename);
        self.set_status(msg.clone());
        Ok(msg)
    }
}
