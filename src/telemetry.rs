//! Diagnostic metric emission and session statistics

use crate::estimator::{RateMetric, TickSample};
use crate::utils::MinMaxExt;
use std::time::{Duration, Instant};

/// Default minimum gap between emitted samples
pub const DEFAULT_EMIT_INTERVAL: Duration = Duration::from_millis(100);

/// Throttles tick samples down to a loggable rate
///
/// At most one sample is emitted per interval, measured on sample time.
#[derive(Debug, Clone)]
pub struct MetricEmitter {
    interval: Duration,
    last_emit: Option<Instant>,
    emitted: u64,
}

impl MetricEmitter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emit: None,
            emitted: 0,
        }
    }

    /// Offer a sample; returns it if it was emitted
    pub fn observe(&mut self, sample: TickSample) -> Option<TickSample> {
        let due = match self.last_emit {
            Some(last) => sample.at.saturating_duration_since(last) >= self.interval,
            None => true,
        };
        if !due {
            return None;
        }

        self.last_emit = Some(sample.at);
        self.emitted += 1;
        log::debug!(
            target: "wpm",
            "WPM: {:.0} (from {} keystrokes)",
            sample.wpm,
            sample.sample_count
        );
        Some(sample)
    }

    /// Number of samples emitted so far
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl Default for MetricEmitter {
    fn default() -> Self {
        Self::new(DEFAULT_EMIT_INTERVAL)
    }
}

/// Running statistics over one monitoring session
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// When the session began
    pub started: Instant,
    /// Highest displayed WPM
    pub peak_wpm: Option<u32>,
    /// Lowest non-zero displayed WPM
    pub slowest_wpm: Option<u32>,
    /// Sum of non-zero displayed readings
    typing_wpm_total: u64,
    /// Number of non-zero displayed readings
    typing_readings: u64,
    /// Total readings taken
    pub readings: u64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            peak_wpm: None,
            slowest_wpm: None,
            typing_wpm_total: 0,
            typing_readings: 0,
            readings: 0,
        }
    }

    /// Fold in a metric snapshot
    pub fn record(&mut self, metric: &RateMetric) {
        if !metric.is_active {
            return;
        }
        self.readings += 1;

        let wpm = metric.rounded();
        if wpm == 0 {
            return;
        }
        self.peak_wpm.update_max(wpm);
        self.slowest_wpm.update_min(wpm);
        self.typing_wpm_total += wpm as u64;
        self.typing_readings += 1;
    }

    /// Mean WPM over readings taken while typing
    pub fn average_wpm(&self) -> Option<f64> {
        if self.typing_readings == 0 {
            return None;
        }
        Some(self.typing_wpm_total as f64 / self.typing_readings as f64)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Elapsed time as `MM:SS`
    pub fn elapsed_formatted(&self) -> String {
        let secs = self.elapsed().as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}
