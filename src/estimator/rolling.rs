//! Rolling-window rate policy

use super::{RatePolicy, Reading, CHARS_PER_WORD};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Default trailing window
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(2);
/// Default recompute interval (50 ticks per second)
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(20);
/// Default cap on retained timestamps
pub const DEFAULT_MAX_RETAINED: usize = 1000;

/// Averages the keystroke rate over a trailing time window
///
/// Timestamps are kept in time order. Each tick drops everything older
/// than the window and converts the remaining count to words per minute.
pub struct RollingWindow {
    /// Accepted keystrokes, oldest first
    log: VecDeque<Instant>,
    /// Length of the trailing window
    window: Duration,
    /// How often the estimate is recomputed
    tick_interval: Duration,
    /// Hard cap on `log`, independent of the window
    max_retained: usize,
}

impl RollingWindow {
    pub fn new(window: Duration, tick_interval: Duration, max_retained: usize) -> Self {
        Self {
            log: VecDeque::with_capacity(max_retained.min(DEFAULT_MAX_RETAINED)),
            window,
            tick_interval,
            max_retained: max_retained.max(1),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn max_retained(&self) -> usize {
        self.max_retained
    }

    /// Drop timestamps that fell out of the window ending at `now`
    fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.log.front() {
            if now.saturating_duration_since(oldest) > self.window {
                self.log.pop_front();
            } else {
                break;
            }
        }
    }

    /// Words per minute for `count` keystrokes spread over the window
    fn wpm_for(&self, count: usize) -> f64 {
        let minutes = self.window.as_secs_f64() / 60.0;
        if minutes <= 0.0 {
            return 0.0;
        }
        let words = count as f64 / CHARS_PER_WORD as f64;
        words / minutes
    }
}

impl Default for RollingWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_TICK_INTERVAL, DEFAULT_MAX_RETAINED)
    }
}

impl RatePolicy for RollingWindow {
    fn name(&self) -> &'static str {
        "rolling window"
    }

    fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    fn ingest(&mut self, at: Instant) {
        // Late stamps go to their sorted slot so the log stays non-decreasing
        match self.log.back() {
            Some(&last) if at < last => {
                let slot = self.log.partition_point(|&t| t <= at);
                self.log.insert(slot, at);
            }
            _ => self.log.push_back(at),
        }
        if self.log.len() > self.max_retained {
            let excess = self.log.len() - self.max_retained;
            self.log.drain(..excess);
        }
    }

    fn tick(&mut self, now: Instant) -> Reading {
        self.prune(now);
        let samples = self.log.len();
        Reading {
            wpm: self.wpm_for(samples),
            samples,
        }
    }

    fn pending(&self) -> usize {
        self.log.len()
    }

    fn reset(&mut self) {
        self.log.clear();
    }
}
