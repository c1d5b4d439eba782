//! Typing rate estimation
//!
//! A [`RateEstimator`] owns one [`RatePolicy`] and the published
//! [`RateMetric`]. Capture threads call [`RateEstimator::ingest`], the ticker
//! calls [`RateEstimator::tick`], and displays read
//! [`RateEstimator::current_value`]. All three are serialized by one lock.

mod bucket;
mod rolling;

pub use bucket::SecondBucket;
pub use rolling::{RollingWindow, DEFAULT_MAX_RETAINED, DEFAULT_TICK_INTERVAL, DEFAULT_WINDOW};

use crate::config::{EstimatorConfig, PolicyKind};
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Keystrokes per word
pub const CHARS_PER_WORD: u64 = 5;

/// Result of recomputing a policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Words per minute
    pub wpm: f64,
    /// Keystrokes the estimate was computed from
    pub samples: usize,
}

/// Strategy for turning keystroke timestamps into a rate
pub trait RatePolicy: Send {
    /// Human-readable policy name
    fn name(&self) -> &'static str;

    /// How often [`tick`](Self::tick) should be driven
    fn tick_interval(&self) -> Duration;

    /// Record an accepted keystroke
    fn ingest(&mut self, at: Instant);

    /// Recompute the rate as of `now`
    fn tick(&mut self, now: Instant) -> Reading;

    /// Keystrokes currently held by the policy
    fn pending(&self) -> usize;

    /// Drop all recorded keystrokes
    fn reset(&mut self);
}

/// Lifecycle state of the estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EstimatorState {
    #[default]
    Idle,
    Active,
}

/// Snapshot of the published typing rate
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RateMetric {
    /// Current words-per-minute estimate
    pub wpm: f64,
    /// Whether estimation is running
    pub is_active: bool,
    /// Keystrokes behind the last estimate
    pub sample_count: usize,
}

impl RateMetric {
    /// WPM rounded for display
    pub fn rounded(&self) -> u32 {
        self.wpm.max(0.0).round() as u32
    }
}

/// One published estimate, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSample {
    pub at: Instant,
    pub wpm: f64,
    pub sample_count: usize,
}

struct Inner {
    policy: Box<dyn RatePolicy>,
    state: EstimatorState,
    metric: RateMetric,
}

/// Thread-safe typing rate estimator
///
/// Keystrokes and ticks arriving while idle are discarded.
pub struct RateEstimator {
    inner: Mutex<Inner>,
}

impl RateEstimator {
    pub fn new(policy: impl RatePolicy + 'static) -> Self {
        Self::with_boxed(Box::new(policy))
    }

    pub fn with_boxed(policy: Box<dyn RatePolicy>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                policy,
                state: EstimatorState::Idle,
                metric: RateMetric::default(),
            }),
        }
    }

    /// Build the estimator selected by configuration
    pub fn from_config(config: &EstimatorConfig) -> Self {
        match config.policy {
            PolicyKind::RollingWindow => Self::new(RollingWindow::new(
                config.window(),
                config.tick_interval(),
                config.max_retained,
            )),
            PolicyKind::SecondBucket => Self::new(SecondBucket::new()),
        }
    }

    /// Begin accepting keystrokes. Returns false if already active.
    pub fn start(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.state == EstimatorState::Active {
            return false;
        }
        inner.state = EstimatorState::Active;
        inner.metric = RateMetric {
            is_active: true,
            ..RateMetric::default()
        };
        true
    }

    /// Stop, clear recorded keystrokes and zero the metric. Returns false if
    /// already idle.
    pub fn stop(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.state == EstimatorState::Idle {
            return false;
        }
        inner.state = EstimatorState::Idle;
        inner.policy.reset();
        inner.metric = RateMetric::default();
        true
    }

    /// Record an accepted keystroke. Returns false if it was discarded.
    pub fn ingest(&self, at: Instant) -> bool {
        let mut inner = self.inner.lock();
        if inner.state != EstimatorState::Active {
            return false;
        }
        inner.policy.ingest(at);
        true
    }

    /// Recompute and publish the metric as of `now`
    pub fn tick(&self, now: Instant) -> Option<TickSample> {
        let mut inner = self.inner.lock();
        if inner.state != EstimatorState::Active {
            return None;
        }
        let reading = inner.policy.tick(now);
        inner.metric = RateMetric {
            wpm: reading.wpm,
            is_active: true,
            sample_count: reading.samples,
        };
        Some(TickSample {
            at: now,
            wpm: reading.wpm,
            sample_count: reading.samples,
        })
    }

    pub fn current_value(&self) -> RateMetric {
        self.inner.lock().metric
    }

    pub fn state(&self) -> EstimatorState {
        self.inner.lock().state
    }

    pub fn is_active(&self) -> bool {
        self.state() == EstimatorState::Active
    }

    pub fn tick_interval(&self) -> Duration {
        self.inner.lock().policy.tick_interval()
    }

    pub fn policy_name(&self) -> &'static str {
        self.inner.lock().policy.name()
    }

    /// Keystrokes currently held by the policy
    pub fn pending(&self) -> usize {
        self.inner.lock().policy.pending()
    }
}

impl Default for RateEstimator {
    fn default() -> Self {
        Self::new(RollingWindow::default())
    }
}

impl std::fmt::Debug for RateEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("RateEstimator")
            .field("policy", &inner.policy.name())
            .field("state", &inner.state)
            .field("metric", &inner.metric)
            .finish()
    }
}
