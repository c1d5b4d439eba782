//! Monitoring lifecycle
//!
//! [`Monitor`] ties the pieces together: it checks permission, installs the
//! capture source, runs the [`Ticker`], and undoes all of it on stop.
//!
//! ```text
//! Idle --start (permitted, capture installed)--> Active
//! Active --stop--> Idle
//! ```

mod permission;
mod ticker;

pub use permission::{AlwaysGranted, DeviceAccessGate, Permission, PermissionGate};
pub use ticker::Ticker;

use crate::error::MonitorError;
use crate::estimator::RateEstimator;
use crate::keyboard::{CaptureSource, InputClassifier, KeySink};
use crate::telemetry::MetricEmitter;
use std::sync::Arc;
use std::time::Duration;

/// Lifecycle controller for one estimator and one capture source
pub struct Monitor {
    estimator: Arc<RateEstimator>,
    sink: KeySink,
    gate: Box<dyn PermissionGate>,
    capture: Box<dyn CaptureSource>,
    emit_interval: Duration,
    ticker: Option<Ticker>,
}

impl Monitor {
    pub fn new(
        estimator: Arc<RateEstimator>,
        classifier: InputClassifier,
        gate: Box<dyn PermissionGate>,
        capture: Box<dyn CaptureSource>,
        emit_interval: Duration,
    ) -> Self {
        let sink = KeySink::new(classifier, Arc::clone(&estimator));
        Self {
            estimator,
            sink,
            gate,
            capture,
            emit_interval,
            ticker: None,
        }
    }

    /// Begin monitoring. A no-op if already active.
    ///
    /// On any failure the monitor is left idle with nothing installed.
    pub fn start(&mut self) -> Result<(), MonitorError> {
        if self.ticker.is_some() {
            return Ok(());
        }

        if let Permission::Denied(reason) = self.gate.check() {
            log::warn!("input monitoring permission denied: {}", reason);
            return Err(MonitorError::PermissionDenied(reason));
        }

        self.estimator.start();

        if let Err(e) = self.capture.install(self.sink.clone()) {
            log::warn!("failed to install {} capture: {}", self.capture.name(), e);
            self.estimator.stop();
            return Err(MonitorError::CaptureInstall(e));
        }

        let emitter = MetricEmitter::new(self.emit_interval);
        match Ticker::spawn(Arc::clone(&self.estimator), emitter) {
            Ok(ticker) => self.ticker = Some(ticker),
            Err(e) => {
                self.capture.uninstall();
                self.estimator.stop();
                return Err(MonitorError::Ticker(e));
            }
        }

        log::info!(
            "WPM monitoring started ({} policy, {} capture)",
            self.estimator.policy_name(),
            self.capture.name()
        );
        Ok(())
    }

    /// Stop monitoring and zero the metric. Returns false if already idle.
    pub fn stop(&mut self) -> bool {
        let Some(ticker) = self.ticker.take() else {
            return false;
        };

        self.capture.uninstall();
        ticker.stop();
        self.estimator.stop();
        log::info!("WPM monitoring stopped");
        true
    }

    pub fn is_active(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn estimator(&self) -> &Arc<RateEstimator> {
        &self.estimator
    }

    pub fn sink(&self) -> &KeySink {
        &self.sink
    }

    pub fn capture_name(&self) -> &'static str {
        self.capture.name()
    }

    pub fn capture_installed(&self) -> bool {
        self.capture.is_installed()
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.stop();
    }
}
