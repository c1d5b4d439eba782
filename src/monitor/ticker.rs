//! Repeating tick schedule for the estimator

use crate::estimator::RateEstimator;
use crate::telemetry::MetricEmitter;
use std::io;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Drives [`RateEstimator::tick`] at the policy's tick interval
///
/// Runs on its own thread until [`Ticker::stop`] is called or the ticker is
/// dropped.
pub struct Ticker {
    stop: mpsc::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn(estimator: Arc<RateEstimator>, mut emitter: MetricEmitter) -> io::Result<Self> {
        let interval = estimator.tick_interval();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("wpm-ticker".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if let Some(sample) = estimator.tick(Instant::now()) {
                            emitter.observe(sample);
                        }
                    }
                    _ => break,
                }
            })?;

        log::debug!("ticker running every {:?}", interval);
        Ok(Self {
            stop: stop_tx,
            handle: Some(handle),
        })
    }

    /// Stop ticking and wait for the thread to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.stop.send(());
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::{RollingWindow, DEFAULT_MAX_RETAINED, DEFAULT_WINDOW};
    use std::time::Duration;

    #[test]
    fn ticker_publishes_metric() {
        let estimator = Arc::new(RateEstimator::new(RollingWindow::new(
            DEFAULT_WINDOW,
            Duration::from_millis(5),
            DEFAULT_MAX_RETAINED,
        )));
        estimator.start();
        let now = Instant::now();
        for _ in 0..10 {
            estimator.ingest(now);
        }

        let ticker = Ticker::spawn(Arc::clone(&estimator), MetricEmitter::default()).unwrap();
        let deadline = Instant::now() + Duration::from_secs(2);
        while estimator.current_value().sample_count == 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        ticker.stop();

        assert_eq!(estimator.current_value().sample_count, 10);
        assert_eq!(estimator.current_value().rounded(), 60);
    }

    #[test]
    fn stopped_ticker_leaves_metric_alone() {
        let estimator = Arc::new(RateEstimator::default());
        estimator.start();
        let ticker = Ticker::spawn(Arc::clone(&estimator), MetricEmitter::default()).unwrap();
        ticker.stop();

        estimator.ingest(Instant::now());
        thread::sleep(Duration::from_millis(60));
        assert_eq!(estimator.current_value().sample_count, 0);
    }
}
