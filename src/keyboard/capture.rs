//! Capture sources and the sink they deliver into
//!
//! A [`CaptureSource`] observes physical key-downs and hands each one to a
//! [`KeySink`]. Sources are passive: they never grab devices or swallow
//! events, so input reaches the rest of the system untouched.

use super::keymap::scancode_for;
use super::{InputClassifier, KeyCode, KeyEvent, ModifierTracker};
use crate::error::CaptureError;
use crate::estimator::RateEstimator;
use device_query::{DeviceQuery, DeviceState};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// What happened to an observed event
///
/// The event is forwarded to the rest of the input pipeline in both cases;
/// this only reports whether it counted toward the typing rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passthrough {
    /// Counted as a typing keystroke
    Counted,
    /// Observed but not counted
    Ignored,
}

#[derive(Debug, Default)]
struct KeyCounters {
    accepted: AtomicU64,
    rejected: AtomicU64,
}

/// Receives key events from capture sources
///
/// Cheap to clone; all clones share the classifier, the estimator and the
/// keystroke counters.
#[derive(Debug, Clone)]
pub struct KeySink {
    classifier: Arc<InputClassifier>,
    estimator: Arc<RateEstimator>,
    counters: Arc<KeyCounters>,
}

impl KeySink {
    pub fn new(classifier: InputClassifier, estimator: Arc<RateEstimator>) -> Self {
        Self {
            classifier: Arc::new(classifier),
            estimator,
            counters: Arc::new(KeyCounters::default()),
        }
    }

    /// Classify an event and feed accepted keystrokes to the estimator
    pub fn on_key_event(&self, event: &KeyEvent) -> Passthrough {
        if self.classifier.accepts_event(event) {
            if self.estimator.ingest(event.timestamp) {
                self.counters.accepted.fetch_add(1, Ordering::Relaxed);
                return Passthrough::Counted;
            }
        } else if self.estimator.is_active() {
            self.counters.rejected.fetch_add(1, Ordering::Relaxed);
        }
        Passthrough::Ignored
    }

    /// Keystrokes counted toward the rate
    pub fn accepted(&self) -> u64 {
        self.counters.accepted.load(Ordering::Relaxed)
    }

    /// Keystrokes observed while active but not counted
    pub fn rejected(&self) -> u64 {
        self.counters.rejected.load(Ordering::Relaxed)
    }

    pub fn reset_counts(&self) {
        self.counters.accepted.store(0, Ordering::Relaxed);
        self.counters.rejected.store(0, Ordering::Relaxed);
    }

    pub fn estimator(&self) -> &Arc<RateEstimator> {
        &self.estimator
    }
}

/// A facility that delivers physical key-down events to a [`KeySink`]
pub trait CaptureSource: Send {
    /// Name of the backend
    fn name(&self) -> &'static str;

    /// Start delivering events to `sink`
    fn install(&mut self, sink: KeySink) -> Result<(), CaptureError>;

    /// Stop delivering events. Must leave nothing running.
    fn uninstall(&mut self);

    fn is_installed(&self) -> bool;
}

struct Worker<T> {
    stop: mpsc::Sender<()>,
    handle: JoinHandle<T>,
}

/// Polls global key state through `device_query`
///
/// Works without special device permissions wherever `device_query` has a
/// backend, at the cost of polling.
pub struct DeviceQueryCapture {
    poll_interval: Duration,
    open: fn() -> Option<DeviceState>,
    worker: Option<Worker<()>>,
}

impl DeviceQueryCapture {
    pub fn new(poll_interval: Duration) -> Self {
        Self::with_opener(poll_interval, DeviceState::checked_new)
    }

    /// Use `open` to connect to the platform backend
    pub(crate) fn with_opener(poll_interval: Duration, open: fn() -> Option<DeviceState>) -> Self {
        Self {
            poll_interval,
            open,
            worker: None,
        }
    }
}

impl CaptureSource for DeviceQueryCapture {
    fn name(&self) -> &'static str {
        "device_query"
    }

    fn install(&mut self, sink: KeySink) -> Result<(), CaptureError> {
        if self.worker.is_some() {
            return Err(CaptureError::AlreadyInstalled);
        }

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), CaptureError>>();
        let poll_interval = self.poll_interval;
        let open = self.open;

        let handle = thread::Builder::new()
            .name("capture-device-query".to_string())
            .spawn(move || {
                let Some(device_state) = open() else {
                    let _ = ready_tx.send(Err(CaptureError::Unavailable(
                        "device_query cannot reach the input system".to_string(),
                    )));
                    return;
                };
                let _ = ready_tx.send(Ok(()));
                let mut poller = KeyPoller::default();
                loop {
                    match stop_rx.recv_timeout(poll_interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            poller.poll(&device_state.get_keys(), Instant::now(), &sink);
                        }
                        _ => break,
                    }
                }
            })?;

        let ready = ready_rx.recv().unwrap_or(Err(CaptureError::Disconnected));
        if let Err(e) = ready {
            let _ = handle.join();
            return Err(e);
        }

        log::info!("device_query capture polling every {:?}", poll_interval);
        self.worker = Some(Worker {
            stop: stop_tx,
            handle,
        });
        Ok(())
    }

    fn uninstall(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop.send(());
            let _ = worker.handle.join();
            log::info!("device_query capture removed");
        }
    }

    fn is_installed(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for DeviceQueryCapture {
    fn drop(&mut self) {
        self.uninstall();
    }
}

/// Turns successive key-state snapshots into key-down events
#[derive(Debug, Default)]
struct KeyPoller {
    last_keys: Vec<device_query::Keycode>,
    modifiers: ModifierTracker,
}

impl KeyPoller {
    /// Diff `current_keys` against the previous snapshot; returns key-downs sent
    fn poll(&mut self, current_keys: &[device_query::Keycode], now: Instant, sink: &KeySink) -> usize {
        // Releases first so a modifier let go in this interval no longer applies
        for key in &self.last_keys {
            if !current_keys.contains(key) {
                if let Some(scancode) = scancode_for(*key) {
                    self.modifiers.update(scancode, false);
                }
            }
        }

        let pressed: Vec<u16> = current_keys
            .iter()
            .filter(|key| !self.last_keys.contains(*key))
            .filter_map(|key| scancode_for(*key))
            .collect();

        for &scancode in &pressed {
            self.modifiers.update(scancode, true);
        }

        let modifiers = self.modifiers.modifiers();
        let mut event_count = 0;
        for scancode in pressed {
            if ModifierTracker::is_modifier(scancode) {
                continue;
            }
            if let Some(code) = KeyCode::from_scancode(scancode) {
                sink.on_key_event(&KeyEvent::new(code, modifiers, now));
                event_count += 1;
            }
        }

        self.last_keys = current_keys.to_vec();
        event_count
    }
}

/// Forwards key events arriving on a channel
///
/// For embedders that already own an input feed, and for tests.
pub struct ChannelCapture {
    receiver: Option<mpsc::Receiver<KeyEvent>>,
    /// The worker hands the receiver back unless the feed disconnected
    worker: Option<Worker<Option<mpsc::Receiver<KeyEvent>>>>,
}

impl ChannelCapture {
    pub fn new(receiver: mpsc::Receiver<KeyEvent>) -> Self {
        Self {
            receiver: Some(receiver),
            worker: None,
        }
    }

    /// Create a capture together with the sender that feeds it
    pub fn pair() -> (mpsc::Sender<KeyEvent>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self::new(rx))
    }
}

impl CaptureSource for ChannelCapture {
    fn name(&self) -> &'static str {
        "channel"
    }

    fn install(&mut self, sink: KeySink) -> Result<(), CaptureError> {
        if self.is_installed() {
            return Err(CaptureError::AlreadyInstalled);
        }
        // Reap a worker whose feed has ended
        self.uninstall();
        let receiver = self.receiver.take().ok_or(CaptureError::Disconnected)?;

        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("capture-channel".to_string())
            .spawn(move || {
                loop {
                    if stop_rx.try_recv().is_ok() {
                        break;
                    }
                    match receiver.recv_timeout(Duration::from_millis(10)) {
                        Ok(event) => {
                            sink.on_key_event(&event);
                        }
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => {
                            log::info!("channel capture feed closed");
                            return None;
                        }
                    }
                }
                // Deliver whatever was queued before the stop request
                while let Ok(event) = receiver.try_recv() {
                    sink.on_key_event(&event);
                }
                Some(receiver)
            })?;

        self.worker = Some(Worker {
            stop: stop_tx,
            handle,
        });
        Ok(())
    }

    fn uninstall(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop.send(());
            if let Ok(receiver) = worker.handle.join() {
                self.receiver = receiver;
            }
        }
    }

    /// False once the sender side is dropped and the worker has exited
    fn is_installed(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.handle.is_finished())
    }
}

impl Drop for ChannelCapture {
    fn drop(&mut self) {
        self.uninstall();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::test_helpers::{key_down, key_down_with};
    use crate::keyboard::Modifiers;
    use device_query::Keycode as DK;

    fn active_sink() -> KeySink {
        let estimator = Arc::new(RateEstimator::default());
        estimator.start();
        KeySink::new(InputClassifier::new(), estimator)
    }

    #[test]
    fn sink_counts_typing_keys() {
        let sink = active_sink();
        assert_eq!(sink.on_key_event(&key_down(KeyCode::A)), Passthrough::Counted);
        assert_eq!(sink.on_key_event(&key_down(KeyCode::SPACE)), Passthrough::Counted);
        assert_eq!(sink.accepted(), 2);
        assert_eq!(sink.estimator().pending(), 2);
    }

    #[test]
    fn sink_ignores_shortcuts_and_navigation() {
        let sink = active_sink();
        let shortcut = key_down_with(KeyCode::Z, Modifiers::command());
        assert_eq!(sink.on_key_event(&shortcut), Passthrough::Ignored);
        assert_eq!(sink.on_key_event(&key_down(KeyCode::UP_ARROW)), Passthrough::Ignored);
        assert_eq!(sink.accepted(), 0);
        assert_eq!(sink.rejected(), 2);
        assert_eq!(sink.estimator().pending(), 0);
    }

    #[test]
    fn sink_discards_while_idle() {
        let sink = KeySink::new(InputClassifier::new(), Arc::new(RateEstimator::default()));
        assert_eq!(sink.on_key_event(&key_down(KeyCode::A)), Passthrough::Ignored);
        assert_eq!(sink.on_key_event(&key_down(KeyCode::UP_ARROW)), Passthrough::Ignored);
        assert_eq!(sink.accepted(), 0);
        assert_eq!(sink.rejected(), 0);
    }

    #[test]
    fn sink_reset_counts() {
        let sink = active_sink();
        sink.on_key_event(&key_down(KeyCode::A));
        sink.reset_counts();
        assert_eq!(sink.accepted(), 0);
    }

    #[test]
    fn poller_emits_new_presses_only() {
        let sink = active_sink();
        let mut poller = KeyPoller::default();
        let now = Instant::now();

        assert_eq!(poller.poll(&[DK::A], now, &sink), 1);
        // Still held: no new event
        assert_eq!(poller.poll(&[DK::A], now, &sink), 0);
        assert_eq!(poller.poll(&[DK::A, DK::S], now, &sink), 1);
        assert_eq!(poller.poll(&[], now, &sink), 0);
        assert_eq!(sink.accepted(), 2);
    }

    #[test]
    fn poller_applies_held_modifiers() {
        let sink = active_sink();
        let mut poller = KeyPoller::default();
        let now = Instant::now();

        poller.poll(&[DK::LControl], now, &sink);
        poller.poll(&[DK::LControl, DK::C], now, &sink);
        assert_eq!(sink.accepted(), 0);
        assert_eq!(sink.rejected(), 1);

        poller.poll(&[], now, &sink);
        poller.poll(&[DK::LShift, DK::C], now, &sink);
        assert_eq!(sink.accepted(), 1);
    }

    #[test]
    fn device_query_reports_unreachable_backend() {
        let mut capture = DeviceQueryCapture::with_opener(Duration::from_millis(1), || None);

        let err = capture.install(active_sink()).unwrap_err();
        assert!(matches!(err, CaptureError::Unavailable(_)));
        assert!(!capture.is_installed());

        // A failed install leaves the source ready for another attempt
        assert!(matches!(
            capture.install(active_sink()),
            Err(CaptureError::Unavailable(_))
        ));
    }

    #[test]
    fn channel_capture_forwards_and_drains() {
        let sink = active_sink();
        let (tx, mut capture) = ChannelCapture::pair();
        capture.install(sink.clone()).unwrap();
        assert!(capture.is_installed());

        for _ in 0..5 {
            tx.send(key_down(KeyCode::A)).unwrap();
        }
        capture.uninstall();

        assert!(!capture.is_installed());
        assert_eq!(sink.accepted(), 5);
    }

    #[test]
    fn channel_capture_not_installed_after_sender_drops() {
        let sink = active_sink();
        let (tx, mut capture) = ChannelCapture::pair();
        capture.install(sink.clone()).unwrap();

        tx.send(key_down(KeyCode::A)).unwrap();
        drop(tx);

        let deadline = Instant::now() + Duration::from_secs(2);
        while capture.is_installed() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!capture.is_installed());
        assert_eq!(sink.accepted(), 1);

        // The feed is gone for good
        assert!(matches!(
            capture.install(sink),
            Err(CaptureError::Disconnected)
        ));
    }

    #[test]
    fn channel_capture_can_reinstall() {
        let sink = active_sink();
        let (tx, mut capture) = ChannelCapture::pair();
        capture.install(sink.clone()).unwrap();
        capture.uninstall();

        capture.install(sink.clone()).unwrap();
        tx.send(key_down(KeyCode::S)).unwrap();
        capture.uninstall();
        assert_eq!(sink.accepted(), 1);
    }

    #[test]
    fn channel_capture_rejects_double_install() {
        let sink = active_sink();
        let (_tx, mut capture) = ChannelCapture::pair();
        capture.install(sink.clone()).unwrap();
        assert!(matches!(
            capture.install(sink),
            Err(CaptureError::AlreadyInstalled)
        ));
    }
}
