//! wpm-speedometer - live typing speed meter
//!
//! Observes global keyboard input, counts typing keystrokes, and keeps a
//! continuously updated words-per-minute estimate.
//!
//! ```
//! use std::sync::Arc;
//! use std::time::{Duration, Instant};
//! use wpm_speedometer::estimator::RateEstimator;
//! use wpm_speedometer::keyboard::{InputClassifier, KeyCode, KeyEvent, KeySink, Modifiers};
//!
//! let estimator = Arc::new(RateEstimator::default());
//! estimator.start();
//! let sink = KeySink::new(InputClassifier::new(), Arc::clone(&estimator));
//!
//! let base = Instant::now();
//! for i in 0..20 {
//!     let at = base + Duration::from_millis(i * 100);
//!     sink.on_key_event(&KeyEvent::new(KeyCode::A, Modifiers::NONE, at));
//! }
//! estimator.tick(base + Duration::from_secs(2));
//! assert_eq!(estimator.current_value().rounded(), 120);
//! ```

pub mod config;
pub mod error;
pub mod estimator;
pub mod keyboard;
pub mod monitor;
pub mod report;
pub mod telemetry;
pub mod ui;
pub mod utils;

pub use config::Config;
pub use estimator::{RateEstimator, RateMetric};
pub use monitor::Monitor;
