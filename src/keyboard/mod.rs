//! Keyboard event capture and classification

mod event;
pub mod capture;
pub mod classifier;
pub mod keymap;

#[cfg(target_os = "linux")]
pub mod evdev_listener;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use capture::{CaptureSource, ChannelCapture, DeviceQueryCapture, KeySink, Passthrough};
pub use classifier::{InputClassifier, TypingKeySet};
pub use event::{KeyEvent, ModifierTracker, Modifiers};
pub use keymap::KeyCode;

#[cfg(target_os = "linux")]
pub use evdev_listener::{evdev_status, find_keyboard_devices, EvdevCapture};
