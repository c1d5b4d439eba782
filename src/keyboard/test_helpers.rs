//! Shared test utilities for keyboard and estimator tests
//!
//! Provides common helper functions for creating key events.

use super::{KeyCode, KeyEvent, Modifiers};
use std::time::{Duration, Instant};

/// Creates a key-down with no modifiers, stamped now.
pub fn key_down(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, Modifiers::NONE, Instant::now())
}

/// Creates a key-down with the given modifiers, stamped now.
pub fn key_down_with(code: KeyCode, modifiers: Modifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers, Instant::now())
}

/// Creates a key-down `offset_ms` after `base`.
///
/// Useful for rate tests that need precise timing control.
pub fn key_down_at(code: KeyCode, base: Instant, offset_ms: u64) -> KeyEvent {
    KeyEvent::new(code, Modifiers::NONE, base + Duration::from_millis(offset_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_has_no_modifiers() {
        let event = key_down(KeyCode::A);
        assert_eq!(event.code, KeyCode::A);
        assert!(event.modifiers.is_empty());
    }

    #[test]
    fn key_down_at_offsets_timestamp() {
        let base = Instant::now();
        let event = key_down_at(KeyCode::SPACE, base, 250);
        assert_eq!(event.timestamp, base + Duration::from_millis(250));
    }
}
