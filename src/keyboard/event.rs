//! Keyboard event types and modifier tracking

use super::KeyCode;
use std::time::Instant;

/// Modifier keys held while a key went down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub command: bool,
    pub control: bool,
    pub option: bool,
    pub shift: bool,
    pub function: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        command: false,
        control: false,
        option: false,
        shift: false,
        function: false,
    };

    pub fn command() -> Self {
        Self { command: true, ..Self::NONE }
    }

    pub fn control() -> Self {
        Self { control: true, ..Self::NONE }
    }

    pub fn option() -> Self {
        Self { option: true, ..Self::NONE }
    }

    pub fn shift() -> Self {
        Self { shift: true, ..Self::NONE }
    }

    /// True if a modifier that turns a keystroke into a shortcut is held
    /// (Command, Control or Option). Shift and Fn do not count.
    pub fn has_shortcut(&self) -> bool {
        self.command || self.control || self.option
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// A key-down observed by a capture source
#[derive(Debug, Clone)]
pub struct KeyEvent {
    /// Virtual key code
    pub code: KeyCode,
    /// Modifiers held when the key went down
    pub modifiers: Modifiers,
    /// When the event was observed
    pub timestamp: Instant,
}

impl KeyEvent {
    pub fn new(code: KeyCode, modifiers: Modifiers, timestamp: Instant) -> Self {
        Self {
            code,
            modifiers,
            timestamp,
        }
    }
}

/// Tracks which modifier keys are held, keyed by evdev scancode
///
/// Both capture backends see individual press/release transitions rather than
/// modifier flags, so the flags are rebuilt from left/right key state.
#[derive(Debug, Clone, Default)]
pub struct ModifierTracker {
    left_ctrl: bool,
    right_ctrl: bool,
    left_alt: bool,
    right_alt: bool,
    left_shift: bool,
    right_shift: bool,
    left_meta: bool,
    right_meta: bool,
}

impl ModifierTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a scancode belongs to a modifier key
    pub fn is_modifier(scancode: u16) -> bool {
        matches!(scancode, 29 | 97 | 56 | 100 | 42 | 54 | 125 | 126)
    }

    /// Update held state; returns true if the scancode was a modifier
    pub fn update(&mut self, scancode: u16, pressed: bool) -> bool {
        let slot = match scancode {
            29 => &mut self.left_ctrl,
            97 => &mut self.right_ctrl,
            56 => &mut self.left_alt,
            100 => &mut self.right_alt,
            42 => &mut self.left_shift,
            54 => &mut self.right_shift,
            125 => &mut self.left_meta,
            126 => &mut self.right_meta,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    /// Current modifier flags
    pub fn modifiers(&self) -> Modifiers {
        Modifiers {
            command: self.left_meta || self.right_meta,
            control: self.left_ctrl || self.right_ctrl,
            option: self.left_alt || self.right_alt,
            shift: self.left_shift || self.right_shift,
            function: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_is_not_a_shortcut() {
        assert!(!Modifiers::shift().has_shortcut());
        assert!(!Modifiers::NONE.has_shortcut());
    }

    #[test]
    fn command_control_option_are_shortcuts() {
        assert!(Modifiers::command().has_shortcut());
        assert!(Modifiers::control().has_shortcut());
        assert!(Modifiers::option().has_shortcut());
    }

    #[test]
    fn tracker_combines_left_and_right() {
        let mut tracker = ModifierTracker::new();
        assert!(tracker.update(29, true));
        assert!(tracker.update(97, true));
        assert!(tracker.modifiers().control);

        tracker.update(29, false);
        assert!(tracker.modifiers().control, "right ctrl still held");

        tracker.update(97, false);
        assert!(tracker.modifiers().is_empty());
    }

    #[test]
    fn tracker_maps_meta_to_command() {
        let mut tracker = ModifierTracker::new();
        tracker.update(125, true);
        assert_eq!(tracker.modifiers(), Modifiers::command());
    }

    #[test]
    fn tracker_ignores_regular_keys() {
        let mut tracker = ModifierTracker::new();
        assert!(!tracker.update(30, true));
        assert!(!ModifierTracker::is_modifier(30));
        assert!(tracker.modifiers().is_empty());
    }

    #[test]
    fn tracker_reset_clears_everything() {
        let mut tracker = ModifierTracker::new();
        tracker.update(42, true);
        tracker.update(56, true);
        tracker.reset();
        assert!(tracker.modifiers().is_empty());
    }
}
