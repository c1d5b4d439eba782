//! Typing keystroke classification
//!
//! Decides whether a key-down counts toward the typing rate. The classifier
//! only observes: capture sources forward every event regardless of the
//! verdict.

use super::{KeyCode, KeyEvent, Modifiers};

/// Highest code of the contiguous alphanumeric/punctuation block on the base layout
const TYPING_RANGE_END: u16 = 50;

/// Codes removed from the seeded range, or never typing keys at all
const NON_TYPING_KEYS: &[u16] = &[
    // Modifier keys
    54, 55, 56, 57, 58, 59, 60, 61, 62, 63,
    // Function keys
    122, 120, 99, 118, 96, 97, 98, 100, 101, 109, 103, 111, 105, 107, 113, 106, 64, 79, 80, 90,
    // Arrow keys
    123, 124, 125, 126,
    // Escape, delete, forward delete, return, tab
    53, 51, 117, 36, 48,
    // Keypad clear, help, home, end, page up, page down
    71, 114, 115, 119, 116, 121,
];

/// Immutable set of key codes that count as typing input
///
/// Stored as a bitmap so membership is a shift and a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingKeySet {
    bits: u128,
}

impl TypingKeySet {
    /// Build the set for the ANSI base layout
    pub fn standard() -> Self {
        let mut set = Self { bits: 0 };
        for code in 0..=TYPING_RANGE_END {
            set.insert(code);
        }
        for &code in NON_TYPING_KEYS {
            set.remove(code);
        }
        // Space is always a typing key
        set.insert(KeyCode::SPACE.0);
        set
    }

    fn insert(&mut self, code: u16) {
        if code < 128 {
            self.bits |= 1u128 << code;
        }
    }

    fn remove(&mut self, code: u16) {
        if code < 128 {
            self.bits &= !(1u128 << code);
        }
    }

    pub fn contains(&self, code: KeyCode) -> bool {
        code.0 < 128 && self.bits & (1u128 << code.0) != 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl Default for TypingKeySet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Accepts typing keystrokes and rejects everything else
///
/// A key is accepted when it is in the [`TypingKeySet`] and no shortcut
/// modifier (Command, Control, Option) is held. Shift is allowed.
#[derive(Debug, Clone, Default)]
pub struct InputClassifier {
    keys: TypingKeySet,
}

impl InputClassifier {
    pub fn new() -> Self {
        Self {
            keys: TypingKeySet::standard(),
        }
    }

    /// Decide whether a key with the given modifiers counts as typing
    pub fn accepts(&self, code: KeyCode, modifiers: Modifiers) -> bool {
        self.keys.contains(code) && !modifiers.has_shortcut()
    }

    pub fn accepts_event(&self, event: &KeyEvent) -> bool {
        self.accepts(event.code, event.modifiers)
    }
}
