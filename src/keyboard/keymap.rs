//! Key code definitions and translation from native capture codes
//!
//! All classification happens in a single code space: the virtual key codes of
//! the ANSI base layout (`kVK_*`). Capture backends translate their native
//! codes (Linux evdev scancodes, `device_query` keycodes) into it.

/// A virtual key code on the ANSI base layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub const A: KeyCode = KeyCode(0);
    pub const S: KeyCode = KeyCode(1);
    pub const Z: KeyCode = KeyCode(6);
    pub const ISO_SECTION: KeyCode = KeyCode(10);
    pub const Q: KeyCode = KeyCode(12);
    pub const RETURN: KeyCode = KeyCode(36);
    pub const TAB: KeyCode = KeyCode(48);
    pub const SPACE: KeyCode = KeyCode(49);
    pub const GRAVE: KeyCode = KeyCode(50);
    pub const DELETE: KeyCode = KeyCode(51);
    pub const ESCAPE: KeyCode = KeyCode(53);
    pub const RIGHT_COMMAND: KeyCode = KeyCode(54);
    pub const COMMAND: KeyCode = KeyCode(55);
    pub const SHIFT: KeyCode = KeyCode(56);
    pub const CAPS_LOCK: KeyCode = KeyCode(57);
    pub const OPTION: KeyCode = KeyCode(58);
    pub const CONTROL: KeyCode = KeyCode(59);
    pub const RIGHT_SHIFT: KeyCode = KeyCode(60);
    pub const RIGHT_OPTION: KeyCode = KeyCode(61);
    pub const RIGHT_CONTROL: KeyCode = KeyCode(62);
    pub const FUNCTION: KeyCode = KeyCode(63);
    pub const KEYPAD_CLEAR: KeyCode = KeyCode(71);
    pub const F5: KeyCode = KeyCode(96);
    pub const F1: KeyCode = KeyCode(122);
    pub const F12: KeyCode = KeyCode(111);
    pub const HELP: KeyCode = KeyCode(114);
    pub const HOME: KeyCode = KeyCode(115);
    pub const PAGE_UP: KeyCode = KeyCode(116);
    pub const FORWARD_DELETE: KeyCode = KeyCode(117);
    pub const END: KeyCode = KeyCode(119);
    pub const PAGE_DOWN: KeyCode = KeyCode(121);
    pub const LEFT_ARROW: KeyCode = KeyCode(123);
    pub const RIGHT_ARROW: KeyCode = KeyCode(124);
    pub const DOWN_ARROW: KeyCode = KeyCode(125);
    pub const UP_ARROW: KeyCode = KeyCode(126);

    /// Translate a Linux evdev scancode into the virtual key code space.
    ///
    /// Returns `None` for scancodes with no counterpart on the base layout.
    pub fn from_scancode(scancode: u16) -> Option<Self> {
        let code = match scancode {
            1 => 53,   // Esc
            2 => 18,   // 1
            3 => 19,   // 2
            4 => 20,   // 3
            5 => 21,   // 4
            6 => 23,   // 5
            7 => 22,   // 6
            8 => 26,   // 7
            9 => 28,   // 8
            10 => 25,  // 9
            11 => 29,  // 0
            12 => 27,  // Minus
            13 => 24,  // Equal
            14 => 51,  // Backspace
            15 => 48,  // Tab
            16 => 12,  // Q
            17 => 13,  // W
            18 => 14,  // E
            19 => 15,  // R
            20 => 17,  // T
            21 => 16,  // Y
            22 => 32,  // U
            23 => 34,  // I
            24 => 31,  // O
            25 => 35,  // P
            26 => 33,  // [
            27 => 30,  // ]
            28 => 36,  // Enter
            29 => 59,  // LCtrl
            30 => 0,   // A
            31 => 1,   // S
            32 => 2,   // D
            33 => 3,   // F
            34 => 5,   // G
            35 => 4,   // H
            36 => 38,  // J
            37 => 40,  // K
            38 => 37,  // L
            39 => 41,  // ;
            40 => 39,  // '
            41 => 50,  // `
            42 => 56,  // LShift
            43 => 42,  // Backslash
            44 => 6,   // Z
            45 => 7,   // X
            46 => 8,   // C
            47 => 9,   // V
            48 => 11,  // B
            49 => 45,  // N
            50 => 46,  // M
            51 => 43,  // ,
            52 => 47,  // .
            53 => 44,  // /
            54 => 60,  // RShift
            55 => 67,  // Keypad *
            56 => 58,  // LAlt
            57 => 49,  // Space
            58 => 57,  // CapsLock
            59 => 122, // F1
            60 => 120, // F2
            61 => 99,  // F3
            62 => 118, // F4
            63 => 96,  // F5
            64 => 97,  // F6
            65 => 98,  // F7
            66 => 100, // F8
            67 => 101, // F9
            68 => 109, // F10
            69 => 71,  // NumLock
            71 => 89,  // Keypad 7
            72 => 91,  // Keypad 8
            73 => 92,  // Keypad 9
            74 => 78,  // Keypad -
            75 => 86,  // Keypad 4
            76 => 87,  // Keypad 5
            77 => 88,  // Keypad 6
            78 => 69,  // Keypad +
            79 => 83,  // Keypad 1
            80 => 84,  // Keypad 2
            81 => 85,  // Keypad 3
            82 => 82,  // Keypad 0
            83 => 65,  // Keypad .
            86 => 10,  // 102nd key (ISO)
            87 => 103, // F11
            88 => 111, // F12
            96 => 76,  // Keypad Enter
            97 => 62,  // RCtrl
            98 => 75,  // Keypad /
            100 => 61, // RAlt
            102 => 115, // Home
            103 => 126, // Up
            104 => 116, // PageUp
            105 => 123, // Left
            106 => 124, // Right
            107 => 119, // End
            108 => 125, // Down
            109 => 121, // PageDown
            110 => 114, // Insert
            111 => 117, // Delete
            125 => 55, // LMeta
            126 => 54, // RMeta
            _ => return None,
        };
        Some(Self(code))
    }
}

/// Map a `device_query` keycode to its Linux evdev scancode.
///
/// The scancode is the common currency between capture backends: it feeds
/// both [`KeyCode::from_scancode`] and modifier tracking.
pub fn scancode_for(keycode: device_query::Keycode) -> Option<u16> {
    use device_query::Keycode as DK;
    let code = match keycode {
        DK::Escape => 1,
        DK::Key1 => 2,
        DK::Key2 => 3,
        DK::Key3 => 4,
        DK::Key4 => 5,
        DK::Key5 => 6,
        DK::Key6 => 7,
        DK::Key7 => 8,
        DK::Key8 => 9,
        DK::Key9 => 10,
        DK::Key0 => 11,
        DK::Minus => 12,
        DK::Equal => 13,
        DK::Backspace => 14,
        DK::Tab => 15,
        DK::Q => 16,
        DK::W => 17,
        DK::E => 18,
        DK::R => 19,
        DK::T => 20,
        DK::Y => 21,
        DK::U => 22,
        DK::I => 23,
        DK::O => 24,
        DK::P => 25,
        DK::LeftBracket => 26,
        DK::RightBracket => 27,
        DK::Enter => 28,
        DK::LControl => 29,
        DK::A => 30,
        DK::S => 31,
        DK::D => 32,
        DK::F => 33,
        DK::G => 34,
        DK::H => 35,
        DK::J => 36,
        DK::K => 37,
        DK::L => 38,
        DK::Semicolon => 39,
        DK::Apostrophe => 40,
        DK::Grave => 41,
        DK::LShift => 42,
        DK::BackSlash => 43,
        DK::Z => 44,
        DK::X => 45,
        DK::C => 46,
        DK::V => 47,
        DK::B => 48,
        DK::N => 49,
        DK::M => 50,
        DK::Comma => 51,
        DK::Dot => 52,
        DK::Slash => 53,
        DK::RShift => 54,
        DK::LAlt => 56,
        DK::Space => 57,
        DK::CapsLock => 58,
        DK::F1 => 59,
        DK::F2 => 60,
        DK::F3 => 61,
        DK::F4 => 62,
        DK::F5 => 63,
        DK::F6 => 64,
        DK::F7 => 65,
        DK::F8 => 66,
        DK::F9 => 67,
        DK::F10 => 68,
        DK::F11 => 87,
        DK::F12 => 88,
        DK::RControl => 97,
        DK::RAlt => 100,
        DK::Home => 102,
        DK::Up => 103,
        DK::PageUp => 104,
        DK::Left => 105,
        DK::Right => 106,
        DK::End => 107,
        DK::Down => 108,
        DK::PageDown => 109,
        DK::Insert => 110,
        DK::Delete => 111,
        DK::LMeta => 125,
        DK::RMeta => 126,
        DK::Numpad0 => 82,
        DK::Numpad1 => 79,
        DK::Numpad2 => 80,
        DK::Numpad3 => 81,
        DK::Numpad4 => 75,
        DK::Numpad5 => 76,
        DK::Numpad6 => 77,
        DK::Numpad7 => 71,
        DK::Numpad8 => 72,
        DK::Numpad9 => 73,
        DK::NumpadSubtract => 74,
        DK::NumpadAdd => 78,
        DK::NumpadDivide => 98,
        DK::NumpadMultiply => 55,
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_translate_to_base_layout() {
        assert_eq!(KeyCode::from_scancode(30), Some(KeyCode::A));
        assert_eq!(KeyCode::from_scancode(31), Some(KeyCode::S));
        assert_eq!(KeyCode::from_scancode(44), Some(KeyCode::Z));
        assert_eq!(KeyCode::from_scancode(16), Some(KeyCode::Q));
    }

    #[test]
    fn space_and_control_keys_translate() {
        assert_eq!(KeyCode::from_scancode(57), Some(KeyCode::SPACE));
        assert_eq!(KeyCode::from_scancode(28), Some(KeyCode::RETURN));
        assert_eq!(KeyCode::from_scancode(1), Some(KeyCode::ESCAPE));
        assert_eq!(KeyCode::from_scancode(103), Some(KeyCode::UP_ARROW));
        assert_eq!(KeyCode::from_scancode(59), Some(KeyCode::F1));
    }

    #[test]
    fn iso_section_key_translates() {
        // 102nd key, left of Z on ISO boards
        assert_eq!(KeyCode::from_scancode(86), Some(KeyCode::ISO_SECTION));
    }

    #[test]
    fn unknown_scancode_has_no_key() {
        assert_eq!(KeyCode::from_scancode(0), None);
        assert_eq!(KeyCode::from_scancode(240), None);
    }

    #[test]
    fn device_query_keys_route_through_scancodes() {
        use device_query::Keycode as DK;
        let to_key = |k| scancode_for(k).and_then(KeyCode::from_scancode);
        assert_eq!(to_key(DK::A), Some(KeyCode::A));
        assert_eq!(to_key(DK::Space), Some(KeyCode::SPACE));
        assert_eq!(to_key(DK::LMeta), Some(KeyCode::COMMAND));
        assert_eq!(to_key(DK::Left), Some(KeyCode::LEFT_ARROW));
    }
}
