//! Platform independent key codes.
//!
//! Windows reports virtual-key codes and X reports keysyms; both are mapped
//! onto [`Keycode`] through one table so the two directions never disagree.
//! Codes without an entry survive as [`Keycode::Unknown`] carrying the raw
//! native value.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keycode {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Space,
    Enter,
    Escape,
    Backspace,
    Tab,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Left,
    Right,
    Up,
    Down,
    Shift,
    Control,
    Alt,
    Super,
    CapsLock,
    Minus,
    Equals,
    LeftBracket,
    RightBracket,
    Backslash,
    Semicolon,
    Apostrophe,
    Comma,
    Period,
    Slash,
    Grave,
    Unknown(u32),
}

// (key, windows virtual-key, x keysym)
// modifiers use the generic virtual key and the left hand keysym
const TABLE: &[(Keycode, u32, u64)] = &[
    (Keycode::A, 0x41, 0x0061),
    (Keycode::B, 0x42, 0x0062),
    (Keycode::C, 0x43, 0x0063),
    (Keycode::D, 0x44, 0x0064),
    (Keycode::E, 0x45, 0x0065),
    (Keycode::F, 0x46, 0x0066),
    (Keycode::G, 0x47, 0x0067),
    (Keycode::H, 0x48, 0x0068),
    (Keycode::I, 0x49, 0x0069),
    (Keycode::J, 0x4a, 0x006a),
    (Keycode::K, 0x4b, 0x006b),
    (Keycode::L, 0x4c, 0x006c),
    (Keycode::M, 0x4d, 0x006d),
    (Keycode::N, 0x4e, 0x006e),
    (Keycode::O, 0x4f, 0x006f),
    (Keycode::P, 0x50, 0x0070),
    (Keycode::Q, 0x51, 0x0071),
    (Keycode::R, 0x52, 0x0072),
    (Keycode::S, 0x53, 0x0073),
    (Keycode::T, 0x54, 0x0074),
    (Keycode::U, 0x55, 0x0075),
    (Keycode::V, 0x56, 0x0076),
    (Keycode::W, 0x57, 0x0077),
    (Keycode::X, 0x58, 0x0078),
    (Keycode::Y, 0x59, 0x0079),
    (Keycode::Z, 0x5a, 0x007a),
    (Keycode::Num0, 0x30, 0x0030),
    (Keycode::Num1, 0x31, 0x0031),
    (Keycode::Num2, 0x32, 0x0032),
    (Keycode::Num3, 0x33, 0x0033),
    (Keycode::Num4, 0x34, 0x0034),
    (Keycode::Num5, 0x35, 0x0035),
    (Keycode::Num6, 0x36, 0x0036),
    (Keycode::Num7, 0x37, 0x0037),
    (Keycode::Num8, 0x38, 0x0038),
    (Keycode::Num9, 0x39, 0x0039),
    (Keycode::F1, 0x70, 0xffbe),
    (Keycode::F2, 0x71, 0xffbf),
    (Keycode::F3, 0x72, 0xffc0),
    (Keycode::F4, 0x73, 0xffc1),
    (Keycode::F5, 0x74, 0xffc2),
    (Keycode::F6, 0x75, 0xffc3),
    (Keycode::F7, 0x76, 0xffc4),
    (Keycode::F8, 0x77, 0xffc5),
    (Keycode::F9, 0x78, 0xffc6),
    (Keycode::F10, 0x79, 0xffc7),
    (Keycode::F11, 0x7a, 0xffc8),
    (Keycode::F12, 0x7b, 0xffc9),
    (Keycode::Space, 0x20, 0x0020),
    (Keycode::Enter, 0x0d, 0xff0d),
    (Keycode::Escape, 0x1b, 0xff1b),
    (Keycode::Backspace, 0x08, 0xff08),
    (Keycode::Tab, 0x09, 0xff09),
    (Keycode::Delete, 0x2e, 0xffff),
    (Keycode::Insert, 0x2d, 0xff63),
    (Keycode::Home, 0x24, 0xff50),
    (Keycode::End, 0x23, 0xff57),
    (Keycode::PageUp, 0x21, 0xff55),
    (Keycode::PageDown, 0x22, 0xff56),
    (Keycode::Left, 0x25, 0xff51),
    (Keycode::Up, 0x26, 0xff52),
    (Keycode::Right, 0x27, 0xff53),
    (Keycode::Down, 0x28, 0xff54),
    (Keycode::Shift, 0x10, 0xffe1),
    (Keycode::Control, 0x11, 0xffe3),
    (Keycode::Alt, 0x12, 0xffe9),
    (Keycode::Super, 0x5b, 0xffeb),
    (Keycode::CapsLock, 0x14, 0xffe5),
    (Keycode::Minus, 0xbd, 0x002d),
    (Keycode::Equals, 0xbb, 0x003d),
    (Keycode::LeftBracket, 0xdb, 0x005b),
    (Keycode::RightBracket, 0xdd, 0x005d),
    (Keycode::Backslash, 0xdc, 0x005c),
    (Keycode::Semicolon, 0xba, 0x003b),
    (Keycode::Apostrophe, 0xde, 0x0027),
    (Keycode::Comma, 0xbc, 0x002c),
    (Keycode::Period, 0xbe, 0x002e),
    (Keycode::Slash, 0xbf, 0x002f),
    (Keycode::Grave, 0xc0, 0x0060),
];

impl Keycode {
    pub fn from_virtual_key(vk: u32) -> Self {
        let vk = match vk {
            0xa0 | 0xa1 => 0x10,
            0xa2 | 0xa3 => 0x11,
            0xa4 | 0xa5 => 0x12,
            0x5c => 0x5b,
            vk => vk,
        };

        TABLE
            .iter()
            .find(|(_, native, _)| *native == vk)
            .map_or(Keycode::Unknown(vk), |(key, _, _)| *key)
    }

    pub fn virtual_key(self) -> Option<u32> {
        match self {
            Keycode::Unknown(vk) => Some(vk),
            key => TABLE
                .iter()
                .find(|(k, _, _)| *k == key)
                .map(|(_, vk, _)| *vk),
        }
    }

    pub fn from_keysym(keysym: u64) -> Self {
        let keysym = match keysym {
            0xffe2 => 0xffe1,
            0xffe4 => 0xffe3,
            0xffea | 0xffe7 | 0xffe8 => 0xffe9,
            0xffec => 0xffeb,
            0xff8d => 0xff0d,
            //shift+tab
            0xfe20 => 0xff09,
            keysym => keysym,
        };

        TABLE
            .iter()
            .find(|(_, _, native)| *native == keysym)
            .map_or(Keycode::Unknown(keysym as u32), |(key, _, _)| *key)
    }

    pub fn keysym(self) -> Option<u64> {
        match self {
            Keycode::Unknown(keysym) => Some(keysym as u64),
            key => TABLE
                .iter()
                .find(|(k, _, _)| *k == key)
                .map(|(_, _, keysym)| *keysym),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entry_maps_back_to_itself() {
        for &(key, vk, keysym) in TABLE {
            assert_eq!(Keycode::from_virtual_key(vk), key);
            assert_eq!(Keycode::from_keysym(keysym), key);
            assert_eq!(key.virtual_key(), Some(vk));
            assert_eq!(key.keysym(), Some(keysym));
        }
    }

    #[test]
    fn table_has_no_duplicates() {
        for (i, a) in TABLE.iter().enumerate() {
            for b in &TABLE[i + 1..] {
                assert_ne!(a.0, b.0);
                assert_ne!(a.1, b.1);
                assert_ne!(a.2, b.2);
            }
        }
    }

    #[test]
    fn sided_modifiers_collapse() {
        assert_eq!(Keycode::from_virtual_key(0xa1), Keycode::Shift);
        assert_eq!(Keycode::from_virtual_key(0xa3), Keycode::Control);
        assert_eq!(Keycode::from_keysym(0xffe2), Keycode::Shift);
        assert_eq!(Keycode::from_keysym(0xffea), Keycode::Alt);
        assert_eq!(Keycode::from_keysym(0xfe20), Keycode::Tab);
    }

    #[test]
    fn unknown_keeps_raw_code() {
        assert_eq!(Keycode::from_virtual_key(0xff), Keycode::Unknown(0xff));
        assert_eq!(Keycode::from_keysym(0x21), Keycode::Unknown(0x21));
        assert_eq!(Keycode::Unknown(0x21).keysym(), Some(0x21));
    }
}
