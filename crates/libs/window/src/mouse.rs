#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Back,
    Forward,
    Other(u8),
}

impl MouseButton {
    //x core protocol numbering, 4 to 7 are wheel steps and never reach here
    pub fn from_x11(button: u32) -> Self {
        match button {
            1 => MouseButton::Left,
            2 => MouseButton::Middle,
            3 => MouseButton::Right,
            8 => MouseButton::Back,
            9 => MouseButton::Forward,
            other => MouseButton::Other(other.min(u8::MAX as u32) as u8),
        }
    }
}

//wheel deltas arrive in units of 120 per notch and are reported in tenths
pub const SCROLL_DIVISOR: i16 = 12;
pub const SCROLL_LIMIT: i8 = 10;

pub fn scroll_magnitude(delta: i16) -> i8 {
    (delta / SCROLL_DIVISOR).clamp(-(SCROLL_LIMIT as i16), SCROLL_LIMIT as i16) as i8
}
