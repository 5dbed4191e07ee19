use crate::config::CursorMode;
use crate::dispatch::Dispatcher;
use crate::keycode::Keycode;
use crate::mouse::MouseButton;
use crate::state;

pub const DESTROY: u32 = 0x0002;
pub const MOVE: u32 = 0x0003;
pub const SIZE: u32 = 0x0005;
pub const ACTIVATE: u32 = 0x0006;
pub const SET_FOCUS: u32 = 0x0007;
pub const KILL_FOCUS: u32 = 0x0008;
pub const CLOSE: u32 = 0x0010;
pub const KEY_DOWN: u32 = 0x0100;
pub const KEY_UP: u32 = 0x0101;
pub const CHAR: u32 = 0x0102;
pub const SYS_KEY_DOWN: u32 = 0x0104;
pub const SYS_KEY_UP: u32 = 0x0105;
pub const MOUSE_MOVE: u32 = 0x0200;
pub const L_BUTTON_DOWN: u32 = 0x0201;
pub const L_BUTTON_UP: u32 = 0x0202;
pub const R_BUTTON_DOWN: u32 = 0x0204;
pub const R_BUTTON_UP: u32 = 0x0205;
pub const M_BUTTON_DOWN: u32 = 0x0207;
pub const M_BUTTON_UP: u32 = 0x0208;
pub const MOUSE_WHEEL: u32 = 0x020a;
pub const X_BUTTON_DOWN: u32 = 0x020b;
pub const X_BUTTON_UP: u32 = 0x020c;
pub const MOUSE_H_WHEEL: u32 = 0x020e;

//wParam of SIZE and ACTIVATE
const SIZE_MINIMIZED: usize = 1;
const WA_INACTIVE: u16 = 0;

//lParam of key messages
const PREVIOUS_STATE_BIT: isize = 1 << 30;
const REPEAT_COUNT_MASK: isize = 0xffff;

fn lo_word(bits: usize) -> u16 {
    (bits & 0xffff) as u16
}

fn hi_word(bits: usize) -> u16 {
    ((bits >> 16) & 0xffff) as u16
}

fn x_button(w_param: usize) -> MouseButton {
    match hi_word(w_param) {
        1 => MouseButton::Back,
        2 => MouseButton::Forward,
        other => MouseButton::Other(other.min(u8::MAX as u16) as u8),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clip {
    Apply,
    Release,
}

//the clip rectangle is dropped on focus loss and goes stale on moves and resizes
pub fn clip_action(cursor_mode: CursorMode, message: u32, w_param: usize) -> Option<Clip> {
    if cursor_mode != CursorMode::Captured {
        return None;
    }

    match message {
        SIZE if w_param == SIZE_MINIMIZED => Some(Clip::Release),
        SIZE | MOVE | SET_FOCUS => Some(Clip::Apply),
        ACTIVATE if lo_word(w_param) == WA_INACTIVE => Some(Clip::Release),
        ACTIVATE => Some(Clip::Apply),
        KILL_FOCUS => Some(Clip::Release),
        _ => None,
    }
}

//turns window messages into dispatcher calls,
//holding the first half of a surrogate pair between CHAR messages
#[derive(Debug, Default)]
pub struct Translator {
    high_surrogate: Option<u16>,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    //None hands the message to the default window procedure
    pub fn translate(
        &mut self,
        dispatcher: &mut Dispatcher,
        message: u32,
        w_param: usize,
        l_param: isize,
    ) -> Option<isize> {
        match message {
            DESTROY => {
                dispatcher.closed();
                Some(0)
            }
            //only flags it, the caller decides when to tear down
            CLOSE => {
                dispatcher.close_requested();
                Some(0)
            }
            SIZE => {
                dispatcher.resized(lo_word(l_param as usize), hi_word(l_param as usize));
                Some(0)
            }
            MOUSE_MOVE => {
                let x = lo_word(l_param as usize) as i16 as i32;
                let y = hi_word(l_param as usize) as i16 as i32;
                dispatcher.mouse_moved_dedup(state::clamp_coordinate(x), state::clamp_coordinate(y));
                Some(0)
            }
            L_BUTTON_DOWN => {
                dispatcher.mouse_pressed(MouseButton::Left);
                Some(0)
            }
            M_BUTTON_DOWN => {
                dispatcher.mouse_pressed(MouseButton::Middle);
                Some(0)
            }
            R_BUTTON_DOWN => {
                dispatcher.mouse_pressed(MouseButton::Right);
                Some(0)
            }
            L_BUTTON_UP => {
                dispatcher.mouse_released(MouseButton::Left);
                Some(0)
            }
            M_BUTTON_UP => {
                dispatcher.mouse_released(MouseButton::Middle);
                Some(0)
            }
            R_BUTTON_UP => {
                dispatcher.mouse_released(MouseButton::Right);
                Some(0)
            }
            //x button messages expect TRUE back
            X_BUTTON_DOWN => {
                dispatcher.mouse_pressed(x_button(w_param));
                Some(1)
            }
            X_BUTTON_UP => {
                dispatcher.mouse_released(x_button(w_param));
                Some(1)
            }
            MOUSE_WHEEL => {
                dispatcher.wheel(hi_word(w_param) as i16, true);
                Some(0)
            }
            MOUSE_H_WHEEL => {
                dispatcher.wheel(hi_word(w_param) as i16, false);
                Some(0)
            }
            KEY_DOWN | SYS_KEY_DOWN => {
                dispatcher.key_pressed(
                    Keycode::from_virtual_key(w_param as u32),
                    l_param & PREVIOUS_STATE_BIT != 0,
                    (l_param & REPEAT_COUNT_MASK) as u16,
                );
                //alt+f4 and friends still need the default handling
                if message == SYS_KEY_DOWN {
                    None
                } else {
                    Some(0)
                }
            }
            KEY_UP | SYS_KEY_UP => {
                dispatcher.key_released(Keycode::from_virtual_key(w_param as u32));
                if message == SYS_KEY_UP {
                    None
                } else {
                    Some(0)
                }
            }
            CHAR => {
                if let Some(c) = self.decode_char(w_param as u16) {
                    dispatcher.char_typed(c);
                }
                Some(0)
            }
            _ => None,
        }
    }

    fn decode_char(&mut self, unit: u16) -> Option<char> {
        match unit {
            0xd800..=0xdbff => {
                self.high_surrogate = Some(unit);
                None
            }
            0xdc00..=0xdfff => {
                let high = self.high_surrogate.take()?;
                char::decode_utf16([high, unit]).next()?.ok()
            }
            unit => {
                self.high_surrogate = None;
                char::from_u32(unit as u32)
            }
        }
    }
}
