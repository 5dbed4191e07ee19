//! One optional handler per event kind.
//!
//! An unset slot is always safe to fire: the notification is dropped.

use crate::error::WindowError;
use crate::keycode::Keycode;
use crate::mouse::MouseButton;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyPressed,
    KeyReleased,
    WindowResized,
    WindowClosed,
    MouseMoved,
    MousePressed,
    MouseReleased,
    MouseScrolled,
    CharTyped,
    Error,
}

pub type KeyPressedFn = Box<dyn FnMut(Keycode, bool, u16)>;
pub type KeyReleasedFn = Box<dyn FnMut(Keycode)>;
pub type WindowResizedFn = Box<dyn FnMut(u16, u16)>;
pub type WindowClosedFn = Box<dyn FnMut()>;
pub type MouseMovedFn = Box<dyn FnMut(u16, u16)>;
pub type MouseButtonFn = Box<dyn FnMut(MouseButton)>;
pub type MouseScrolledFn = Box<dyn FnMut(i8, bool)>;
pub type CharTypedFn = Box<dyn FnMut(char)>;
pub type ErrorFn = Box<dyn FnMut(&WindowError)>;

#[derive(Default)]
pub struct Callbacks {
    key_pressed: Option<KeyPressedFn>,
    key_released: Option<KeyReleasedFn>,
    window_resized: Option<WindowResizedFn>,
    window_closed: Option<WindowClosedFn>,
    mouse_moved: Option<MouseMovedFn>,
    mouse_pressed: Option<MouseButtonFn>,
    mouse_released: Option<MouseButtonFn>,
    mouse_scrolled: Option<MouseScrolledFn>,
    char_typed: Option<CharTypedFn>,
    error: Option<ErrorFn>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key_pressed(&mut self, f: impl FnMut(Keycode, bool, u16) + 'static) {
        self.key_pressed = Some(Box::new(f));
    }

    pub fn set_key_released(&mut self, f: impl FnMut(Keycode) + 'static) {
        self.key_released = Some(Box::new(f));
    }

    pub fn set_window_resized(&mut self, f: impl FnMut(u16, u16) + 'static) {
        self.window_resized = Some(Box::new(f));
    }

    pub fn set_window_closed(&mut self, f: impl FnMut() + 'static) {
        self.window_closed = Some(Box::new(f));
    }

    pub fn set_mouse_moved(&mut self, f: impl FnMut(u16, u16) + 'static) {
        self.mouse_moved = Some(Box::new(f));
    }

    pub fn set_mouse_pressed(&mut self, f: impl FnMut(MouseButton) + 'static) {
        self.mouse_pressed = Some(Box::new(f));
    }

    pub fn set_mouse_released(&mut self, f: impl FnMut(MouseButton) + 'static) {
        self.mouse_released = Some(Box::new(f));
    }

    pub fn set_mouse_scrolled(&mut self, f: impl FnMut(i8, bool) + 'static) {
        self.mouse_scrolled = Some(Box::new(f));
    }

    pub fn set_char_typed(&mut self, f: impl FnMut(char) + 'static) {
        self.char_typed = Some(Box::new(f));
    }

    pub fn set_error(&mut self, f: impl FnMut(&WindowError) + 'static) {
        self.error = Some(Box::new(f));
    }

    pub fn is_set(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::KeyPressed => self.key_pressed.is_some(),
            EventKind::KeyReleased => self.key_released.is_some(),
            EventKind::WindowResized => self.window_resized.is_some(),
            EventKind::WindowClosed => self.window_closed.is_some(),
            EventKind::MouseMoved => self.mouse_moved.is_some(),
            EventKind::MousePressed => self.mouse_pressed.is_some(),
            EventKind::MouseReleased => self.mouse_released.is_some(),
            EventKind::MouseScrolled => self.mouse_scrolled.is_some(),
            EventKind::CharTyped => self.char_typed.is_some(),
            EventKind::Error => self.error.is_some(),
        }
    }

    pub fn clear(&mut self, kind: EventKind) {
        match kind {
            EventKind::KeyPressed => self.key_pressed = None,
            EventKind::KeyReleased => self.key_released = None,
            EventKind::WindowResized => self.window_resized = None,
            EventKind::WindowClosed => self.window_closed = None,
            EventKind::MouseMoved => self.mouse_moved = None,
            EventKind::MousePressed => self.mouse_pressed = None,
            EventKind::MouseReleased => self.mouse_released = None,
            EventKind::MouseScrolled => self.mouse_scrolled = None,
            EventKind::CharTyped => self.char_typed = None,
            EventKind::Error => self.error = None,
        }
    }

    pub(crate) fn key_pressed(&mut self, key: Keycode, repeated: bool, count: u16) {
        if let Some(f) = self.key_pressed.as_mut() {
            f(key, repeated, count);
        }
    }

    pub(crate) fn key_released(&mut self, key: Keycode) {
        if let Some(f) = self.key_released.as_mut() {
            f(key);
        }
    }

    pub(crate) fn window_resized(&mut self, width: u16, height: u16) {
        if let Some(f) = self.window_resized.as_mut() {
            f(width, height);
        }
    }

    pub(crate) fn window_closed(&mut self) {
        if let Some(f) = self.window_closed.as_mut() {
            f();
        }
    }

    pub(crate) fn mouse_moved(&mut self, x: u16, y: u16) {
        if let Some(f) = self.mouse_moved.as_mut() {
            f(x, y);
        }
    }

    pub(crate) fn mouse_pressed(&mut self, button: MouseButton) {
        if let Some(f) = self.mouse_pressed.as_mut() {
            f(button);
        }
    }

    pub(crate) fn mouse_released(&mut self, button: MouseButton) {
        if let Some(f) = self.mouse_released.as_mut() {
            f(button);
        }
    }

    pub(crate) fn mouse_scrolled(&mut self, magnitude: i8, vertical: bool) {
        if let Some(f) = self.mouse_scrolled.as_mut() {
            f(magnitude, vertical);
        }
    }

    pub(crate) fn char_typed(&mut self, c: char) {
        if let Some(f) = self.char_typed.as_mut() {
            f(c);
        }
    }

    pub(crate) fn error(&mut self, error: &WindowError) {
        if let Some(f) = self.error.as_mut() {
            f(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn unset_slots_are_noops() {
        let mut callbacks = Callbacks::new();

        callbacks.key_pressed(Keycode::A, false, 0);
        callbacks.window_closed();
        callbacks.error(&WindowError::Connection("gone".into()));

        assert!(!callbacks.is_set(EventKind::KeyPressed));
    }

    #[test]
    fn setting_replaces_previous_handler() {
        let calls = Rc::new(RefCell::new(vec![]));
        let mut callbacks = Callbacks::new();

        let first = calls.clone();
        callbacks.set_char_typed(move |c| first.borrow_mut().push(('1', c)));
        let second = calls.clone();
        callbacks.set_char_typed(move |c| second.borrow_mut().push(('2', c)));

        callbacks.char_typed('x');

        assert_eq!(*calls.borrow(), vec![('2', 'x')]);
    }

    #[test]
    fn clear_unsets_one_kind() {
        let mut callbacks = Callbacks::new();
        callbacks.set_mouse_moved(|_, _| {});
        callbacks.set_mouse_pressed(|_| {});

        callbacks.clear(EventKind::MouseMoved);

        assert!(!callbacks.is_set(EventKind::MouseMoved));
        assert!(callbacks.is_set(EventKind::MousePressed));
    }
}
