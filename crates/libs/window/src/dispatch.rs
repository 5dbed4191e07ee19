//! The normalization both backends share.
//!
//! Backends decode native events and call into [`Dispatcher`], which updates
//! [`WindowState`] first and then fires the matching callback, so state stays
//! correct whether or not a handler is installed.

use crate::callback::Callbacks;
use crate::config::WindowConfig;
use crate::error::WindowError;
use crate::keycode::Keycode;
use crate::mouse::{self, MouseButton};
use crate::state::WindowState;

pub struct Dispatcher {
    pub state: WindowState,
    pub callbacks: Callbacks,
}

impl Dispatcher {
    pub fn new(config: &WindowConfig) -> Self {
        Self {
            state: WindowState::new(config),
            callbacks: Callbacks::new(),
        }
    }

    pub fn resized(&mut self, width: u16, height: u16) {
        if self.state.resize(width, height) {
            self.callbacks.window_resized(width, height);
        }
    }

    //some platforms report the same position more than once
    pub fn mouse_moved_dedup(&mut self, x: u16, y: u16) {
        if self.state.move_mouse(x, y) {
            self.callbacks.mouse_moved(x, y);
        }
    }

    pub fn mouse_moved(&mut self, x: u16, y: u16) {
        self.state.move_mouse(x, y);
        self.callbacks.mouse_moved(x, y);
    }

    pub fn mouse_pressed(&mut self, button: MouseButton) {
        self.callbacks.mouse_pressed(button);
    }

    pub fn mouse_released(&mut self, button: MouseButton) {
        self.callbacks.mouse_released(button);
    }

    //raw wheel delta in native units
    pub fn wheel(&mut self, delta: i16, vertical: bool) {
        self.scrolled(mouse::scroll_magnitude(delta), vertical);
    }

    pub fn scrolled(&mut self, magnitude: i8, vertical: bool) {
        let magnitude = magnitude.clamp(-mouse::SCROLL_LIMIT, mouse::SCROLL_LIMIT);
        self.callbacks.mouse_scrolled(magnitude, vertical);
    }

    pub fn key_pressed(&mut self, key: Keycode, repeated: bool, count: u16) {
        self.callbacks.key_pressed(key, repeated, count);
    }

    pub fn key_released(&mut self, key: Keycode) {
        self.callbacks.key_released(key);
    }

    pub fn char_typed(&mut self, c: char) {
        self.callbacks.char_typed(c);
    }

    pub fn close_requested(&mut self) {
        if !self.state.should_close() {
            log::info!("window close requested");
        }
        self.state.request_close();
    }

    pub fn closed(&mut self) {
        self.callbacks.window_closed();
    }

    pub fn error(&mut self, error: WindowError) {
        log::error!("{}", error);
        self.callbacks.error(&error);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Call {
        KeyPressed(Keycode, bool, u16),
        KeyReleased(Keycode),
        Resized(u16, u16),
        Closed,
        MouseMoved(u16, u16),
        MousePressed(MouseButton),
        MouseReleased(MouseButton),
        Scrolled(i8, bool),
        Char(char),
        Error(String),
    }

    //a dispatcher with every slot recording into the returned log
    pub(crate) fn recording(config: &WindowConfig) -> (Dispatcher, Rc<RefCell<Vec<Call>>>) {
        let log = Rc::new(RefCell::new(vec![]));
        let mut dispatcher = Dispatcher::new(config);
        let callbacks = &mut dispatcher.callbacks;

        let l = log.clone();
        callbacks.set_key_pressed(move |k, r, c| l.borrow_mut().push(Call::KeyPressed(k, r, c)));
        let l = log.clone();
        callbacks.set_key_released(move |k| l.borrow_mut().push(Call::KeyReleased(k)));
        let l = log.clone();
        callbacks.set_window_resized(move |w, h| l.borrow_mut().push(Call::Resized(w, h)));
        let l = log.clone();
        callbacks.set_window_closed(move || l.borrow_mut().push(Call::Closed));
        let l = log.clone();
        callbacks.set_mouse_moved(move |x, y| l.borrow_mut().push(Call::MouseMoved(x, y)));
        let l = log.clone();
        callbacks.set_mouse_pressed(move |b| l.borrow_mut().push(Call::MousePressed(b)));
        let l = log.clone();
        callbacks.set_mouse_released(move |b| l.borrow_mut().push(Call::MouseReleased(b)));
        let l = log.clone();
        callbacks.set_mouse_scrolled(move |m, v| l.borrow_mut().push(Call::Scrolled(m, v)));
        let l = log.clone();
        callbacks.set_char_typed(move |c| l.borrow_mut().push(Call::Char(c)));
        let l = log.clone();
        callbacks.set_error(move |e| l.borrow_mut().push(Call::Error(e.to_string())));

        (dispatcher, log)
    }

    #[test]
    fn unchanged_resize_is_suppressed() {
        let (mut dispatcher, log) = recording(&WindowConfig::default().size(800, 600));

        dispatcher.resized(800, 600);
        assert!(log.borrow().is_empty());
        assert_eq!(dispatcher.state.width(), 800);
        assert_eq!(dispatcher.state.height(), 600);

        dispatcher.resized(1024, 768);
        assert_eq!(*log.borrow(), vec![Call::Resized(1024, 768)]);
        assert_eq!(dispatcher.state.width(), 1024);
        assert_eq!(dispatcher.state.height(), 768);
    }

    #[test]
    fn resize_without_handler_still_updates_state() {
        let mut dispatcher = Dispatcher::new(&WindowConfig::default());

        dispatcher.resized(320, 240);

        assert_eq!((dispatcher.state.width(), dispatcher.state.height()), (320, 240));
    }

    #[test]
    fn dedup_moves_fire_once_per_distinct_position() {
        let (mut dispatcher, log) = recording(&WindowConfig::default());

        for (x, y) in [(1, 1), (1, 1), (2, 1), (2, 1), (2, 1), (1, 1)] {
            dispatcher.mouse_moved_dedup(x, y);
        }

        assert_eq!(
            *log.borrow(),
            vec![
                Call::MouseMoved(1, 1),
                Call::MouseMoved(2, 1),
                Call::MouseMoved(1, 1)
            ]
        );
    }

    #[test]
    fn plain_moves_always_fire_and_record() {
        let (mut dispatcher, log) = recording(&WindowConfig::default());

        dispatcher.mouse_moved(5, 6);
        dispatcher.mouse_moved(5, 6);

        assert_eq!(log.borrow().len(), 2);
        assert_eq!((dispatcher.state.mouse_x(), dispatcher.state.mouse_y()), (5, 6));
    }

    #[test]
    fn wheel_is_normalized() {
        let (mut dispatcher, log) = recording(&WindowConfig::default());

        dispatcher.wheel(1000, true);
        dispatcher.wheel(-1000, false);
        dispatcher.wheel(12, true);
        dispatcher.scrolled(100, true);

        assert_eq!(
            *log.borrow(),
            vec![
                Call::Scrolled(10, true),
                Call::Scrolled(-10, false),
                Call::Scrolled(1, true),
                Call::Scrolled(10, true)
            ]
        );
    }

    #[test]
    fn close_request_is_monotonic_and_silent() {
        let (mut dispatcher, log) = recording(&WindowConfig::default());

        dispatcher.close_requested();
        dispatcher.resized(1, 1);
        dispatcher.close_requested();

        assert!(dispatcher.state.should_close());
        assert_eq!(*log.borrow(), vec![Call::Resized(1, 1)]);
    }

    #[test]
    fn errors_reach_the_handler() {
        let (mut dispatcher, log) = recording(&WindowConfig::default());

        dispatcher.error(WindowError::Connection(":0".into()));

        assert_eq!(
            *log.borrow(),
            vec![Call::Error(
                "could not connect to the display server: :0".into()
            )]
        );
    }
}
