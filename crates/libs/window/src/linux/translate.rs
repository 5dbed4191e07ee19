use crate::dispatch::Dispatcher;
use crate::keycode::Keycode;
use crate::mouse::{MouseButton, SCROLL_LIMIT};
use crate::repeat::KeyRepeatTable;
use crate::state;

//the core protocol reports wheel steps as buttons
const SCROLL_UP: u32 = 4;
const SCROLL_DOWN: u32 = 5;
const SCROLL_LEFT: u32 = 6;
const SCROLL_RIGHT: u32 = 7;

fn is_scroll_button(button: u32) -> bool {
    (SCROLL_UP..=SCROLL_RIGHT).contains(&button)
}

fn clamp_size(value: i32) -> u16 {
    value.clamp(0, u16::MAX as i32) as u16
}

pub struct Translator {
    repeat: KeyRepeatTable,
    wm_delete_window: x11::Atom,
}

impl Translator {
    pub fn new(wm_delete_window: x11::Atom) -> Self {
        Self {
            repeat: KeyRepeatTable::new(),
            wm_delete_window,
        }
    }

    pub fn translate(&mut self, dispatcher: &mut Dispatcher, event: x11::Event) {
        match event {
            x11::Event::ConfigureNotify { width, height, .. } => {
                //moves and restacks arrive with the size unchanged
                dispatcher.resized(clamp_size(width), clamp_size(height));
            }
            x11::Event::ButtonPress { button } => match button {
                SCROLL_UP => dispatcher.scrolled(SCROLL_LIMIT, true),
                SCROLL_DOWN => dispatcher.scrolled(-SCROLL_LIMIT, true),
                SCROLL_LEFT => dispatcher.scrolled(SCROLL_LIMIT, false),
                SCROLL_RIGHT => dispatcher.scrolled(-SCROLL_LIMIT, false),
                button => dispatcher.mouse_pressed(MouseButton::from_x11(button)),
            },
            x11::Event::ButtonRelease { button } => {
                if !is_scroll_button(button) {
                    dispatcher.mouse_released(MouseButton::from_x11(button));
                }
            }
            x11::Event::KeyPress { keysym, text, .. } => {
                for c in text.iter().flat_map(|text| text.chars()) {
                    dispatcher.char_typed(c);
                }

                let key = Keycode::from_keysym(keysym);
                let count = self.repeat.press(key);

                dispatcher.key_pressed(key, count > 0, count as u16);
            }
            x11::Event::KeyRelease { keysym, .. } => {
                let key = Keycode::from_keysym(keysym);

                dispatcher.key_released(key);

                self.repeat.release(key);
            }
            x11::Event::MotionNotify { x, y } => {
                dispatcher.mouse_moved(state::clamp_coordinate(x), state::clamp_coordinate(y));
            }
            x11::Event::ClientMessage {
                format, ref data, ..
            } if format == 32 && data[0] as x11::Atom == self.wm_delete_window => {
                dispatcher.close_requested();
            }
            other => {
                log::trace!("unhandled x11 event: {:?}", other);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::WindowConfig;
    use crate::dispatch::tests::{recording, Call};

    const WM_DELETE_WINDOW: x11::Atom = 301;

    fn configure(width: i32, height: i32) -> x11::Event {
        x11::Event::ConfigureNotify {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    fn press(keysym: u64) -> x11::Event {
        x11::Event::KeyPress {
            keysym,
            text: None,
        }
    }

    fn release(keysym: u64) -> x11::Event {
        x11::Event::KeyRelease { keysym }
    }

    #[test]
    fn resize_scenario() {
        let (mut dispatcher, log) = recording(&WindowConfig::default().size(800, 600));
        let mut translator = Translator::new(WM_DELETE_WINDOW);

        translator.translate(&mut dispatcher, configure(800, 600));
        assert!(log.borrow().is_empty());
        assert_eq!((dispatcher.state.width(), dispatcher.state.height()), (800, 600));

        translator.translate(&mut dispatcher, configure(1024, 768));
        assert_eq!(*log.borrow(), vec![Call::Resized(1024, 768)]);
        assert_eq!((dispatcher.state.width(), dispatcher.state.height()), (1024, 768));
    }

    #[test]
    fn wheel_buttons_become_scrolls() {
        let (mut dispatcher, log) = recording(&WindowConfig::default());
        let mut translator = Translator::new(WM_DELETE_WINDOW);

        for button in 4..=7 {
            translator.translate(&mut dispatcher, x11::Event::ButtonPress { button });
            translator.translate(&mut dispatcher, x11::Event::ButtonRelease { button });
        }

        assert_eq!(
            *log.borrow(),
            vec![
                Call::Scrolled(10, true),
                Call::Scrolled(-10, true),
                Call::Scrolled(10, false),
                Call::Scrolled(-10, false)
            ]
        );
    }

    #[test]
    fn other_buttons_pass_through() {
        let (mut dispatcher, log) = recording(&WindowConfig::default());
        let mut translator = Translator::new(WM_DELETE_WINDOW);

        translator.translate(&mut dispatcher, x11::Event::ButtonPress { button: 1 });
        translator.translate(&mut dispatcher, x11::Event::ButtonRelease { button: 1 });
        translator.translate(&mut dispatcher, x11::Event::ButtonPress { button: 11 });

        assert_eq!(
            *log.borrow(),
            vec![
                Call::MousePressed(MouseButton::Left),
                Call::MouseReleased(MouseButton::Left),
                Call::MousePressed(MouseButton::Other(11))
            ]
        );
    }

    #[test]
    fn held_key_counts_repeats() {
        let (mut dispatcher, log) = recording(&WindowConfig::default());
        let mut translator = Translator::new(WM_DELETE_WINDOW);

        for _ in 0..3 {
            translator.translate(&mut dispatcher, press(0x77));
        }
        translator.translate(&mut dispatcher, release(0x77));
        translator.translate(&mut dispatcher, press(0x77));

        assert_eq!(
            *log.borrow(),
            vec![
                Call::KeyPressed(Keycode::W, false, 0),
                Call::KeyPressed(Keycode::W, true, 1),
                Call::KeyPressed(Keycode::W, true, 2),
                Call::KeyReleased(Keycode::W),
                Call::KeyPressed(Keycode::W, false, 0)
            ]
        );
    }

    #[test]
    fn repeat_count_saturates() {
        let (mut dispatcher, log) = recording(&WindowConfig::default());
        let mut translator = Translator::new(WM_DELETE_WINDOW);

        for _ in 0..300 {
            translator.translate(&mut dispatcher, press(0x61));
        }

        let counts: Vec<u16> = log
            .borrow()
            .iter()
            .map(|call| match call {
                Call::KeyPressed(_, _, count) => *count,
                other => panic!("unexpected {:?}", other),
            })
            .collect();

        let expected: Vec<u16> = (0..300u16).map(|n| n.min(255)).collect();
        assert_eq!(counts, expected);
    }

    #[test]
    fn release_resets_only_its_key() {
        let (mut dispatcher, log) = recording(&WindowConfig::default());
        let mut translator = Translator::new(WM_DELETE_WINDOW);

        translator.translate(&mut dispatcher, press(0x61));
        translator.translate(&mut dispatcher, press(0x73));
        translator.translate(&mut dispatcher, press(0x61));
        translator.translate(&mut dispatcher, release(0x61));
        translator.translate(&mut dispatcher, press(0x73));

        assert_eq!(
            log.borrow().last(),
            Some(&Call::KeyPressed(Keycode::S, true, 1))
        );
    }

    #[test]
    fn typed_text_comes_before_the_key() {
        let (mut dispatcher, log) = recording(&WindowConfig::default());
        let mut translator = Translator::new(WM_DELETE_WINDOW);

        translator.translate(
            &mut dispatcher,
            x11::Event::KeyPress {
                keysym: 0x65,
                text: Some("é".to_string()),
            },
        );

        assert_eq!(
            *log.borrow(),
            vec![Call::Char('é'), Call::KeyPressed(Keycode::E, false, 0)]
        );
    }

    #[test]
    fn motion_is_forwarded_without_dedup() {
        let (mut dispatcher, log) = recording(&WindowConfig::default());
        let mut translator = Translator::new(WM_DELETE_WINDOW);

        translator.translate(&mut dispatcher, x11::Event::MotionNotify { x: 4, y: 2 });
        translator.translate(&mut dispatcher, x11::Event::MotionNotify { x: 4, y: 2 });
        translator.translate(&mut dispatcher, x11::Event::MotionNotify { x: -3, y: 2 });

        assert_eq!(
            *log.borrow(),
            vec![
                Call::MouseMoved(4, 2),
                Call::MouseMoved(4, 2),
                Call::MouseMoved(0, 2)
            ]
        );
        assert_eq!((dispatcher.state.mouse_x(), dispatcher.state.mouse_y()), (0, 2));
    }

    #[test]
    fn delete_window_requests_close() {
        let (mut dispatcher, log) = recording(&WindowConfig::default());
        let mut translator = Translator::new(WM_DELETE_WINDOW);

        translator.translate(
            &mut dispatcher,
            x11::Event::ClientMessage {
                message_type: 300,
                format: 32,
                data: [WM_DELETE_WINDOW as i64, 0, 0, 0, 0],
            },
        );

        assert!(dispatcher.state.should_close());
        assert!(log.borrow().is_empty());

        translator.translate(&mut dispatcher, configure(10, 10));
        assert!(dispatcher.state.should_close());
    }

    #[test]
    fn foreign_client_messages_are_ignored() {
        let (mut dispatcher, _) = recording(&WindowConfig::default());
        let mut translator = Translator::new(WM_DELETE_WINDOW);

        translator.translate(
            &mut dispatcher,
            x11::Event::ClientMessage {
                message_type: 300,
                format: 32,
                data: [999, 0, 0, 0, 0],
            },
        );
        translator.translate(&mut dispatcher, x11::Event::Other(12));
        translator.translate(&mut dispatcher, x11::Event::Filtered);

        assert!(!dispatcher.state.should_close());
    }
}
