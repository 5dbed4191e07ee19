use std::any::Any;
use std::ptr::NonNull;

use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, RawDisplayHandle,
    RawWindowHandle, WindowHandle, XlibDisplayHandle, XlibWindowHandle,
};

use super::translate::Translator;

use crate::callback::Callbacks;
use crate::config::{CursorMode, WindowConfig, WindowMode};
use crate::dispatch::Dispatcher;
use crate::error::WindowError;
use crate::keycode::Keycode;
use crate::state::WindowState;
use crate::Window;

const EVENT_MASK: std::os::raw::c_long = x11::KEY_PRESS_MASK
    | x11::KEY_RELEASE_MASK
    | x11::BUTTON_PRESS_MASK
    | x11::BUTTON_RELEASE_MASK
    | x11::POINTER_MOTION_MASK
    | x11::STRUCTURE_NOTIFY_MASK;

//everything that only exists between launch and close
struct Connection {
    display: x11::Display,
    screen: x11::Screen,
    window: x11::Window,
    translator: Translator,
}

pub struct XWindow {
    config: WindowConfig,
    dispatcher: Dispatcher,
    connection: Option<Connection>,
    closed: bool,
    context: Option<Box<dyn Any>>,
}

impl XWindow {
    //nothing native happens until launch
    pub fn new(config: WindowConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(&config),
            config,
            connection: None,
            closed: false,
            context: None,
        }
    }

    fn connect(&self) -> Result<Connection, x11::Error> {
        let mut display = x11::Display::open("")?;

        if !display.set_detectable_auto_repeat(true) {
            log::warn!("detectable auto repeat is not supported, repeats arrive as release/press pairs");
        }

        let screen = display.default_screen();
        let root = display.root_window(screen);

        let window = display.create_simple_window(
            root,
            0,
            0,
            self.config.width as u32,
            self.config.height as u32,
            1,
            display.white_pixel(screen),
            display.black_pixel(screen),
        );

        display.select_input(window, EVENT_MASK);
        display.store_name(window, &self.config.title);

        if !self.config.resizable {
            display.set_fixed_size(window, self.config.width as u32, self.config.height as u32);
        }

        display.map_window(window);

        let wm_delete_window = display.intern_atom("WM_DELETE_WINDOW", false);

        if !display.set_wm_protocols(window, &mut [wm_delete_window]) {
            log::warn!("failed to register WM_DELETE_WINDOW, the close button will not work");
        }

        if !display.open_input_context(window) {
            log::warn!("no input method available, typed text falls back to latin-1");
        }

        display.flush();

        Ok(Connection {
            display,
            screen,
            window,
            translator: Translator::new(wm_delete_window),
        })
    }
}

impl Window for XWindow {
    fn launch(&mut self) {
        if self.closed || self.connection.is_some() {
            return;
        }

        match self.connect() {
            Ok(connection) => {
                self.connection = Some(connection);

                log::info!(
                    "created window \"{}\" ({}x{})",
                    self.config.title,
                    self.config.width,
                    self.config.height
                );

                //the state already holds the requested modes, apply them natively
                let window_mode = self.window_mode();
                let cursor_mode = self.cursor_mode();
                self.dispatcher.state.window_mode = WindowMode::Windowed;
                self.set_window_mode(window_mode);
                self.set_cursor_mode(cursor_mode);
            }
            Err(e) => {
                self.dispatcher.error(WindowError::Connection(e.to_string()));
            }
        }
    }

    fn poll_events(&mut self) {
        let Some(connection) = self.connection.as_mut() else {
            return;
        };

        while connection.display.pending() > 0 {
            let event = connection.display.next_event();
            connection.translator.translate(&mut self.dispatcher, event);
        }
    }

    fn state(&self) -> &WindowState {
        &self.dispatcher.state
    }

    fn close(&mut self) {
        self.closed = true;

        let Some(mut connection) = self.connection.take() else {
            return;
        };

        if self.cursor_mode() == CursorMode::Captured {
            connection.display.ungrab_pointer();
        }

        connection.display.close_input_context();
        connection.display.destroy_window(connection.window);
        connection.display.flush();

        //closes the display
        drop(connection);

        log::info!("window closed");

        self.dispatcher.closed();
    }

    fn key_pressed(&self, key: Keycode) -> bool {
        let (Some(connection), Some(keysym)) = (self.connection.as_ref(), key.keysym()) else {
            return false;
        };

        connection.display.query_key(keysym)
    }

    fn callbacks(&mut self) -> &mut Callbacks {
        &mut self.dispatcher.callbacks
    }

    fn set_cursor_mode(&mut self, mode: CursorMode) {
        if let Some(connection) = self.connection.as_mut() {
            let display = &mut connection.display;
            let window = connection.window;

            match mode {
                CursorMode::Normal => {
                    display.ungrab_pointer();
                    display.show_cursor(window);
                }
                CursorMode::Hidden => {
                    display.ungrab_pointer();
                    display.hide_cursor(window);
                }
                CursorMode::Captured => {
                    display.hide_cursor(window);
                    if !display.grab_pointer(window) {
                        log::warn!("failed to grab the pointer");
                    }
                }
            }

            display.flush();
        }

        self.dispatcher.state.cursor_mode = mode;
    }

    fn set_window_mode(&mut self, mode: WindowMode) {
        if self.window_mode() == mode {
            return;
        }

        if let Some(connection) = self.connection.as_ref() {
            connection.display.set_fullscreen(
                connection.window,
                connection.screen,
                mode == WindowMode::Fullscreen,
            );
        }

        self.dispatcher.state.window_mode = mode;
    }

    fn resize(&mut self, width: u16, height: u16) {
        let Some(connection) = self.connection.as_ref() else {
            self.config.width = width;
            self.config.height = height;
            self.dispatcher.state.resize(width, height);
            return;
        };

        let display = &connection.display;

        if !self.config.resizable {
            display.set_fixed_size(connection.window, width as u32, height as u32);
        }

        //ConfigureNotify runs through the dispatcher and updates the state
        display.resize_window(connection.window, width as u32, height as u32);
        display.flush();
    }

    fn set_context(&mut self, context: Box<dyn Any>) {
        self.context = Some(context);
    }

    fn context(&self) -> Option<&dyn Any> {
        self.context.as_deref()
    }
}

impl Drop for XWindow {
    fn drop(&mut self) {
        self.close();
    }
}

impl HasWindowHandle for XWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        let connection = self.connection.as_ref().ok_or(HandleError::Unavailable)?;

        let handle = XlibWindowHandle::new(connection.window);

        Ok(unsafe { WindowHandle::borrow_raw(RawWindowHandle::Xlib(handle)) })
    }
}

impl HasDisplayHandle for XWindow {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        let connection = self.connection.as_ref().ok_or(HandleError::Unavailable)?;

        let handle = XlibDisplayHandle::new(
            NonNull::new(connection.display.as_ptr()),
            connection.screen,
        );

        Ok(unsafe { DisplayHandle::borrow_raw(RawDisplayHandle::Xlib(handle)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn new_window_is_inert() {
        let window = XWindow::new(WindowConfig::new("inert").size(640, 480));

        assert_eq!((window.width(), window.height()), (640, 480));
        assert!(!window.should_close());
        assert!(!window.key_pressed(Keycode::A));
        assert!(window.window_handle().is_err());
        assert!(window.display_handle().is_err());
    }

    #[test]
    fn modes_before_launch_are_recorded() {
        let mut window = XWindow::new(WindowConfig::default());

        window.set_cursor_mode(CursorMode::Captured);
        window.set_window_mode(WindowMode::Fullscreen);
        window.resize(300, 200);
        window.poll_events();

        assert_eq!(window.cursor_mode(), CursorMode::Captured);
        assert_eq!(window.window_mode(), WindowMode::Fullscreen);
        assert_eq!((window.width(), window.height()), (300, 200));
    }

    #[test]
    fn close_without_launch_fires_nothing() {
        let closed = Rc::new(Cell::new(0));
        let mut window = XWindow::new(WindowConfig::default());

        let counter = closed.clone();
        window.on_window_closed(move || counter.set(counter.get() + 1));

        window.close();
        assert!(!window.should_close());
        window.close();
        assert!(!window.should_close());
        window.launch();

        assert_eq!(closed.get(), 0);
        assert!(!window.should_close());
        assert!(window.window_handle().is_err());
    }

    #[test]
    fn close_after_delete_request_keeps_should_close() {
        const WM_DELETE_WINDOW: x11::Atom = 301;

        let mut window = XWindow::new(WindowConfig::default());
        let mut translator = Translator::new(WM_DELETE_WINDOW);

        translator.translate(
            &mut window.dispatcher,
            x11::Event::ClientMessage {
                message_type: 300,
                format: 32,
                data: [WM_DELETE_WINDOW as i64, 0, 0, 0, 0],
            },
        );
        assert!(window.should_close());

        window.close();
        assert!(window.should_close());
        window.close();
        assert!(window.should_close());
    }

    #[test]
    fn context_is_stored_untouched() {
        let mut window = XWindow::new(WindowConfig::default());

        assert!(window.context().is_none());

        window.set_context(Box::new(42u32));

        assert_eq!(window.context().and_then(|c| c.downcast_ref::<u32>()), Some(&42));
    }
}
