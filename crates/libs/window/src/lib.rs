//! Native windows behind one trait.
//!
//! [`create`] picks the backend for the target at build time. Native events
//! are normalized and handed to per-kind callbacks while [`Window::poll_events`]
//! runs, on the caller's thread.

use std::any::Any;

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

mod callback;
mod config;
mod dispatch;
mod error;
mod keycode;
mod mouse;
#[cfg(any(target_os = "linux", test))]
mod repeat;
mod state;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(any(target_os = "windows", test))]
mod win32;

pub use callback::{Callbacks, EventKind};
pub use config::{ContextKind, CursorMode, WindowConfig, WindowMode};
pub use error::{Result, WindowError};
pub use keycode::Keycode;
pub use mouse::MouseButton;
pub use state::WindowState;

#[cfg(target_os = "linux")]
pub use linux::XWindow;
#[cfg(target_os = "windows")]
pub use win32::Win32Window;

#[cfg(target_os = "windows")]
pub type PlatformWindow = Win32Window;
#[cfg(target_os = "linux")]
pub type PlatformWindow = XWindow;
#[cfg(not(any(target_os = "windows", target_os = "linux")))]
pub type PlatformWindow = std::convert::Infallible;

/// Creates the window for the platform this was built for.
///
/// On Windows the native window exists when this returns. On X the
/// connection is made by [`Window::launch`], which reports failure through the
/// error callback instead, so handlers can be installed first.
#[cfg(target_os = "windows")]
pub fn create(config: WindowConfig) -> Result<PlatformWindow> {
    Win32Window::new(config)
}

#[cfg(target_os = "linux")]
pub fn create(config: WindowConfig) -> Result<PlatformWindow> {
    Ok(XWindow::new(config))
}

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
pub fn create(_config: WindowConfig) -> Result<PlatformWindow> {
    Err(WindowError::Unsupported(std::env::consts::OS.to_string()))
}

pub trait Window: HasWindowHandle + HasDisplayHandle {
    /// Connects to the display server where that is deferred.
    fn launch(&mut self) {}

    /// Drains every queued native event without blocking.
    fn poll_events(&mut self);

    fn update(&mut self) {
        self.poll_events();
    }

    fn state(&self) -> &WindowState;

    /// Tears the native window down. Calling it again does nothing.
    fn close(&mut self);

    /// Live state of the key, not derived from delivered events.
    fn key_pressed(&self, key: Keycode) -> bool;

    fn callbacks(&mut self) -> &mut Callbacks;

    fn set_cursor_mode(&mut self, mode: CursorMode);

    fn set_window_mode(&mut self, mode: WindowMode);

    /// Requests a new client area size, the state follows once the platform reports it.
    fn resize(&mut self, width: u16, height: u16);

    fn set_context(&mut self, context: Box<dyn Any>);

    fn context(&self) -> Option<&dyn Any>;

    fn width(&self) -> u16 {
        self.state().width()
    }

    fn height(&self) -> u16 {
        self.state().height()
    }

    fn mouse_x(&self) -> u16 {
        self.state().mouse_x()
    }

    fn mouse_y(&self) -> u16 {
        self.state().mouse_y()
    }

    fn should_close(&self) -> bool {
        self.state().should_close()
    }

    fn minimized(&self) -> bool {
        self.width() == 0 && self.height() == 0
    }

    fn cursor_mode(&self) -> CursorMode {
        self.state().cursor_mode
    }

    fn window_mode(&self) -> WindowMode {
        self.state().window_mode
    }

    fn on_key_pressed(&mut self, f: impl FnMut(Keycode, bool, u16) + 'static)
    where
        Self: Sized,
    {
        self.callbacks().set_key_pressed(f);
    }

    fn on_key_released(&mut self, f: impl FnMut(Keycode) + 'static)
    where
        Self: Sized,
    {
        self.callbacks().set_key_released(f);
    }

    fn on_window_resized(&mut self, f: impl FnMut(u16, u16) + 'static)
    where
        Self: Sized,
    {
        self.callbacks().set_window_resized(f);
    }

    fn on_window_closed(&mut self, f: impl FnMut() + 'static)
    where
        Self: Sized,
    {
        self.callbacks().set_window_closed(f);
    }

    fn on_mouse_moved(&mut self, f: impl FnMut(u16, u16) + 'static)
    where
        Self: Sized,
    {
        self.callbacks().set_mouse_moved(f);
    }

    fn on_mouse_pressed(&mut self, f: impl FnMut(MouseButton) + 'static)
    where
        Self: Sized,
    {
        self.callbacks().set_mouse_pressed(f);
    }

    fn on_mouse_released(&mut self, f: impl FnMut(MouseButton) + 'static)
    where
        Self: Sized,
    {
        self.callbacks().set_mouse_released(f);
    }

    fn on_mouse_scrolled(&mut self, f: impl FnMut(i8, bool) + 'static)
    where
        Self: Sized,
    {
        self.callbacks().set_mouse_scrolled(f);
    }

    fn on_char_typed(&mut self, f: impl FnMut(char) + 'static)
    where
        Self: Sized,
    {
        self.callbacks().set_char_typed(f);
    }

    fn on_error(&mut self, f: impl FnMut(&WindowError) + 'static)
    where
        Self: Sized,
    {
        self.callbacks().set_error(f);
    }
}
