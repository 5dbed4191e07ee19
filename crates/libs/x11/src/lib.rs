use std::ffi::CString;
use std::mem::{self, MaybeUninit};
use std::os::raw::{c_char, c_int, c_long, c_uint, c_ulong, c_void};
use std::ptr;

use thiserror::Error;
use x11_dl::xlib;

mod event;

pub use event::Event;

pub const KEY_PRESS_MASK: c_long = xlib::KeyPressMask;
pub const KEY_RELEASE_MASK: c_long = xlib::KeyReleaseMask;
pub const BUTTON_PRESS_MASK: c_long = xlib::ButtonPressMask;
pub const BUTTON_RELEASE_MASK: c_long = xlib::ButtonReleaseMask;
pub const POINTER_MOTION_MASK: c_long = xlib::PointerMotionMask;
pub const STRUCTURE_NOTIFY_MASK: c_long = xlib::StructureNotifyMask;

const XIM_PREEDIT_NOTHING: c_ulong = 0x0008;
const XIM_STATUS_NOTHING: c_ulong = 0x0400;
const XN_INPUT_STYLE: &[u8] = b"inputStyle\0";
const XN_CLIENT_WINDOW: &[u8] = b"clientWindow\0";
const XN_FOCUS_WINDOW: &[u8] = b"focusWindow\0";

const X_LOOKUP_CHARS: c_int = 2;
const X_LOOKUP_BOTH: c_int = 4;

pub type Screen = i32;
pub type Window = xlib::Window;
pub type Atom = xlib::Atom;
pub type KeySym = xlib::KeySym;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load libX11: {0}")]
    Library(String),
    #[error("could not establish connection with the X server ({0})")]
    Display(String),
}

pub struct Display {
    xlib: xlib::Xlib,
    display: *mut xlib::Display,
    im: xlib::XIM,
    ic: xlib::XIC,
    blank_cursor: xlib::Cursor,
}

impl Display {
    //an empty name means $DISPLAY
    pub fn open(display_name: &str) -> Result<Self, Error> {
        let xlib = xlib::Xlib::open().map_err(|e| Error::Library(e.to_string()))?;

        let name = CString::new(display_name).map_err(|e| Error::Display(e.to_string()))?;

        let name_ptr = if display_name.is_empty() {
            ptr::null()
        } else {
            name.as_ptr()
        };

        //the default handler exits the process on any protocol error
        unsafe { (xlib.XSetErrorHandler)(Some(log_error)) };

        let display = unsafe { (xlib.XOpenDisplay)(name_ptr) };

        if display.is_null() {
            let shown = if display_name.is_empty() {
                std::env::var("DISPLAY").unwrap_or_default()
            } else {
                display_name.to_owned()
            };
            return Err(Error::Display(shown));
        }

        Ok(Self {
            xlib,
            display,
            im: ptr::null_mut(),
            ic: ptr::null_mut(),
            blank_cursor: 0,
        })
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.display as *mut c_void
    }

    pub fn default_screen(&self) -> Screen {
        unsafe { (self.xlib.XDefaultScreen)(self.display) }
    }

    pub fn root_window(&self, screen: Screen) -> Window {
        unsafe { (self.xlib.XRootWindow)(self.display, screen) }
    }

    pub fn black_pixel(&self, screen: Screen) -> u64 {
        unsafe { (self.xlib.XBlackPixel)(self.display, screen) as u64 }
    }

    pub fn white_pixel(&self, screen: Screen) -> u64 {
        unsafe { (self.xlib.XWhitePixel)(self.display, screen) as u64 }
    }

    //reports key release only when the key is physically released,
    //instead of a release/press pair per auto-repeat
    pub fn set_detectable_auto_repeat(&self, detectable: bool) -> bool {
        let mut supported: c_int = 0;

        unsafe {
            (self.xlib.XkbSetDetectableAutoRepeat)(self.display, detectable as c_int, &mut supported);
        }

        supported != 0
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_simple_window(
        &self,
        parent: Window,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        border_width: u32,
        border: u64,
        background: u64,
    ) -> Window {
        unsafe {
            (self.xlib.XCreateSimpleWindow)(
                self.display,
                parent,
                x,
                y,
                extent(width),
                extent(height),
                border_width,
                border as c_ulong,
                background as c_ulong,
            )
        }
    }

    pub fn select_input(&self, window: Window, event_mask: c_long) -> i32 {
        unsafe { (self.xlib.XSelectInput)(self.display, window, event_mask) }
    }

    pub fn map_window(&self, window: Window) {
        unsafe { (self.xlib.XMapWindow)(self.display, window) };
    }

    pub fn destroy_window(&self, window: Window) {
        unsafe { (self.xlib.XDestroyWindow)(self.display, window) };
    }

    pub fn resize_window(&self, window: Window, width: u32, height: u32) {
        unsafe { (self.xlib.XResizeWindow)(self.display, window, extent(width), extent(height)) };
    }

    pub fn store_name(&self, window: Window, window_name: &str) {
        let Ok(window_name) = CString::new(window_name) else {
            log::warn!("window title contains a nul byte, not setting it");
            return;
        };

        unsafe { (self.xlib.XStoreName)(self.display, window, window_name.as_ptr()) };
    }

    //pins min and max size so window managers drop the resize handles
    pub fn set_fixed_size(&self, window: Window, width: u32, height: u32) {
        unsafe {
            let hints = (self.xlib.XAllocSizeHints)();

            if hints.is_null() {
                return;
            }

            (*hints).flags = xlib::PMinSize | xlib::PMaxSize;
            (*hints).min_width = extent(width) as c_int;
            (*hints).max_width = extent(width) as c_int;
            (*hints).min_height = extent(height) as c_int;
            (*hints).max_height = extent(height) as c_int;

            (self.xlib.XSetWMNormalHints)(self.display, window, hints);
            (self.xlib.XFree)(hints as *mut c_void);
        }
    }

    pub fn intern_atom(&self, atom_name: &str, only_if_exists: bool) -> Atom {
        let Ok(atom_name) = CString::new(atom_name) else {
            return 0;
        };

        unsafe { (self.xlib.XInternAtom)(self.display, atom_name.as_ptr(), only_if_exists as c_int) }
    }

    pub fn set_wm_protocols(&self, window: Window, protocols: &mut [Atom]) -> bool {
        unsafe {
            (self.xlib.XSetWMProtocols)(
                self.display,
                window,
                protocols.as_mut_ptr(),
                protocols.len() as c_int,
            ) != 0
        }
    }

    pub fn pending(&self) -> i32 {
        unsafe { (self.xlib.XPending)(self.display) }
    }

    pub fn flush(&self) {
        unsafe { (self.xlib.XFlush)(self.display) };
    }

    pub fn next_event(&mut self) -> Event {
        let mut event = MaybeUninit::<xlib::XEvent>::uninit();

        unsafe { (self.xlib.XNextEvent)(self.display, event.as_mut_ptr()) };

        let mut event = unsafe { event.assume_init() };

        if !self.ic.is_null() && unsafe { (self.xlib.XFilterEvent)(&mut event, 0) } != 0 {
            return Event::Filtered;
        }

        unsafe {
            match event.get_type() {
                xlib::KeyPress => Event::KeyPress {
                    keysym: self.lookup_keysym(&event.key),
                    text: self.lookup_text(&mut event.key),
                },
                xlib::KeyRelease => Event::KeyRelease {
                    keysym: self.lookup_keysym(&event.key),
                },
                xlib::ButtonPress => Event::ButtonPress {
                    button: event.button.button,
                },
                xlib::ButtonRelease => Event::ButtonRelease {
                    button: event.button.button,
                },
                xlib::MotionNotify => Event::MotionNotify {
                    x: event.motion.x,
                    y: event.motion.y,
                },
                xlib::ConfigureNotify => Event::ConfigureNotify {
                    x: event.configure.x,
                    y: event.configure.y,
                    width: event.configure.width,
                    height: event.configure.height,
                },
                xlib::ClientMessage => {
                    let message = event.client_message;
                    let mut data = [0i64; 5];
                    for (i, slot) in data.iter_mut().enumerate() {
                        *slot = message.data.get_long(i) as i64;
                    }
                    Event::ClientMessage {
                        message_type: message.message_type,
                        format: message.format,
                        data,
                    }
                }
                ty => Event::Other(ty),
            }
        }
    }

    //keysym at the shift level of the event, folded to lower case
    fn lookup_keysym(&self, key: &xlib::XKeyEvent) -> KeySym {
        let level = if key.state & xlib::ShiftMask != 0 { 1 } else { 0 };

        let keysym =
            unsafe { (self.xlib.XkbKeycodeToKeysym)(self.display, key.keycode as _, 0, level) };

        let mut lower: KeySym = 0;
        let mut upper: KeySym = 0;

        unsafe { (self.xlib.XConvertCase)(keysym, &mut lower, &mut upper) };

        lower
    }

    fn lookup_text(&self, key: &mut xlib::XKeyEvent) -> Option<String> {
        let mut buffer = [0 as c_char; 32];
        let mut keysym: KeySym = 0;

        if !self.ic.is_null() {
            let mut status: c_int = 0;

            let count = unsafe {
                (self.xlib.Xutf8LookupString)(
                    self.ic,
                    key,
                    buffer.as_mut_ptr(),
                    buffer.len() as c_int,
                    &mut keysym,
                    &mut status,
                )
            };

            if status != X_LOOKUP_CHARS && status != X_LOOKUP_BOTH {
                return None;
            }

            event::decode_utf8(as_bytes(&buffer, count))
        } else {
            let count = unsafe {
                (self.xlib.XLookupString)(
                    key,
                    buffer.as_mut_ptr(),
                    buffer.len() as c_int,
                    &mut keysym,
                    ptr::null_mut(),
                )
            };

            event::decode_latin1(as_bytes(&buffer, count))
        }
    }

    pub fn open_input_context(&mut self, window: Window) -> bool {
        if !self.ic.is_null() {
            return true;
        }

        unsafe {
            //XOpenIM picks the input method from the locale
            libc::setlocale(libc::LC_CTYPE, b"\0".as_ptr() as *const c_char);
            (self.xlib.XSetLocaleModifiers)(b"\0".as_ptr() as *const c_char);

            self.im = (self.xlib.XOpenIM)(
                self.display,
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
            );

            if self.im.is_null() {
                return false;
            }

            self.ic = (self.xlib.XCreateIC)(
                self.im,
                XN_INPUT_STYLE.as_ptr() as *const c_char,
                XIM_PREEDIT_NOTHING | XIM_STATUS_NOTHING,
                XN_CLIENT_WINDOW.as_ptr() as *const c_char,
                window,
                XN_FOCUS_WINDOW.as_ptr() as *const c_char,
                window,
                ptr::null_mut::<c_void>(),
            );

            if self.ic.is_null() {
                (self.xlib.XCloseIM)(self.im);
                self.im = ptr::null_mut();
                return false;
            }

            (self.xlib.XSetICFocus)(self.ic);
        }

        true
    }

    pub fn close_input_context(&mut self) {
        unsafe {
            if !self.ic.is_null() {
                (self.xlib.XDestroyIC)(self.ic);
                self.ic = ptr::null_mut();
            }

            if !self.im.is_null() {
                (self.xlib.XCloseIM)(self.im);
                self.im = ptr::null_mut();
            }
        }
    }

    pub fn query_key(&self, keysym: KeySym) -> bool {
        let keycode = unsafe { (self.xlib.XKeysymToKeycode)(self.display, keysym) } as usize;

        if keycode == 0 {
            return false;
        }

        let mut keys = [0 as c_char; 32];

        unsafe { (self.xlib.XQueryKeymap)(self.display, keys.as_mut_ptr()) };

        (keys[keycode / 8] as u8) & (1 << (keycode % 8)) != 0
    }

    pub fn hide_cursor(&mut self, window: Window) {
        unsafe {
            if self.blank_cursor == 0 {
                let data = [0 as c_char; 8];
                let pixmap =
                    (self.xlib.XCreateBitmapFromData)(self.display, window, data.as_ptr(), 8, 8);

                let mut color: xlib::XColor = mem::zeroed();

                self.blank_cursor = (self.xlib.XCreatePixmapCursor)(
                    self.display,
                    pixmap,
                    pixmap,
                    &mut color,
                    &mut color,
                    0,
                    0,
                );

                (self.xlib.XFreePixmap)(self.display, pixmap);
            }

            (self.xlib.XDefineCursor)(self.display, window, self.blank_cursor);
        }
    }

    pub fn show_cursor(&self, window: Window) {
        unsafe { (self.xlib.XUndefineCursor)(self.display, window) };
    }

    //confines the pointer to the window
    pub fn grab_pointer(&self, window: Window) -> bool {
        let mask = (BUTTON_PRESS_MASK | BUTTON_RELEASE_MASK | POINTER_MOTION_MASK) as c_uint;

        let result = unsafe {
            (self.xlib.XGrabPointer)(
                self.display,
                window,
                xlib::True,
                mask,
                xlib::GrabModeAsync,
                xlib::GrabModeAsync,
                window,
                0,
                xlib::CurrentTime,
            )
        };

        result == xlib::GrabSuccess
    }

    pub fn ungrab_pointer(&self) {
        unsafe { (self.xlib.XUngrabPointer)(self.display, xlib::CurrentTime) };
    }

    //asks the window manager through _NET_WM_STATE, it owns the geometry
    pub fn set_fullscreen(&self, window: Window, screen: Screen, fullscreen: bool) {
        let wm_state = self.intern_atom("_NET_WM_STATE", false);
        let wm_fullscreen = self.intern_atom("_NET_WM_STATE_FULLSCREEN", false);

        let mut message: xlib::XClientMessageEvent = unsafe { mem::zeroed() };
        message.type_ = xlib::ClientMessage;
        message.window = window;
        message.message_type = wm_state;
        message.format = 32;
        message.data.set_long(0, fullscreen as c_long);
        message.data.set_long(1, wm_fullscreen as c_long);
        message.data.set_long(2, 0);
        message.data.set_long(3, 1);

        let mut event = xlib::XEvent {
            client_message: message,
        };

        unsafe {
            (self.xlib.XSendEvent)(
                self.display,
                self.root_window(screen),
                xlib::False,
                xlib::SubstructureRedirectMask | xlib::SubstructureNotifyMask,
                &mut event,
            );
        }

        self.flush();
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        self.close_input_context();

        unsafe {
            if self.blank_cursor != 0 {
                (self.xlib.XFreeCursor)(self.display, self.blank_cursor);
            }

            (self.xlib.XCloseDisplay)(self.display);
        }
    }
}

//the server rejects zero sized windows with BadValue
fn extent(size: u32) -> u32 {
    size.max(1)
}

unsafe extern "C" fn log_error(_: *mut xlib::Display, event: *mut xlib::XErrorEvent) -> c_int {
    if let Some(event) = event.as_ref() {
        log::error!(
            "x11 protocol error {} (request {}.{}, resource {:#x})",
            event.error_code,
            event.request_code,
            event.minor_code,
            event.resourceid
        );
    }

    0
}

fn as_bytes(buffer: &[c_char], count: c_int) -> &[u8] {
    let count = (count.max(0) as usize).min(buffer.len());

    unsafe { std::slice::from_raw_parts(buffer.as_ptr() as *const u8, count) }
}
