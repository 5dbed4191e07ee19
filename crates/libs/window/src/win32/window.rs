use std::any::Any;
use std::iter;
use std::mem;
use std::num::NonZeroIsize;
use std::os::windows::ffi::OsStrExt;

use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, RawWindowHandle,
    Win32WindowHandle, WindowHandle,
};
use windows::core::PCWSTR;
use windows::Win32::Foundation::{BOOL, HINSTANCE, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::ClientToScreen;
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::GetKeyState;
use windows::Win32::UI::WindowsAndMessaging::{
    AdjustWindowRect, ClipCursor, CreateWindowExW, DefWindowProcW, DestroyWindow,
    DispatchMessageW, GetClientRect, GetWindowLongW, GetWindowPlacement, LoadCursorW,
    PeekMessageW, RegisterClassW, SetWindowLongW, SetWindowPlacement, SetWindowPos, ShowCursor,
    ShowWindow, TranslateMessage, UnregisterClassW, CW_USEDEFAULT, GWL_EXSTYLE, GWL_STYLE, HMENU,
    IDC_ARROW, MSG, PM_REMOVE, SWP_FRAMECHANGED, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOZORDER,
    SW_SHOWMAXIMIZED, SW_SHOWNORMAL, WINDOWPLACEMENT, WINDOW_EX_STYLE, WINDOW_LONG_PTR_INDEX,
    WINDOW_STYLE, WNDCLASSW, WS_BORDER, WS_DLGFRAME, WS_EX_WINDOWEDGE, WS_MAXIMIZEBOX,
    WS_OVERLAPPEDWINDOW, WS_THICKFRAME,
};

use super::class::CLASS_NAMES;
use super::message::{self, Clip, Translator};

use crate::callback::Callbacks;
use crate::config::{CursorMode, WindowConfig, WindowMode};
use crate::dispatch::Dispatcher;
use crate::error::{Result, WindowError};
use crate::keycode::Keycode;
use crate::state::WindowState;
use crate::Window;

//first slot of the per window extra bytes
const OWNER_SLOT: WINDOW_LONG_PTR_INDEX = WINDOW_LONG_PTR_INDEX(0);

const KEY_DOWN_BIT: u16 = 0x8000;

//everything the window procedure needs, kept behind a raw pointer
//so message dispatch never aliases a borrow of the window itself
struct Shared {
    dispatcher: Dispatcher,
    translator: Translator,
}

#[cfg(target_pointer_width = "64")]
unsafe fn owner(hwnd: HWND) -> *mut Shared {
    windows::Win32::UI::WindowsAndMessaging::GetWindowLongPtrW(hwnd, OWNER_SLOT) as *mut Shared
}

#[cfg(target_pointer_width = "64")]
unsafe fn set_owner(hwnd: HWND, shared: *mut Shared) {
    windows::Win32::UI::WindowsAndMessaging::SetWindowLongPtrW(hwnd, OWNER_SLOT, shared as isize);
}

#[cfg(target_pointer_width = "32")]
unsafe fn owner(hwnd: HWND) -> *mut Shared {
    GetWindowLongW(hwnd, OWNER_SLOT) as *mut Shared
}

#[cfg(target_pointer_width = "32")]
unsafe fn set_owner(hwnd: HWND, shared: *mut Shared) {
    SetWindowLongW(hwnd, OWNER_SLOT, shared as i32);
}

unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    message: u32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    //null until the constructor stores it, creation messages take the default path
    let Some(shared) = owner(hwnd).as_mut() else {
        return DefWindowProcW(hwnd, message, w_param, l_param);
    };

    let Shared {
        dispatcher,
        translator,
    } = shared;

    let result = translator.translate(dispatcher, message, w_param.0, l_param.0);

    match message::clip_action(dispatcher.state.cursor_mode, message, w_param.0) {
        Some(Clip::Apply) => clip_to_client(hwnd),
        Some(Clip::Release) => release_clip(),
        None => {}
    }

    match result {
        Some(result) => LRESULT(result),
        None => DefWindowProcW(hwnd, message, w_param, l_param),
    }
}

//confines the cursor to the client area in screen coordinates
fn clip_to_client(hwnd: HWND) {
    let mut rect = RECT::default();

    if let Err(e) = unsafe { GetClientRect(hwnd, &mut rect) } {
        log::warn!("failed to get client rect: {}", e);
        return;
    }

    let mut top_left = POINT {
        x: rect.left,
        y: rect.top,
    };
    let mut bottom_right = POINT {
        x: rect.right,
        y: rect.bottom,
    };

    unsafe {
        let _ = ClientToScreen(hwnd, &mut top_left);
        let _ = ClientToScreen(hwnd, &mut bottom_right);
    }

    let screen = RECT {
        left: top_left.x,
        top: top_left.y,
        right: bottom_right.x,
        bottom: bottom_right.y,
    };

    if let Err(e) = unsafe { ClipCursor(Some(&screen)) } {
        log::warn!("failed to clip cursor: {}", e);
    }
}

fn release_clip() {
    let _ = unsafe { ClipCursor(None) };
}

fn encode_wide(text: &str) -> Vec<u16> {
    std::ffi::OsStr::new(text)
        .encode_wide()
        .chain(iter::once(0))
        .collect()
}

fn window_style(resizable: bool) -> WINDOW_STYLE {
    if resizable {
        WS_OVERLAPPEDWINDOW
    } else {
        WS_OVERLAPPEDWINDOW & !(WS_THICKFRAME | WS_MAXIMIZEBOX)
    }
}

//outer size of a window whose client area is width x height
fn outer_size(width: u16, height: u16, style: WINDOW_STYLE) -> (i32, i32) {
    let mut rect = RECT {
        left: 0,
        top: 0,
        right: width as i32,
        bottom: height as i32,
    };

    if let Err(e) = unsafe { AdjustWindowRect(&mut rect, style, BOOL::from(false)) } {
        log::warn!("failed to adjust window rect: {}", e);
    }

    (rect.right - rect.left, rect.bottom - rect.top)
}

pub struct Win32Window {
    hwnd: Option<HWND>,
    instance: HINSTANCE,
    class_name: Vec<u16>,
    style: WINDOW_STYLE,
    style_ex: WINDOW_EX_STYLE,
    placement: WINDOWPLACEMENT,
    cursor_hidden: bool,
    shared: *mut Shared,
    context: Option<Box<dyn Any>>,
}

impl Win32Window {
    pub fn new(config: WindowConfig) -> Result<Self> {
        let instance: HINSTANCE = unsafe { GetModuleHandleW(PCWSTR::null()) }
            .map_err(|e| WindowError::Creation(e.to_string()))?
            .into();

        let class_name = encode_wide(&CLASS_NAMES.next(&config.title));

        let wnd_class = WNDCLASSW {
            lpfnWndProc: Some(wnd_proc),
            cbWndExtra: mem::size_of::<isize>() as i32,
            hInstance: instance,
            hCursor: unsafe { LoadCursorW(HINSTANCE::default(), IDC_ARROW) }.unwrap_or_default(),
            lpszClassName: PCWSTR(class_name.as_ptr()),
            ..Default::default()
        };

        if unsafe { RegisterClassW(&wnd_class) } == 0 {
            return Err(WindowError::Creation(format!(
                "failed to register window class: {}",
                windows::core::Error::from_win32()
            )));
        }

        let style = window_style(config.resizable);
        let (outer_width, outer_height) = outer_size(config.width, config.height, style);
        let title = encode_wide(&config.title);

        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                PCWSTR(class_name.as_ptr()),
                PCWSTR(title.as_ptr()),
                style,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                outer_width,
                outer_height,
                HWND::default(),
                HMENU::default(),
                instance,
                None,
            )
        };

        let hwnd = match hwnd {
            Ok(hwnd) if !hwnd.is_invalid() => hwnd,
            Ok(_) => {
                let _ = unsafe { UnregisterClassW(PCWSTR(class_name.as_ptr()), instance) };
                return Err(WindowError::Creation("window handle is null".into()));
            }
            Err(e) => {
                let _ = unsafe { UnregisterClassW(PCWSTR(class_name.as_ptr()), instance) };
                return Err(WindowError::Creation(e.to_string()));
            }
        };

        let shared = Box::into_raw(Box::new(Shared {
            dispatcher: Dispatcher::new(&config),
            translator: Translator::new(),
        }));

        unsafe { set_owner(hwnd, shared) };

        let style_ex = WINDOW_EX_STYLE(unsafe { GetWindowLongW(hwnd, GWL_EXSTYLE) } as u32);

        let mut window = Self {
            hwnd: Some(hwnd),
            instance,
            class_name,
            style,
            style_ex,
            placement: WINDOWPLACEMENT {
                length: mem::size_of::<WINDOWPLACEMENT>() as u32,
                ..Default::default()
            },
            cursor_hidden: false,
            shared,
            context: None,
        };

        unsafe {
            let _ = ShowWindow(hwnd, SW_SHOWNORMAL);
        }

        log::info!(
            "created window \"{}\" ({}x{})",
            config.title,
            config.width,
            config.height
        );

        //the state already holds the requested modes, apply them natively
        window.shared_mut().dispatcher.state.window_mode = WindowMode::Windowed;
        window.set_window_mode(config.window_mode);
        window.set_cursor_mode(config.cursor_mode);

        Ok(window)
    }

    fn shared(&self) -> &Shared {
        unsafe { &*self.shared }
    }

    fn shared_mut(&mut self) -> &mut Shared {
        unsafe { &mut *self.shared }
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        if self.cursor_hidden != visible {
            return;
        }

        unsafe { ShowCursor(BOOL::from(visible)) };

        self.cursor_hidden = !visible;
    }
}

impl Window for Win32Window {
    fn poll_events(&mut self) {
        let mut msg = MSG::default();

        unsafe {
            while PeekMessageW(&mut msg, HWND::default(), 0, 0, PM_REMOVE).as_bool() {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
    }

    fn state(&self) -> &WindowState {
        &self.shared().dispatcher.state
    }

    fn close(&mut self) {
        let Some(hwnd) = self.hwnd else {
            return;
        };

        if self.cursor_mode() == CursorMode::Captured {
            release_clip();
        }
        self.set_cursor_visible(true);

        //WM_DESTROY reaches the closed callback before this returns
        if let Err(e) = unsafe { DestroyWindow(hwnd) } {
            log::warn!("failed to destroy window: {}", e);
        }

        self.hwnd = None;

        log::info!("window closed");
    }

    fn key_pressed(&self, key: Keycode) -> bool {
        let Some(vk) = key.virtual_key() else {
            return false;
        };

        (unsafe { GetKeyState(vk as i32) } as u16) & KEY_DOWN_BIT != 0
    }

    fn callbacks(&mut self) -> &mut Callbacks {
        &mut self.shared_mut().dispatcher.callbacks
    }

    fn set_cursor_mode(&mut self, mode: CursorMode) {
        self.shared_mut().dispatcher.state.cursor_mode = mode;

        let Some(hwnd) = self.hwnd else {
            return;
        };

        match mode {
            CursorMode::Normal => {
                release_clip();
                self.set_cursor_visible(true);
            }
            CursorMode::Hidden => {
                release_clip();
                self.set_cursor_visible(false);
            }
            CursorMode::Captured => {
                self.set_cursor_visible(false);
                clip_to_client(hwnd);
            }
        }
    }

    fn set_window_mode(&mut self, mode: WindowMode) {
        if self.window_mode() == mode {
            return;
        }

        let Some(hwnd) = self.hwnd else {
            self.shared_mut().dispatcher.state.window_mode = mode;
            return;
        };

        match mode {
            WindowMode::Windowed => unsafe {
                SetWindowLongW(hwnd, GWL_STYLE, self.style.0 as i32);
                SetWindowLongW(hwnd, GWL_EXSTYLE, self.style_ex.0 as i32);
                let _ = ShowWindow(hwnd, SW_SHOWNORMAL);
                if let Err(e) = SetWindowPlacement(hwnd, &self.placement) {
                    log::warn!("failed to restore window placement: {}", e);
                }
            },
            WindowMode::Fullscreen => unsafe {
                if let Err(e) = GetWindowPlacement(hwnd, &mut self.placement) {
                    log::warn!("failed to save window placement: {}", e);
                }

                let style = self.style & !(WS_BORDER | WS_DLGFRAME | WS_THICKFRAME);
                let style_ex = self.style_ex & !WS_EX_WINDOWEDGE;

                SetWindowLongW(hwnd, GWL_STYLE, style.0 as i32);
                SetWindowLongW(hwnd, GWL_EXSTYLE, style_ex.0 as i32);
                let _ = ShowWindow(hwnd, SW_SHOWMAXIMIZED);
            },
        }

        self.shared_mut().dispatcher.state.window_mode = mode;
    }

    fn resize(&mut self, width: u16, height: u16) {
        let Some(hwnd) = self.hwnd else {
            return;
        };

        let (outer_width, outer_height) = outer_size(width, height, self.style);

        //WM_SIZE runs through the dispatcher and updates the state
        if let Err(e) = unsafe {
            SetWindowPos(
                hwnd,
                HWND::default(),
                0,
                0,
                outer_width,
                outer_height,
                SWP_NOMOVE | SWP_NOZORDER | SWP_NOACTIVATE | SWP_FRAMECHANGED,
            )
        } {
            log::warn!("failed to resize window: {}", e);
        }
    }

    fn set_context(&mut self, context: Box<dyn Any>) {
        self.context = Some(context);
    }

    fn context(&self) -> Option<&dyn Any> {
        self.context.as_deref()
    }
}

impl Drop for Win32Window {
    fn drop(&mut self) {
        self.close();

        unsafe {
            if let Err(e) = UnregisterClassW(PCWSTR(self.class_name.as_ptr()), self.instance) {
                log::warn!("failed to unregister window class: {}", e);
            }

            drop(Box::from_raw(self.shared));
        }
    }
}

impl HasWindowHandle for Win32Window {
    fn window_handle(&self) -> std::result::Result<WindowHandle<'_>, HandleError> {
        let hwnd = self.hwnd.ok_or(HandleError::Unavailable)?;
        let hwnd = NonZeroIsize::new(hwnd.0 as isize).ok_or(HandleError::Unavailable)?;

        let mut handle = Win32WindowHandle::new(hwnd);
        handle.hinstance = NonZeroIsize::new(self.instance.0 as isize);

        Ok(unsafe { WindowHandle::borrow_raw(RawWindowHandle::Win32(handle)) })
    }
}

impl HasDisplayHandle for Win32Window {
    fn display_handle(&self) -> std::result::Result<DisplayHandle<'_>, HandleError> {
        Ok(DisplayHandle::windows())
    }
}
