use crate::config::{CursorMode, WindowConfig, WindowMode};

#[derive(Debug, Clone)]
pub struct WindowState {
    width: u16,
    height: u16,
    mouse_x: u16,
    mouse_y: u16,
    should_close: bool,
    pub cursor_mode: CursorMode,
    pub window_mode: WindowMode,
}

impl WindowState {
    pub fn new(config: &WindowConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            mouse_x: 0,
            mouse_y: 0,
            should_close: false,
            cursor_mode: config.cursor_mode,
            window_mode: config.window_mode,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn mouse_x(&self) -> u16 {
        self.mouse_x
    }

    pub fn mouse_y(&self) -> u16 {
        self.mouse_y
    }

    pub fn should_close(&self) -> bool {
        self.should_close
    }

    //there is no way back, a new window has to be created
    pub fn request_close(&mut self) {
        self.should_close = true;
    }

    //false when nothing changed
    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        if self.width == width && self.height == height {
            return false;
        }

        self.width = width;
        self.height = height;

        true
    }

    //false when nothing changed
    pub fn move_mouse(&mut self, x: u16, y: u16) -> bool {
        if self.mouse_x == x && self.mouse_y == y {
            return false;
        }

        self.mouse_x = x;
        self.mouse_y = y;

        true
    }
}

//native coordinates are signed, positions left of or above the client area pin to 0
pub fn clamp_coordinate(value: i32) -> u16 {
    value.clamp(0, u16::MAX as i32) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> WindowState {
        WindowState::new(&WindowConfig::default().size(800, 600))
    }

    #[test]
    fn resize_reports_changes_only() {
        let mut state = state();

        assert!(!state.resize(800, 600));
        assert!(state.resize(1024, 768));
        assert!(!state.resize(1024, 768));
        assert_eq!((state.width(), state.height()), (1024, 768));
    }

    #[test]
    fn mouse_reports_changes_only() {
        let mut state = state();

        assert!(state.move_mouse(3, 4));
        assert!(!state.move_mouse(3, 4));
        assert!(state.move_mouse(3, 5));
        assert_eq!((state.mouse_x(), state.mouse_y()), (3, 5));
    }

    #[test]
    fn close_request_sticks() {
        let mut state = state();

        assert!(!state.should_close());
        state.request_close();
        state.request_close();
        assert!(state.should_close());
    }

    #[test]
    fn coordinates_clamp() {
        assert_eq!(clamp_coordinate(-5), 0);
        assert_eq!(clamp_coordinate(42), 42);
        assert_eq!(clamp_coordinate(70_000), u16::MAX);
    }
}
