//! Window creation parameters

/// Rendering context the caller intends to attach.
///
/// The window only records the choice; creating the context is up to the
/// caller, which hands it back through [`Window::set_context`](crate::Window::set_context).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContextKind {
    #[default]
    None,
    OpenGl,
    Vulkan,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WindowMode {
    #[default]
    Windowed,
    /// Borderless and maximized
    Fullscreen,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CursorMode {
    #[default]
    Normal,
    /// Invisible over the window but free to leave it
    Hidden,
    /// Invisible and confined to the window
    Captured,
}

#[derive(Clone, Debug)]
pub struct WindowConfig {
    pub title: String,
    pub width: u16,
    pub height: u16,
    pub context: ContextKind,
    pub window_mode: WindowMode,
    pub cursor_mode: CursorMode,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "casement".to_string(),
            width: 800,
            height: 600,
            context: ContextKind::None,
            window_mode: WindowMode::Windowed,
            cursor_mode: CursorMode::Normal,
            resizable: true,
        }
    }
}

impl WindowConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Client area size, decorations excluded
    pub fn size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn context(mut self, context: ContextKind) -> Self {
        self.context = context;
        self
    }

    pub fn window_mode(mut self, window_mode: WindowMode) -> Self {
        self.window_mode = window_mode;
        self
    }

    pub fn cursor_mode(mut self, cursor_mode: CursorMode) -> Self {
        self.cursor_mode = cursor_mode;
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }
}
