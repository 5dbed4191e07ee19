mod translate;
mod window;

pub use window::XWindow;
