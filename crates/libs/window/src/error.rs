use thiserror::Error;

#[derive(Debug, Error)]
pub enum WindowError {
    //the native window could not be created, the instance is unusable
    #[error("could not create a window: {0}")]
    Creation(String),
    //the display server is unreachable, the instance stays inert
    #[error("could not connect to the display server: {0}")]
    Connection(String),
    #[error("no window backend for this platform: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, WindowError>;
