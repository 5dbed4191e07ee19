//message decoding is plain data, it builds everywhere so it can be tested everywhere
#![cfg_attr(not(target_os = "windows"), allow(dead_code))]

mod class;
mod message;

#[cfg(target_os = "windows")]
mod window;

#[cfg(target_os = "windows")]
pub use window::Win32Window;
