mod term {
    pub const RESET: &str = "\x1b[1;0m";
    pub const BOLDMAGENTA: &str = "\x1b[1;35m";
    pub const BOLDCYAN: &str = "\x1b[1;36m";
    pub const BOLDYELLOW: &str = "\x1b[1;33m";
    pub const BOLDRED: &str = "\x1b[1;31m";
}

use std::cell::Cell;
use std::error::Error;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use log::{error, info, trace};

use window::{CursorMode, Keycode, Window, WindowConfig, WindowMode};

struct Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            println!(
                "{}{}{}: {}",
                match record.level() {
                    log::Level::Trace => term::BOLDMAGENTA,
                    log::Level::Info => term::BOLDCYAN,
                    log::Level::Warn => term::BOLDYELLOW,
                    log::Level::Error => term::BOLDRED,
                    _ => term::RESET,
                },
                record.level().as_str().to_lowercase(),
                term::RESET,
                record.args()
            );
        }
    }
    fn flush(&self) {}
}

static LOGGER: Logger = Logger;

//roughly 60 polls a second
const FRAME: Duration = Duration::from_millis(16);

fn main() -> Result<(), Box<dyn Error>> {
    let verbose = std::env::args().any(|arg| arg == "--verbose" || arg == "-v");

    log::set_logger(&LOGGER)?;
    log::set_max_level(if verbose {
        log::LevelFilter::Trace
    } else {
        log::LevelFilter::Info
    });

    let config = WindowConfig::new("Casement")
        .size(800, 600)
        .window_mode(WindowMode::Windowed)
        .cursor_mode(CursorMode::Normal);

    let mut window = window::create(config)?;

    let failed = Rc::new(Cell::new(false));

    let flag = failed.clone();
    window.on_error(move |e| {
        error!("{}", e);
        flag.set(true);
    });
    window.on_window_closed(|| info!("closed"));
    window.on_window_resized(|width, height| info!("resized to {}x{}", width, height));
    window.on_key_pressed(|key, repeated, count| {
        if !repeated {
            info!("pressed {:?}", key);
        } else {
            trace!("repeated {:?} ({})", key, count);
        }
    });
    window.on_key_released(|key| info!("released {:?}", key));
    window.on_char_typed(|c| trace!("typed {:?}", c));
    window.on_mouse_moved(|x, y| trace!("mouse at {}, {}", x, y));
    window.on_mouse_pressed(|button| info!("mouse {:?} pressed", button));
    window.on_mouse_released(|button| info!("mouse {:?} released", button));
    window.on_mouse_scrolled(|magnitude, vertical| {
        info!(
            "scrolled {} {}",
            magnitude,
            if vertical { "vertically" } else { "horizontally" }
        )
    });

    window.launch();

    let mut toggle_held = false;

    //an unreachable display leaves nothing to poll
    while !window.should_close() && !failed.get() {
        window.poll_events();

        if window.key_pressed(Keycode::F11) != toggle_held {
            toggle_held = !toggle_held;
            if toggle_held {
                let mode = match window.window_mode() {
                    WindowMode::Windowed => WindowMode::Fullscreen,
                    WindowMode::Fullscreen => WindowMode::Windowed,
                };
                window.set_window_mode(mode);
            }
        }

        thread::sleep(FRAME);
    }

    window.close();

    Ok(())
}
