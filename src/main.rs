// What you SEE:
// • A window filled with a scrolling blue/red gradient that bands every 256 px.
// • It drifts sideways on its own; hold W / Up to scroll it vertically.
// • Resize the window and the gradient follows the new size. ESC quits.
// • RUST_LOG=info shows startup/resize lines; GRADIENT_REPORT_FPS=1 adds fps.

use std::process::ExitCode;

use log::{error, info};

use weird_gradient::platform::Display;
use weird_gradient::{Config, Error, FrameLoop};

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Error> {
    let config = Config::from_env();
    info!("starting {:?} at {}x{}", config.title, config.width, config.height);

    /* Window first, then the back buffer it will show. */
    let mut display = Display::new(&config)?;
    let mut frame_loop = FrameLoop::new(&config)?;

    frame_loop.run(&mut display)
}
