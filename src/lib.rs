// A minimal real-time rendering loop.
// The platform layer (`platform`, `surface`) owns the window and the back
// buffer; the game (`game`, `input`) fills a borrowed view of that buffer
// every frame; `frame_loop` ties the two together.

pub mod config;
pub mod error;
pub mod frame_loop;
pub mod game;
pub mod gamepad;
pub mod input;
pub mod platform;
pub mod surface;
pub mod types;

pub use config::Config;
pub use error::Error;
pub use frame_loop::{EventSource, FrameLoop, PlatformEvent};
pub use surface::{Backbuffer, Presenter, Surface};
pub use types::PixelBuffer;
