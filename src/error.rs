// One error type for the whole program.
// Every variant states *where* things went wrong, so the message printed on
// exit names the component that failed.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Creating the window failed.
    #[error("window init error: {0}")]
    WindowInit(String),

    /// Uploading the back buffer to the window failed.
    #[error("window update error: {0}")]
    WindowUpdate(String),

    /// The back buffer could not be (re)allocated.
    #[error("buffer allocation error: {width}x{height}: {reason}")]
    BufferAlloc {
        width: usize,
        height: usize,
        reason: String,
    },

    /// Memory handed to a pixel view is too small or the pitch is unusable.
    #[error("buffer layout error: {width}x{height} with pitch {pitch} does not fit {len} pixels")]
    BufferLayout {
        width: usize,
        height: usize,
        pitch: usize,
        len: usize,
    },

    /// Present was requested before any setup succeeded.
    #[error("surface error: present called on an unallocated surface")]
    SurfaceUnallocated,
}
