// Owner of the back buffer memory.
//
// Two states: nothing allocated, or one `Backbuffer` whose dimensions are the
// ones from the latest `setup`. The game only ever sees a borrowed
// `PixelBuffer` built from that backbuffer, so stale dimensions cannot reach
// the renderer.

use log::info;

use crate::error::Error;
use crate::types::{PixelBuffer, BYTES_PER_PIXEL};

/// Something that can put a finished frame on screen.
pub trait Presenter {
    fn present(&mut self, frame: &Backbuffer) -> Result<(), Error>;
}

/// Heap memory for one frame plus its layout.
pub struct Backbuffer {
    pixels: Vec<u32>, // each entry is 0x00RRGGBB for minifb
    width: usize,
    height: usize,
    pitch: usize,
}

impl Backbuffer {
    fn allocate(width: usize, height: usize) -> Result<Self, Error> {
        let alloc_error = |reason: String| Error::BufferAlloc { width, height, reason };

        let count = width
            .checked_mul(height)
            .filter(|n| n.checked_mul(BYTES_PER_PIXEL).is_some_and(|b| b <= isize::MAX as usize))
            .ok_or_else(|| alloc_error("size overflows the address space".into()))?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(count)
            .map_err(|e| alloc_error(e.to_string()))?;
        pixels.resize(count, 0);

        Ok(Self { pixels, width, height, pitch: width * BYTES_PER_PIXEL })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row stride in bytes; always `width * 4` for surface-owned memory.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Borrow the memory for one render call.
    pub fn view(&mut self) -> Result<PixelBuffer<'_>, Error> {
        PixelBuffer::new(&mut self.pixels, self.width, self.height, self.pitch)
    }
}

enum SurfaceState {
    Unallocated,
    Allocated(Backbuffer),
}

pub struct Surface {
    state: SurfaceState,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    pub fn new() -> Self {
        Self { state: SurfaceState::Unallocated }
    }

    pub fn is_allocated(&self) -> bool {
        matches!(self.state, SurfaceState::Allocated(_))
    }

    /// (Re)allocate the back buffer. The old block is released before the new
    /// one is requested; on failure the surface is left unallocated.
    pub fn setup(&mut self, width: usize, height: usize) -> Result<(), Error> {
        self.state = SurfaceState::Unallocated;
        let backbuffer = Backbuffer::allocate(width, height)?;
        info!("back buffer {}x{} (pitch {} bytes)", width, height, backbuffer.pitch);
        self.state = SurfaceState::Allocated(backbuffer);
        Ok(())
    }

    pub fn dimensions(&self) -> Option<(usize, usize)> {
        match &self.state {
            SurfaceState::Allocated(b) => Some((b.width, b.height)),
            SurfaceState::Unallocated => None,
        }
    }

    pub fn backbuffer(&self) -> Option<&Backbuffer> {
        match &self.state {
            SurfaceState::Allocated(b) => Some(b),
            SurfaceState::Unallocated => None,
        }
    }

    /// View for the renderer, or `None` before the first successful setup.
    pub fn buffer_mut(&mut self) -> Result<Option<PixelBuffer<'_>>, Error> {
        match &mut self.state {
            SurfaceState::Allocated(b) => b.view().map(Some),
            SurfaceState::Unallocated => Ok(None),
        }
    }

    /// Hand the current frame to the presenter without touching it.
    pub fn present<P: Presenter + ?Sized>(&self, presenter: &mut P) -> Result<(), Error> {
        match &self.state {
            SurfaceState::Allocated(b) => presenter.present(b),
            SurfaceState::Unallocated => Err(Error::SurfaceUnallocated),
        }
    }
}
