// Core pixel types shared by the game and the platform layer.
//
// Pixel format: one native-endian u32 per pixel, packed 0x00RRGGBB. minifb
// reads exactly this layout; on little-endian hosts the bytes in memory are
// [B, G, R, 0].

use crate::error::Error;

/// Every pixel is one packed 32-bit value.
pub const BYTES_PER_PIXEL: usize = 4;

/// Pack three channels as 0x00RRGGBB.
#[inline]
pub fn pack_rgb(red: u8, green: u8, blue: u8) -> u32 {
    ((red as u32) << 16) | ((green as u32) << 8) | blue as u32
}

/// Non-owning view over a rectangle of packed pixels.
///
/// The memory belongs to whoever built the view (normally the `Surface`); the
/// view only lives for the duration of one render call. `pitch` is the byte
/// distance between the starts of consecutive rows and may include padding.
pub struct PixelBuffer<'a> {
    memory: &'a mut [u32],
    width: usize,
    height: usize,
    pitch: usize,
}

impl<'a> PixelBuffer<'a> {
    /// Describe `memory` as `height` rows of `width` pixels, `pitch` bytes apart.
    pub fn new(memory: &'a mut [u32], width: usize, height: usize, pitch: usize) -> Result<Self, Error> {
        let len = memory.len();
        let layout_error = || Error::BufferLayout { width, height, pitch, len };

        let min_pitch = width.checked_mul(BYTES_PER_PIXEL).ok_or_else(layout_error)?;
        if pitch < min_pitch || pitch % BYTES_PER_PIXEL != 0 {
            return Err(layout_error());
        }
        let needed = pitch.checked_mul(height).ok_or_else(layout_error)?;
        let available = len.checked_mul(BYTES_PER_PIXEL).ok_or_else(layout_error)?;
        if available < needed {
            return Err(layout_error());
        }

        Ok(Self { memory, width, height, pitch })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row stride in bytes.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn bytes_per_pixel(&self) -> usize {
        BYTES_PER_PIXEL
    }

    fn stride(&self) -> usize {
        self.pitch / BYTES_PER_PIXEL
    }

    /// Read back one pixel; `None` outside the drawable region.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.memory.get(y * self.stride() + x).copied()
    }

    /// The `width` pixels of row `y` (padding excluded).
    pub fn row_mut(&mut self, y: usize) -> Option<&mut [u32]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride();
        self.memory.get_mut(start..start + self.width)
    }

    /// Exactly `height` rows of exactly `width` pixels, top to bottom.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [u32]> + '_ {
        let width = self.width;
        // A zero pitch only happens with zero width, where there is nothing to visit.
        let rows = if width == 0 { 0 } else { self.height };
        let stride = self.stride().max(1);
        self.memory
            .chunks_mut(stride)
            .take(rows)
            .map(move |row| &mut row[..width])
    }
}
