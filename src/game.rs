// Platform-independent half of the program: turns input into two offsets and
// paints the gradient into whatever buffer the platform hands over.

use crate::config::Config;
use crate::input::{Button, GameInput};
use crate::types::{pack_rgb, PixelBuffer};

/// Fill every pixel of `buffer` with the banded gradient.
///
/// Pixel (x, y) becomes `0x00RR00BB` with `RR = low8(y + y_offset)` and
/// `BB = low8(x + x_offset)`. Both channels wrap at 256 on purpose; the hard
/// edges every 256 pixels are the pattern.
pub fn render_weird_gradient(buffer: &mut PixelBuffer<'_>, x_offset: i32, y_offset: i32) {
    for (y, row) in buffer.rows_mut().enumerate() {
        let red = (y as i32).wrapping_add(y_offset) as u8;
        for (x, pixel) in row.iter_mut().enumerate() {
            let blue = (x as i32).wrapping_add(x_offset) as u8;
            *pixel = pack_rgb(red, 0, blue);
        }
    }
}

/// Scalars handed to the renderer for one frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameParams {
    pub x_offset: i32,
    pub y_offset: i32,
}

/// The only state the game keeps between frames.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub x_offset: i32,
    pub y_offset: i32,
    pub x_step: i32,
    pub y_step: i32,
    /// Holding this on any connected controller scrolls vertically.
    pub scroll_button: Button,
}

impl Default for GameState {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl GameState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            x_offset: 0,
            y_offset: 0,
            x_step: config.x_step,
            y_step: config.y_step,
            scroll_button: config.scroll_button,
        }
    }

    /// Apply this frame's input and return the offsets to draw with.
    pub fn derive(&mut self, input: &GameInput) -> FrameParams {
        if input.any_down(self.scroll_button) {
            self.y_offset = self.y_offset.wrapping_add(self.y_step);
        }
        FrameParams { x_offset: self.x_offset, y_offset: self.y_offset }
    }

    /// Free-running horizontal clock, ticked once per rendered frame.
    pub fn advance_clock(&mut self) {
        self.x_offset = self.x_offset.wrapping_add(self.x_step);
    }
}

/// One game tick: read input, draw, advance the clock.
pub fn game_update_and_render(state: &mut GameState, input: &GameInput, buffer: &mut PixelBuffer<'_>) -> FrameParams {
    let params = state.derive(input);
    render_weird_gradient(buffer, params.x_offset, params.y_offset);
    state.advance_clock();
    params
}
