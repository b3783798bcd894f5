// The per-frame driver.
//
// One thread, strictly in order: drain events -> quit check -> resize ->
// update + render -> present -> carry input forward. Resizing happens only
// here, before rendering, so neither the renderer nor the presenter ever
// sees memory change underneath it.

use std::time::{Duration, Instant};

use log::{debug, info, trace};

use crate::config::Config;
use crate::error::Error;
use crate::game::{game_update_and_render, GameState};
use crate::input::{Axis, Button, GameInput, KEYBOARD_CONTROLLER};
use crate::surface::{Presenter, Surface};

/// Everything the platform layer can report between two frames.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PlatformEvent {
    Quit,
    Resized { width: usize, height: usize },
    /// A mapped keyboard key went down or up.
    Key { button: Button, down: bool },
    ControllerAttached(usize),
    ControllerDetached(usize),
    ControllerButton { slot: usize, button: Button, down: bool },
    ControllerAxis { slot: usize, axis: Axis, value: i16 },
}

/// Non-blocking event queue: `None` means "nothing more this frame".
pub trait EventSource {
    fn poll_event(&mut self) -> Option<PlatformEvent>;
}

/// Frame counter; reports ms/frame and frames/s once per second.
pub struct FrameStats {
    enabled: bool,
    frames_total: u64,
    frames_this_second: u32,
    last_report: Instant,
}

impl FrameStats {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, frames_total: 0, frames_this_second: 0, last_report: Instant::now() }
    }

    pub fn frames(&self) -> u64 {
        self.frames_total
    }

    fn frame_done(&mut self, now: Instant) {
        self.frames_total += 1;
        self.frames_this_second += 1;

        let elapsed = now.duration_since(self.last_report);
        if elapsed >= Duration::from_secs(1) {
            if self.enabled {
                let secs = elapsed.as_secs_f64();
                let fps = self.frames_this_second as f64 / secs;
                let ms_per_frame = 1000.0 * secs / self.frames_this_second as f64;
                info!("{:.2} ms/f, {:.1} f/s", ms_per_frame, fps);
            }
            self.frames_this_second = 0;
            self.last_report = now;
        }
    }
}

/// All mutable state of a running program, owned by the caller of `run`.
pub struct FrameLoop {
    surface: Surface,
    game: GameState,
    input: GameInput,
    stats: FrameStats,
    running: bool,
}

impl FrameLoop {
    /// Allocate the initial back buffer; failure here is fatal.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let mut surface = Surface::new();
        surface.setup(config.width, config.height)?;
        Ok(Self {
            surface,
            game: GameState::from_config(config),
            input: GameInput::new(),
            stats: FrameStats::new(config.report_fps),
            running: true,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn input(&self) -> &GameInput {
        &self.input
    }

    pub fn frames(&self) -> u64 {
        self.stats.frames()
    }

    /// Loop until a quit event arrives or a step fails.
    pub fn run<P>(&mut self, platform: &mut P) -> Result<(), Error>
    where
        P: EventSource + Presenter,
    {
        while self.step(platform)? {}
        info!("quit after {} frames", self.stats.frames());
        Ok(())
    }

    /// One iteration. Returns `Ok(false)` once quit has been observed; the
    /// frame in which quit arrives is neither rendered nor presented.
    pub fn step<P>(&mut self, platform: &mut P) -> Result<bool, Error>
    where
        P: EventSource + Presenter,
    {
        if !self.running {
            return Ok(false);
        }

        let mut pending_resize = None;
        while let Some(event) = platform.poll_event() {
            match event {
                PlatformEvent::Quit => self.running = false,
                PlatformEvent::Resized { width, height } => pending_resize = Some((width, height)),
                other => self.apply_input(other),
            }
        }
        if !self.running {
            return Ok(false);
        }

        if let Some((width, height)) = pending_resize {
            if self.surface.dimensions() != Some((width, height)) {
                self.surface.setup(width, height)?;
            }
        }

        if let Some(mut buffer) = self.surface.buffer_mut()? {
            game_update_and_render(&mut self.game, &self.input, &mut buffer);
        }
        self.surface.present(platform)?;

        self.input = self.input.next_frame();
        self.stats.frame_done(Instant::now());
        Ok(true)
    }

    fn apply_input(&mut self, event: PlatformEvent) {
        match event {
            PlatformEvent::Key { button, down } => {
                if let Some(keyboard) = self.input.controller_mut(KEYBOARD_CONTROLLER) {
                    keyboard.button_mut(button).process(down);
                }
            }
            PlatformEvent::ControllerAttached(slot) if slot != KEYBOARD_CONTROLLER => {
                if let Some(pad) = self.input.controller_mut(slot) {
                    debug!("controller attached in slot {slot}");
                    pad.is_connected = true;
                } else {
                    trace!("no room for controller in slot {slot}");
                }
            }
            PlatformEvent::ControllerDetached(slot) if slot != KEYBOARD_CONTROLLER => {
                if let Some(pad) = self.input.controller_mut(slot) {
                    debug!("controller detached from slot {slot}");
                    *pad = Default::default();
                }
            }
            PlatformEvent::ControllerButton { slot, button, down } => {
                match self.input.controller_mut(slot).filter(|c| c.is_connected) {
                    Some(pad) => pad.button_mut(button).process(down),
                    None => trace!("ignoring {button:?} for empty slot {slot}"),
                }
            }
            PlatformEvent::ControllerAxis { slot, axis, value } => {
                match self.input.controller_mut(slot).filter(|c| c.is_connected) {
                    Some(pad) => pad.sample_axis(axis, value),
                    None => trace!("ignoring {axis:?} for empty slot {slot}"),
                }
            }
            other => trace!("ignoring {other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_count_every_frame() {
        let start = Instant::now();
        let mut stats = FrameStats { last_report: start, ..FrameStats::new(true) };
        stats.frame_done(start + Duration::from_millis(500));
        stats.frame_done(start + Duration::from_millis(1200));
        assert_eq!(stats.frames(), 2);
        assert_eq!(stats.frames_this_second, 0);
        stats.frame_done(start + Duration::from_millis(1300));
        assert_eq!(stats.frames_this_second, 1);
    }
}
