// Window side of the program, built on minifb.
// 1) Shows the back buffer (0x00RRGGBB per pixel, exactly what minifb wants).
// 2) Turns window, keyboard and game pad state into `PlatformEvent`s for the
//    frame loop.
//
// minifb refreshes its input state inside `update`/`update_with_buffer`, so the
// events seen at the top of a frame are the ones collected while presenting
// the previous frame.

use std::collections::VecDeque;

use log::trace;
use minifb::{Key, KeyRepeat, ScaleMode, Window, WindowOptions};

use crate::config::Config;
use crate::error::Error;
use crate::frame_loop::{EventSource, PlatformEvent};
use crate::gamepad::Gamepads;
use crate::input::Button;
use crate::surface::{Backbuffer, Presenter};

pub struct Display {
    window: Window,                  // the on-screen window you see
    size: (usize, usize),            // last size reported as an event
    events: VecDeque<PlatformEvent>, // collected after each present, drained by the loop
    gamepads: Gamepads,              // controller slots 1..
    quit_sent: bool,
}

impl Display {
    /// Open a resizable window of the configured size.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let options = WindowOptions {
            resize: true,
            scale_mode: ScaleMode::UpperLeft,
            ..WindowOptions::default()
        };
        let mut window = Window::new(&config.title, config.width, config.height, options)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(config.target_fps);

        let mut events = VecDeque::new();
        let gamepads = Gamepads::new(&mut events);

        Ok(Self {
            window,
            size: (config.width, config.height),
            events,
            gamepads,
            quit_sent: false,
        })
    }

    /// Returns false when the user closes the window.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down.
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Turn the window state minifb just refreshed into queued events.
    fn collect_events(&mut self) {
        if !self.quit_sent && (!self.is_open() || self.esc_pressed()) {
            self.quit_sent = true;
            self.events.push_back(PlatformEvent::Quit);
        }

        let size = self.window.get_size();
        if size != self.size {
            self.size = size;
            self.events.push_back(PlatformEvent::Resized { width: size.0, height: size.1 });
        }

        for key in self.window.get_keys_pressed(KeyRepeat::No) {
            match map_key(key) {
                Some(button) => self.events.push_back(PlatformEvent::Key { button, down: true }),
                None => trace!("unmapped key {key:?}"),
            }
        }
        for key in self.window.get_keys_released() {
            if let Some(button) = map_key(key) {
                self.events.push_back(PlatformEvent::Key { button, down: false });
            }
        }

        self.gamepads.poll(&mut self.events);
    }
}

impl Presenter for Display {
    /// Push the pixels for this frame to the screen.
    fn present(&mut self, frame: &Backbuffer) -> Result<(), Error> {
        if frame.is_empty() {
            // Minimised: nothing to upload, but keep the window pumping.
            self.window.update();
        } else {
            self.window
                .update_with_buffer(frame.pixels(), frame.width(), frame.height())
                .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        }
        self.collect_events();
        Ok(())
    }
}

impl EventSource for Display {
    fn poll_event(&mut self) -> Option<PlatformEvent> {
        if self.events.is_empty() && !self.quit_sent && !self.is_open() {
            self.collect_events();
        }
        self.events.pop_front()
    }
}

/// Keyboard layout of controller 0: WASD or arrows, Q/E for the shoulders.
pub fn map_key(key: Key) -> Option<Button> {
    match key {
        Key::W | Key::Up => Some(Button::Up),
        Key::S | Key::Down => Some(Button::Down),
        Key::A | Key::Left => Some(Button::Left),
        Key::D | Key::Right => Some(Button::Right),
        Key::Q => Some(Button::LeftShoulder),
        Key::E => Some(Button::RightShoulder),
        _ => None,
    }
}
