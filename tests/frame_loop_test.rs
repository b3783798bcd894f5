// Frame loop integration tests.
// A scripted platform feeds a fixed batch of events per frame and records
// every frame it is asked to present.

use std::collections::VecDeque;

use weird_gradient::input::{Axis, Button};
use weird_gradient::surface::Backbuffer;
use weird_gradient::{Config, Error, EventSource, FrameLoop, PlatformEvent, Presenter};

#[derive(Debug, Clone, PartialEq)]
struct Presented {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Presented {
    fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }
}

/// One `VecDeque` of events per frame; polling past the end of a frame's
/// batch returns `None` until the next present.
#[derive(Default)]
struct ScriptedPlatform {
    frames: VecDeque<Vec<PlatformEvent>>,
    current: VecDeque<PlatformEvent>,
    presented: Vec<Presented>,
    started: bool,
}

impl ScriptedPlatform {
    fn new(frames: Vec<Vec<PlatformEvent>>) -> Self {
        Self { frames: frames.into(), ..Self::default() }
    }

    fn load_next_batch(&mut self) {
        self.current = self.frames.pop_front().unwrap_or_default().into();
    }
}

impl EventSource for ScriptedPlatform {
    fn poll_event(&mut self) -> Option<PlatformEvent> {
        if !self.started {
            self.started = true;
            self.load_next_batch();
        }
        self.current.pop_front()
    }
}

impl Presenter for ScriptedPlatform {
    fn present(&mut self, frame: &Backbuffer) -> Result<(), Error> {
        assert_eq!(frame.pitch(), frame.width() * 4);
        assert_eq!(frame.pixels().len(), frame.width() * frame.height());
        self.presented.push(Presented {
            width: frame.width(),
            height: frame.height(),
            pixels: frame.pixels().to_vec(),
        });
        self.load_next_batch();
        Ok(())
    }
}

fn config(width: usize, height: usize) -> Config {
    Config { width, height, ..Config::default() }
}

fn gradient(x: usize, y: usize, x_offset: i32, y_offset: i32) -> u32 {
    let red = (y as i32).wrapping_add(y_offset) as u8 as u32;
    let blue = (x as i32).wrapping_add(x_offset) as u8 as u32;
    (red << 16) | blue
}

#[test]
fn first_frame_matches_reference_pixels() {
    let mut frame_loop = FrameLoop::new(&config(100, 100)).unwrap();
    let mut platform = ScriptedPlatform::new(vec![vec![]]);

    assert!(frame_loop.step(&mut platform).unwrap());

    let frame = &platform.presented[0];
    assert_eq!((frame.width, frame.height), (100, 100));
    assert_eq!(frame.pixel(5, 7), 0x0007_05);
}

#[test]
fn free_running_clock_wraps_blue_channel() {
    let cfg = Config { x_step: 250, ..config(100, 100) };
    let mut frame_loop = FrameLoop::new(&cfg).unwrap();
    let mut platform = ScriptedPlatform::new(vec![vec![], vec![]]);

    frame_loop.step(&mut platform).unwrap();
    frame_loop.step(&mut platform).unwrap();

    // Second frame is drawn with x_offset = 250: (10 + 250) mod 256 = 4.
    assert_eq!(platform.presented[1].pixel(10, 0), 4);
}

#[test]
fn quit_stops_before_rendering() {
    let mut frame_loop = FrameLoop::new(&config(8, 8)).unwrap();
    let mut platform = ScriptedPlatform::new(vec![vec![], vec![], vec![PlatformEvent::Quit]]);

    frame_loop.run(&mut platform).unwrap();

    assert_eq!(platform.presented.len(), 2);
    assert_eq!(frame_loop.frames(), 2);
    assert!(!frame_loop.is_running());
    assert!(!frame_loop.step(&mut platform).unwrap());
}

#[test]
fn resize_applies_before_render_and_coalesces() {
    let mut frame_loop = FrameLoop::new(&config(4, 4)).unwrap();
    let mut platform = ScriptedPlatform::new(vec![
        vec![
            PlatformEvent::Resized { width: 50, height: 50 },
            PlatformEvent::Resized { width: 7, height: 3 },
        ],
        vec![PlatformEvent::Quit],
    ]);

    frame_loop.run(&mut platform).unwrap();

    assert_eq!(platform.presented.len(), 1);
    let frame = &platform.presented[0];
    assert_eq!((frame.width, frame.height), (7, 3));
    for y in 0..3 {
        for x in 0..7 {
            assert_eq!(frame.pixel(x, y), gradient(x, y, 0, 0));
        }
    }
    assert_eq!(frame_loop.surface().dimensions(), Some((7, 3)));
}

#[test]
fn zero_sized_window_presents_empty_frames() {
    let mut frame_loop = FrameLoop::new(&config(16, 16)).unwrap();
    let mut platform = ScriptedPlatform::new(vec![
        vec![PlatformEvent::Resized { width: 0, height: 0 }],
        vec![],
        vec![PlatformEvent::Quit],
    ]);

    frame_loop.run(&mut platform).unwrap();

    assert_eq!(platform.presented.len(), 2);
    assert!(platform.presented.iter().all(|f| f.pixels.is_empty()));
    // The clock keeps running while minimised.
    assert_eq!(frame_loop.game().x_offset, 2);
}

#[test]
fn resize_boundaries_stay_inside_new_buffer() {
    let sizes = [0usize, 1, 1920, 7681];
    for &width in &sizes {
        for &height in &sizes {
            // 7681x7681 is allocated in the surface unit tests; rendering and
            // copying it here would need close to half a gigabyte.
            if width * height > 1920 * 7681 {
                continue;
            }
            let mut frame_loop = FrameLoop::new(&config(2, 2)).unwrap();
            let mut platform =
                ScriptedPlatform::new(vec![vec![PlatformEvent::Resized { width, height }]]);

            frame_loop.step(&mut platform).unwrap();

            let frame = &platform.presented[0];
            assert_eq!((frame.width, frame.height), (width, height));
            assert_eq!(frame.pixels.len(), width * height);
            if width > 0 && height > 0 {
                assert_eq!(frame.pixel(width - 1, height - 1), gradient(width - 1, height - 1, 0, 0));
            }
        }
    }
}

#[test]
fn keyboard_scroll_button_moves_red_channel() {
    let mut frame_loop = FrameLoop::new(&config(4, 4)).unwrap();
    let mut platform = ScriptedPlatform::new(vec![
        vec![],
        vec![PlatformEvent::Key { button: Button::Up, down: true }],
        vec![],
        vec![PlatformEvent::Key { button: Button::Up, down: false }],
        vec![PlatformEvent::Quit],
    ]);

    frame_loop.run(&mut platform).unwrap();

    let y_offsets: Vec<u32> = platform.presented.iter().map(|f| f.pixel(0, 0) >> 16).collect();
    // Held for frames 2 and 3 (ended_down carries across frames), released on 4.
    assert_eq!(y_offsets, vec![0, 10, 20, 20]);
}

#[test]
fn unrelated_buttons_do_not_scroll() {
    let mut frame_loop = FrameLoop::new(&config(4, 4)).unwrap();
    let mut platform = ScriptedPlatform::new(vec![
        vec![PlatformEvent::Key { button: Button::Left, down: true }],
        vec![PlatformEvent::Quit],
    ]);

    frame_loop.run(&mut platform).unwrap();

    assert_eq!(frame_loop.game().y_offset, 0);
}

#[test]
fn controller_attach_and_detach_between_frames() {
    let mut frame_loop = FrameLoop::new(&config(4, 4)).unwrap();
    let mut platform = ScriptedPlatform::new(vec![
        // Button on an empty slot is ignored.
        vec![PlatformEvent::ControllerButton { slot: 2, button: Button::Up, down: true }],
        vec![
            PlatformEvent::ControllerAttached(2),
            PlatformEvent::ControllerButton { slot: 2, button: Button::Up, down: true },
        ],
        vec![PlatformEvent::ControllerDetached(2)],
        vec![PlatformEvent::Quit],
    ]);

    frame_loop.run(&mut platform).unwrap();

    let y_offsets: Vec<u32> = platform.presented.iter().map(|f| f.pixel(0, 0) >> 16).collect();
    assert_eq!(y_offsets, vec![0, 10, 10]);
    assert!(!frame_loop.input().controllers[2].is_connected);
}

#[test]
fn analog_samples_reach_the_controller() {
    let mut frame_loop = FrameLoop::new(&config(2, 2)).unwrap();
    let mut platform = ScriptedPlatform::new(vec![vec![
        PlatformEvent::ControllerAttached(1),
        PlatformEvent::ControllerAxis { slot: 1, axis: Axis::LeftX, value: i16::MIN },
        PlatformEvent::ControllerAxis { slot: 1, axis: Axis::LeftX, value: 0 },
        PlatformEvent::ControllerAxis { slot: 9, axis: Axis::LeftX, value: 0 },
    ]]);

    frame_loop.step(&mut platform).unwrap();

    // After the frame the window is carried forward: start = min = max = end.
    let pad = frame_loop.input().controllers[1];
    assert!(pad.is_connected);
    assert!(pad.is_analog);
    assert_eq!((pad.start_x, pad.min_x, pad.max_x, pad.end_x), (0.0, 0.0, 0.0, 0.0));
}

#[test]
fn keyboard_slot_cannot_be_detached() {
    let mut frame_loop = FrameLoop::new(&config(2, 2)).unwrap();
    let mut platform = ScriptedPlatform::new(vec![vec![PlatformEvent::ControllerDetached(0)]]);

    frame_loop.step(&mut platform).unwrap();

    assert!(frame_loop.input().controllers[0].is_connected);
}

#[test]
fn oversized_initial_buffer_is_an_error() {
    let err = FrameLoop::new(&config(usize::MAX, usize::MAX)).err().unwrap();
    assert!(matches!(err, Error::BufferAlloc { .. }));
    assert!(err.to_string().starts_with("buffer allocation error"));
}
