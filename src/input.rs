// Logical controller state for one sampling window (one frame).
//
// The platform layer feeds edges and axis samples in; the game reads the
// result once. Carrying state into the next frame is explicit: call
// `next_frame()`.

/// Keyboard is always controller 0; the remaining slots are game pads.
pub const MAX_CONTROLLERS: usize = 4;
pub const KEYBOARD_CONTROLLER: usize = 0;

/// Raw stick values inside this band read as centred.
pub const STICK_DEAD_ZONE: i16 = 7849;

/// Named digital buttons, in storage order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    LeftShoulder,
    RightShoulder,
}

impl Button {
    pub const COUNT: usize = 6;

    pub const ALL: [Button; Button::COUNT] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::LeftShoulder,
        Button::RightShoulder,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    /// Parse the lower-case names used in configuration.
    pub fn from_name(name: &str) -> Option<Button> {
        match name.trim().to_ascii_lowercase().as_str() {
            "up" => Some(Button::Up),
            "down" => Some(Button::Down),
            "left" => Some(Button::Left),
            "right" => Some(Button::Right),
            "left_shoulder" => Some(Button::LeftShoulder),
            "right_shoulder" => Some(Button::RightShoulder),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    LeftX,
    LeftY,
}

/// Press/release history of one button over one sampling window.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ButtonState {
    /// Edges seen this window. Press, release, press counts as 3.
    pub half_transition_count: u32,
    /// State after the last edge.
    pub ended_down: bool,
}

impl ButtonState {
    /// Record the button's current physical state. Only changes count as edges.
    pub fn process(&mut self, is_down: bool) {
        if self.ended_down != is_down {
            self.ended_down = is_down;
            self.half_transition_count += 1;
        }
    }

    /// Held at the end of the window, or tapped and released inside it.
    pub fn was_pressed(&self) -> bool {
        self.ended_down || self.half_transition_count >= 2
    }

    /// Same physical state, no edges yet.
    fn carried(&self) -> ButtonState {
        ButtonState { half_transition_count: 0, ended_down: self.ended_down }
    }
}

/// Map a raw stick reading to [-1, 1], with the dead zone collapsed to 0.
pub fn normalize_axis(raw: i16, dead_zone: i16) -> f32 {
    let dead_zone = dead_zone.max(0);
    if raw > -dead_zone && raw < dead_zone {
        0.0
    } else if raw < 0 {
        raw as f32 / 32768.0
    } else {
        raw as f32 / 32767.0
    }
}

/// One controller's view of one frame.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ControllerInput {
    pub is_connected: bool,
    pub is_analog: bool,

    pub start_x: f32,
    pub start_y: f32,

    pub min_x: f32,
    pub min_y: f32,

    pub max_x: f32,
    pub max_y: f32,

    pub end_x: f32,
    pub end_y: f32,

    buttons: [ButtonState; Button::COUNT],
}

impl ControllerInput {
    pub fn connected() -> Self {
        Self { is_connected: true, ..Self::default() }
    }

    pub fn button(&self, button: Button) -> &ButtonState {
        &self.buttons[button.index()]
    }

    pub fn button_mut(&mut self, button: Button) -> &mut ButtonState {
        &mut self.buttons[button.index()]
    }

    /// All buttons, paired with their names.
    pub fn buttons(&self) -> impl Iterator<Item = (Button, &ButtonState)> {
        Button::ALL.into_iter().zip(self.buttons.iter())
    }

    /// Feed one raw stick sample; the controller becomes analog from here on.
    pub fn sample_axis(&mut self, axis: Axis, raw: i16) {
        let value = normalize_axis(raw, STICK_DEAD_ZONE);
        self.is_analog = true;
        match axis {
            Axis::LeftX => {
                self.end_x = value;
                self.min_x = self.min_x.min(value);
                self.max_x = self.max_x.max(value);
            }
            Axis::LeftY => {
                self.end_y = value;
                self.min_y = self.min_y.min(value);
                self.max_y = self.max_y.max(value);
            }
        }
    }

    /// Fresh window that starts where this one ended.
    pub fn next_frame(&self) -> ControllerInput {
        let mut buttons = [ButtonState::default(); Button::COUNT];
        for (next, old) in buttons.iter_mut().zip(self.buttons.iter()) {
            *next = old.carried();
        }

        ControllerInput {
            is_connected: self.is_connected,
            is_analog: self.is_analog,
            start_x: self.end_x,
            start_y: self.end_y,
            min_x: self.end_x,
            min_y: self.end_y,
            max_x: self.end_x,
            max_y: self.end_y,
            end_x: self.end_x,
            end_y: self.end_y,
            buttons,
        }
    }
}

/// Every controller slot for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct GameInput {
    pub controllers: [ControllerInput; MAX_CONTROLLERS],
}

impl Default for GameInput {
    fn default() -> Self {
        Self::new()
    }
}

impl GameInput {
    /// Keyboard connected, game pad slots empty.
    pub fn new() -> Self {
        let mut controllers = [ControllerInput::default(); MAX_CONTROLLERS];
        controllers[KEYBOARD_CONTROLLER] = ControllerInput::connected();
        Self { controllers }
    }

    pub fn controller_mut(&mut self, slot: usize) -> Option<&mut ControllerInput> {
        self.controllers.get_mut(slot)
    }

    pub fn connected(&self) -> impl Iterator<Item = &ControllerInput> {
        self.controllers.iter().filter(|c| c.is_connected)
    }

    /// True when `button` ended down on any connected controller.
    pub fn any_down(&self, button: Button) -> bool {
        self.connected().any(|c| c.button(button).ended_down)
    }

    pub fn next_frame(&self) -> GameInput {
        let mut controllers = self.controllers;
        for c in controllers.iter_mut() {
            *c = c.next_frame();
        }
        GameInput { controllers }
    }
}
