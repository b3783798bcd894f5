// Game pads, read through gilrs.
// Pads take controller slots 1.. (slot 0 is the keyboard) in the order they
// appear, and their events are translated into `PlatformEvent`s: D-pad to
// Up/Down/Left/Right, LB/RB to the shoulders, left stick to LeftX/LeftY.
//
// A machine without pad support still runs; it just never sees a pad.

use std::collections::VecDeque;

use gilrs::{EventType, GamepadId, Gilrs};
use log::{debug, trace, warn};

use crate::frame_loop::PlatformEvent;
use crate::input::{Axis, Button, KEYBOARD_CONTROLLER, MAX_CONTROLLERS};

/// Which device sits in which controller slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotTable<T> {
    slots: [Option<T>; MAX_CONTROLLERS],
}

impl<T: Copy + PartialEq> Default for SlotTable<T> {
    fn default() -> Self {
        Self { slots: [None; MAX_CONTROLLERS] }
    }
}

impl<T: Copy + PartialEq> SlotTable<T> {
    pub fn slot_of(&self, id: T) -> Option<usize> {
        self.slots.iter().position(|s| *s == Some(id))
    }

    /// First free pad slot; `None` when every slot is taken. Attaching an
    /// id twice returns its existing slot.
    pub fn attach(&mut self, id: T) -> Option<usize> {
        if let Some(slot) = self.slot_of(id) {
            return Some(slot);
        }
        let slot = (0..MAX_CONTROLLERS)
            .filter(|&s| s != KEYBOARD_CONTROLLER)
            .find(|&s| self.slots[s].is_none())?;
        self.slots[slot] = Some(id);
        Some(slot)
    }

    pub fn detach(&mut self, id: T) -> Option<usize> {
        let slot = self.slot_of(id)?;
        self.slots[slot] = None;
        Some(slot)
    }
}

pub fn map_pad_button(button: gilrs::Button) -> Option<Button> {
    match button {
        gilrs::Button::DPadUp => Some(Button::Up),
        gilrs::Button::DPadDown => Some(Button::Down),
        gilrs::Button::DPadLeft => Some(Button::Left),
        gilrs::Button::DPadRight => Some(Button::Right),
        // gilrs names the bumpers LeftTrigger/RightTrigger; the analog triggers are *Trigger2.
        gilrs::Button::LeftTrigger => Some(Button::LeftShoulder),
        gilrs::Button::RightTrigger => Some(Button::RightShoulder),
        _ => None,
    }
}

pub fn map_pad_axis(axis: gilrs::Axis) -> Option<Axis> {
    match axis {
        gilrs::Axis::LeftStickX => Some(Axis::LeftX),
        gilrs::Axis::LeftStickY => Some(Axis::LeftY),
        _ => None,
    }
}

/// gilrs reports sticks in [-1, 1]; the input layer takes raw i16 samples.
pub fn stick_to_raw(value: f32) -> i16 {
    let value = if value.is_nan() { 0.0 } else { value.clamp(-1.0, 1.0) };
    if value < 0.0 {
        (value * 32768.0).round().max(i16::MIN as f32) as i16
    } else {
        (value * 32767.0).round() as i16
    }
}

pub struct Gamepads {
    gilrs: Option<Gilrs>,
    slots: SlotTable<GamepadId>,
}

impl Gamepads {
    /// Start gilrs and queue attach events for pads that are already plugged in.
    pub fn new(events: &mut VecDeque<PlatformEvent>) -> Self {
        let gilrs = match Gilrs::new() {
            Ok(gilrs) => Some(gilrs),
            Err(gilrs::Error::NotImplemented(dummy)) => {
                warn!("game pads are not supported on this platform");
                Some(dummy)
            }
            Err(e) => {
                warn!("game pad init failed, continuing with keyboard only: {e}");
                None
            }
        };

        let mut pads = Self { gilrs, slots: SlotTable::default() };
        let present: Vec<GamepadId> = match &pads.gilrs {
            Some(gilrs) => gilrs.gamepads().map(|(id, _)| id).collect(),
            None => Vec::new(),
        };
        for id in present {
            pads.attach(id, events);
        }
        pads
    }

    fn attach(&mut self, id: GamepadId, events: &mut VecDeque<PlatformEvent>) {
        match self.slots.attach(id) {
            Some(slot) => {
                debug!("game pad {id:?} -> slot {slot}");
                events.push_back(PlatformEvent::ControllerAttached(slot));
            }
            None => warn!("no free controller slot for game pad {id:?}"),
        }
    }

    /// Drain gilrs and translate everything mapped into `events`.
    pub fn poll(&mut self, events: &mut VecDeque<PlatformEvent>) {
        let mut pending = Vec::new();
        if let Some(gilrs) = self.gilrs.as_mut() {
            while let Some(gilrs::Event { id, event, .. }) = gilrs.next_event() {
                pending.push((id, event));
            }
        }

        for (id, event) in pending {
            match event {
                EventType::Connected => self.attach(id, events),
                EventType::Disconnected => {
                    if let Some(slot) = self.slots.detach(id) {
                        events.push_back(PlatformEvent::ControllerDetached(slot));
                    }
                }
                EventType::ButtonPressed(button, _) | EventType::ButtonReleased(button, _) => {
                    let down = matches!(event, EventType::ButtonPressed(..));
                    match (self.slots.slot_of(id), map_pad_button(button)) {
                        (Some(slot), Some(button)) => {
                            events.push_back(PlatformEvent::ControllerButton { slot, button, down })
                        }
                        _ => trace!("unmapped pad button {button:?}"),
                    }
                }
                EventType::AxisChanged(axis, value, _) => {
                    if let (Some(slot), Some(axis)) = (self.slots.slot_of(id), map_pad_axis(axis)) {
                        events.push_back(PlatformEvent::ControllerAxis { slot, axis, value: stick_to_raw(value) });
                    }
                }
                _ => (),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dpad_and_bumpers_map_to_buttons() {
        assert_eq!(map_pad_button(gilrs::Button::DPadUp), Some(Button::Up));
        assert_eq!(map_pad_button(gilrs::Button::DPadDown), Some(Button::Down));
        assert_eq!(map_pad_button(gilrs::Button::DPadLeft), Some(Button::Left));
        assert_eq!(map_pad_button(gilrs::Button::DPadRight), Some(Button::Right));
        assert_eq!(map_pad_button(gilrs::Button::LeftTrigger), Some(Button::LeftShoulder));
        assert_eq!(map_pad_button(gilrs::Button::RightTrigger), Some(Button::RightShoulder));
        assert_eq!(map_pad_button(gilrs::Button::LeftTrigger2), None);
        assert_eq!(map_pad_button(gilrs::Button::South), None);
    }

    #[test]
    fn left_stick_maps_to_axes() {
        assert_eq!(map_pad_axis(gilrs::Axis::LeftStickX), Some(Axis::LeftX));
        assert_eq!(map_pad_axis(gilrs::Axis::LeftStickY), Some(Axis::LeftY));
        assert_eq!(map_pad_axis(gilrs::Axis::RightStickX), None);
    }

    #[test]
    fn stick_values_scale_to_raw_range() {
        assert_eq!(stick_to_raw(1.0), i16::MAX);
        assert_eq!(stick_to_raw(-1.0), i16::MIN);
        assert_eq!(stick_to_raw(0.0), 0);
        assert_eq!(stick_to_raw(2.5), i16::MAX);
        assert_eq!(stick_to_raw(f32::NAN), 0);
    }

    #[test]
    fn pads_fill_slots_after_keyboard() {
        let mut slots = SlotTable::<u32>::default();
        assert_eq!(slots.attach(10), Some(1));
        assert_eq!(slots.attach(11), Some(2));
        assert_eq!(slots.attach(10), Some(1));
        assert_eq!(slots.attach(12), Some(3));
        assert_eq!(slots.attach(13), None);

        assert_eq!(slots.detach(11), Some(2));
        assert_eq!(slots.detach(11), None);
        assert_eq!(slots.attach(13), Some(2));
        assert_eq!(slots.slot_of(13), Some(2));
    }
}
