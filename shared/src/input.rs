//! Player input record and the accumulation helpers used to replicate it.
//!
//! Continuous axes that must survive missed ticks (camera look, zoom) are never stored as
//! per-frame deltas. They are accumulated with [`add_input_delta`] and the per-tick delta is
//! reconstructed from two buffered ticks with [`input_delta`].

use crate::{constants::INPUT_ACCUMULATOR_WRAP, tick::TickInput};
use nalgebra::Vector2;

/// An edge-triggered input (e.g. "jump was pressed").
///
/// `count` is the number of presses folded into this value. Inside an input buffer the count is
/// cumulative, see [`TickInput`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputEvent {
    pub count: u32,
}

impl InputEvent {
    pub fn set(&mut self) {
        self.count = self.count.wrapping_add(1);
    }

    pub fn is_set(&self) -> bool {
        self.count > 0
    }
}

/// Raw per-tick input samples of one player.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerInputs {
    /// Planar move axes: `x` is right/left (D/A), `y` is forward/back (W/S). Each in `[-1, 1]`.
    pub move_input: Vector2<f32>,
    /// Accumulated camera look (degrees), `x` horizontal, `y` vertical.
    pub camera_look_input: Vector2<f32>,
    /// Accumulated camera zoom. Positive zooms out.
    pub camera_zoom_input: f32,
    pub jump_pressed: InputEvent,
}

impl TickInput for PlayerInputs {
    fn accumulate_events(&mut self, previous: &Self) {
        self.jump_pressed.count = self
            .jump_pressed
            .count
            .wrapping_add(previous.jump_pressed.count);
    }

    fn isolate_events(&mut self, previous: &Self) {
        self.jump_pressed.count = self
            .jump_pressed
            .count
            .wrapping_sub(previous.jump_pressed.count);
    }

    fn clear_events(&mut self) {
        self.jump_pressed = InputEvent::default();
    }
}

impl PlayerInputs {
    /// Whether every value is finite. Non-finite input is never simulated.
    pub fn is_finite(&self) -> bool {
        self.move_input.iter().all(|v| v.is_finite())
            && self.camera_look_input.iter().all(|v| v.is_finite())
            && self.camera_zoom_input.is_finite()
    }

    /// Move axes clamped component-wise to `[-1, 1]`.
    pub fn clamped_move_input(&self) -> Vector2<f32> {
        self.move_input.map(|v| v.clamp(-1.0, 1.0))
    }
}

/// Adds `delta` to an accumulated input axis, wrapping into `[0, INPUT_ACCUMULATOR_WRAP)`.
#[inline]
pub fn add_input_delta(input: &mut f32, delta: f32) {
    *input = (*input + delta).rem_euclid(INPUT_ACCUMULATOR_WRAP);
}

/// Delta between two accumulated input values, compensating for a wrap in between.
///
/// Assumes the real delta between two ticks is smaller than half the wrap range.
#[inline]
pub fn input_delta(current: f32, previous: f32) -> f32 {
    let delta = current - previous;
    if delta.abs() >= INPUT_ACCUMULATOR_WRAP * 0.5 {
        return delta + (previous - current).signum() * INPUT_ACCUMULATOR_WRAP;
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_is_set_after_set() {
        let mut event = InputEvent::default();
        assert!(!event.is_set());
        event.set();
        assert!(event.is_set());
        assert_eq!(event.count, 1);
    }

    #[test]
    fn delta_of_accumulated_axis_recovers_added_value() {
        let mut axis = 0.0;
        add_input_delta(&mut axis, 3.5);
        let previous = axis;
        add_input_delta(&mut axis, -1.25);
        assert!((input_delta(axis, previous) - -1.25).abs() < 1.0e-6);
    }

    #[test]
    fn delta_survives_accumulator_wrap() {
        let previous = INPUT_ACCUMULATOR_WRAP - 2.0;
        let mut current = previous;
        add_input_delta(&mut current, 5.0);
        assert!(current < previous);
        assert!((input_delta(current, previous) - 5.0).abs() < 1.0e-3);

        // And the other way around.
        let previous = 1.0;
        let mut current = previous;
        add_input_delta(&mut current, -4.0);
        assert!(current > previous);
        assert!((input_delta(current, previous) - -4.0).abs() < 1.0e-3);
    }

    #[test]
    fn events_accumulate_and_isolate() {
        let mut previous = PlayerInputs::default();
        previous.jump_pressed.count = 2;

        let mut current = PlayerInputs::default();
        current.jump_pressed.set();
        current.accumulate_events(&previous);
        assert_eq!(current.jump_pressed.count, 3);

        current.isolate_events(&previous);
        assert_eq!(current.jump_pressed.count, 1);
    }

    #[test]
    fn non_finite_inputs_are_detected() {
        let mut inputs = PlayerInputs::default();
        assert!(inputs.is_finite());
        inputs.camera_zoom_input = f32::NAN;
        assert!(!inputs.is_finite());
    }
}
