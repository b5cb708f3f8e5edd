use super::{InputHistory, LiveInputs, LocalPlayer};
use crate::{convert::to_na_vec2, input::PlayerAction, tick::SimulationClock};
use bevy::prelude::*;
use leafwing_input_manager::prelude::ActionState;
use shared::{
    TickInput, add_input_delta,
    constants::{LOOK_SENSITIVITY, ZOOM_SENSITIVITY},
};

/// Folds this frame's device input into the live inputs of every local player.
///
/// Move is a level and is overwritten. Look and zoom accumulate so the per-tick delta can be
/// rebuilt from two recorded ticks. A jump press is counted and kept until recorded.
pub(super) fn sample_player_inputs(
    actions: Res<ActionState<PlayerAction>>,
    mut players: Query<&mut LiveInputs, With<LocalPlayer>>,
) {
    let move_input = to_na_vec2(actions.clamped_axis_pair(&PlayerAction::Move));
    let look = actions.axis_pair(&PlayerAction::Look);
    let zoom = actions.value(&PlayerAction::Zoom);
    let jump = actions.just_pressed(&PlayerAction::Jump);

    for mut live in &mut players {
        let inputs = &mut live.0;
        inputs.move_input = move_input;

        add_input_delta(&mut inputs.camera_look_input.x, look.x * LOOK_SENSITIVITY);
        // Screen-space mouse motion grows downward; positive look y looks up.
        add_input_delta(&mut inputs.camera_look_input.y, -look.y * LOOK_SENSITIVITY);
        // Scrolling up zooms in.
        add_input_delta(&mut inputs.camera_zoom_input, -zoom * ZOOM_SENSITIVITY);

        if jump {
            inputs.jump_pressed.set();
        }
    }
}

/// Stores the live inputs at the tick just started, then resets their events.
pub(super) fn record_player_inputs(
    clock: Res<SimulationClock>,
    mut players: Query<(&mut LiveInputs, &mut InputHistory), With<LocalPlayer>>,
) {
    let tick = clock.tick();
    for (mut live, mut history) in &mut players {
        history.0.add(tick, live.0);
        live.0.clear_events();
    }
}
