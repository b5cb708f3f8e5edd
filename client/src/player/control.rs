use super::{InputHistory, Player};
use crate::{
    camera::{FollowedCharacter, OrbitCameraState, OrbitControl},
    character::{Control, SimCharacter, Tuning},
    tick::SimulationClock,
};
use bevy::prelude::*;
use shared::CameraView;

/// Turns the inputs of the current tick into each controlled character's [`Control`].
pub(super) fn fixed_step_control(
    clock: Res<SimulationClock>,
    players: Query<(&Player, &InputHistory)>,
    cameras: Query<&OrbitCameraState>,
    mut characters: Query<(&SimCharacter, &Tuning, &mut Control)>,
) {
    let tick = clock.tick();
    for (player, history) in &players {
        let link = player.0;
        let Ok((sim, tuning, mut control)) = characters.get_mut(link.controlled_character) else {
            continue;
        };

        let inputs = history.0.input_for_tick(tick).unwrap_or_default();
        let camera = CameraView {
            orbit: cameras.get(link.controlled_camera).ok().map(|c| &c.0),
            replicated_angles: None,
        };

        control.0 = shared::fixed_step_control(&inputs, sim.0.rotation, &tuning.0, camera);
    }
}

/// Hands the look/zoom deltas of every tick simulated since the last frame to each controlled
/// camera and points it at the controlled character.
pub(super) fn variable_step_control(
    clock: Res<SimulationClock>,
    players: Query<(&Player, &InputHistory)>,
    mut cameras: Query<(&mut OrbitControl, &mut FollowedCharacter)>,
) {
    for (player, history) in &players {
        let link = player.0;
        let Ok((mut control, mut followed)) = cameras.get_mut(link.controlled_camera) else {
            continue;
        };

        if followed.0 != Some(link.controlled_character) {
            followed.0 = Some(link.controlled_character);
        }

        if let Some(next) = shared::variable_step_control(&clock.0, &history.0, &control.0) {
            control.0 = next;
        }
    }
}
