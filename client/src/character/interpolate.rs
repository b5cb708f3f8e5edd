use super::SimCharacter;
use bevy::prelude::*;

/// Smoothly moves rendered character transforms toward the simulated state.
///
/// The simulation advances at the fixed tick rate; rendering runs at the frame rate. We use:
/// - `smooth_nudge` for translation,
/// - `slerp` for rotation, with an exponential smoothing factor.
pub fn smooth_character_transforms(
    time: Res<Time>,
    mut transform_q: Query<(&mut Transform, &SimCharacter)>,
) {
    let dt = time.delta_secs();
    transform_q.par_iter_mut().for_each(|(mut transform, sim)| {
        transform
            .translation
            .smooth_nudge(&sim.translation(), 24.0, dt);
        transform.rotation = transform
            .rotation
            .slerp(sim.rotation(), 1.0 - (-24.0 * dt).exp());
    });
}
