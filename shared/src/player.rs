//! Player record and the glue turning player inputs into camera and character control.
//!
//! The functions here are the bodies of the per-tick systems. The ECS side (Bevy on the
//! client, SpacetimeDB reducers on the server) only looks up the records and writes results.

use crate::{
    camera::{OrbitCamera, OrbitCameraControl, ReplicatedCameraAngles},
    control::CharacterControl,
    input::{PlayerInputs, input_delta},
    math::{
        Quat, Vec3, clamp_to_max_length, forward_from_rotation, normalize_or_zero,
        project_on_plane, right_from_rotation, up_from_rotation,
    },
    tick::{InputBuffer, NetworkTime, current_and_previous_tick, current_and_previous_tick_inputs},
    tuning::CharacterTuning,
};

/// Links a player to the character and camera it controls.
///
/// `E` is the entity key of the host: a Bevy `Entity` on the client, a row id on the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlayerLink<E> {
    pub controlled_character: E,
    pub controlled_camera: E,
}

/// Camera state available to the fixed-step control, if any.
#[derive(Clone, Copy, Debug, Default)]
pub struct CameraView<'a> {
    pub orbit: Option<&'a OrbitCamera>,
    pub replicated_angles: Option<&'a ReplicatedCameraAngles>,
}

/// Look/zoom deltas accumulated since the tick last handed out to `control`.
///
/// The baseline is `control.applied_tick` when it is still buffered, otherwise the tick before
/// the current one. A host that simulates several ticks per camera update therefore still gets
/// all of their look and zoom. Returns `None` when the current tick was already handed out.
pub fn variable_step_control(
    time: &NetworkTime,
    buffer: &InputBuffer<PlayerInputs>,
    control: &OrbitCameraControl,
) -> Option<OrbitCameraControl> {
    let (current_tick, previous_tick) = current_and_previous_tick(time);
    if !current_tick.is_valid() {
        return None;
    }
    let applied = control.applied_tick;
    if applied.is_valid() && !current_tick.is_newer_than(applied) {
        return None;
    }

    let baseline_tick = if applied.is_valid() && buffer.entry_at_tick(applied).is_some() {
        applied
    } else {
        previous_tick
    };
    let (current, previous) = current_and_previous_tick_inputs(buffer, current_tick, baseline_tick);
    Some(OrbitCameraControl {
        look_degrees_delta: nalgebra::Vector2::new(
            input_delta(current.camera_look_input.x, previous.camera_look_input.x),
            input_delta(current.camera_look_input.y, previous.camera_look_input.y),
        ),
        zoom_delta: input_delta(current.camera_zoom_input, previous.camera_zoom_input),
        applied_tick: current_tick,
    })
}

/// Rotation that the move input is relative to.
///
/// - Character-relative tuning: the character rotation.
/// - Camera-relative tuning: the orbit camera rotation, replaced by replicated camera angles
///   when the camera carries them; identity when the camera has neither.
pub fn movement_reference_rotation(
    tuning: &CharacterTuning,
    character_rotation: Quat,
    camera: CameraView<'_>,
) -> Quat {
    if !tuning.relative_movement {
        return character_rotation;
    }

    let character_up = up_from_rotation(character_rotation);
    let mut rotation = Quat::identity();
    if let Some(orbit) = camera.orbit {
        rotation = orbit.rotation(character_up);
    }
    if let Some(angles) = camera.replicated_angles {
        rotation = angles.rotation(character_up);
    }
    rotation
}

/// Builds the character control of one tick from that tick's inputs.
///
/// The move axes are rotated by [`movement_reference_rotation`]: forward is flattened onto the
/// character's up plane, so pitch never slows movement. The result is clamped to length 1.
pub fn fixed_step_control(
    inputs: &PlayerInputs,
    character_rotation: Quat,
    tuning: &CharacterTuning,
    camera: CameraView<'_>,
) -> CharacterControl {
    let character_up = up_from_rotation(character_rotation);
    let reference = movement_reference_rotation(tuning, character_rotation, camera);

    let forward_on_up_plane =
        normalize_or_zero(project_on_plane(forward_from_rotation(reference), character_up));
    let right: Vec3 = right_from_rotation(reference);

    let move_input = inputs.clamped_move_input();
    let move_vector = move_input.y * forward_on_up_plane + move_input.x * right;

    CharacterControl {
        move_vector: clamp_to_max_length(move_vector, 1.0),
        jump: inputs.jump_pressed.is_set(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{camera::OrbitCamera, input::add_input_delta, math::look_rotation_safe, tick::NetworkTick};
    use nalgebra::Vector2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).norm() < 1.0e-4
    }

    fn moving(x: f32, y: f32) -> PlayerInputs {
        PlayerInputs {
            move_input: Vector2::new(x, y),
            ..PlayerInputs::default()
        }
    }

    #[test]
    fn character_relative_forward_follows_facing() {
        let tuning = CharacterTuning::default();
        let facing_right = look_rotation_safe(Vec3::x(), Vec3::y());
        let control =
            fixed_step_control(&moving(0.0, 1.0), facing_right, &tuning, CameraView::default());
        assert!(approx(control.move_vector, Vec3::x()));
        assert!(!control.jump);
    }

    #[test]
    fn diagonal_input_is_clamped_to_unit_length() {
        let tuning = CharacterTuning::default();
        let control =
            fixed_step_control(&moving(1.0, 1.0), Quat::identity(), &tuning, CameraView::default());
        assert!((control.move_vector.norm() - 1.0).abs() < 1.0e-5);
        assert!(approx(
            control.move_vector,
            Vec3::new(1.0, 0.0, -1.0).normalize()
        ));
    }

    #[test]
    fn camera_relative_ignores_pitch() {
        let tuning = CharacterTuning {
            relative_movement: true,
            ..CharacterTuning::default()
        };
        let mut orbit = OrbitCamera::default();
        orbit.planar_forward = Vec3::x();
        orbit.pitch_degrees = 60.0;

        let control = fixed_step_control(
            &moving(0.0, 1.0),
            Quat::identity(),
            &tuning,
            CameraView {
                orbit: Some(&orbit),
                replicated_angles: None,
            },
        );
        assert!(approx(control.move_vector, Vec3::x()));
    }

    #[test]
    fn replicated_angles_override_orbit_camera() {
        let tuning = CharacterTuning {
            relative_movement: true,
            ..CharacterTuning::default()
        };
        let orbit = OrbitCamera::default();
        let angles = ReplicatedCameraAngles {
            camera_angles: Vector2::new(0.0, -90.0),
            planar_forward: -Vec3::z(),
        };

        let control = fixed_step_control(
            &moving(0.0, 1.0),
            Quat::identity(),
            &tuning,
            CameraView {
                orbit: Some(&orbit),
                replicated_angles: Some(&angles),
            },
        );
        assert!(approx(control.move_vector, -Vec3::x()));
    }

    #[test]
    fn camera_relative_without_camera_uses_identity() {
        let tuning = CharacterTuning {
            relative_movement: true,
            ..CharacterTuning::default()
        };
        let facing_right = look_rotation_safe(Vec3::x(), Vec3::y());
        let control =
            fixed_step_control(&moving(1.0, 0.0), facing_right, &tuning, CameraView::default());
        assert!(approx(control.move_vector, Vec3::x()));
    }

    #[test]
    fn jump_follows_event() {
        let tuning = CharacterTuning::default();
        let mut inputs = PlayerInputs::default();
        inputs.jump_pressed.set();
        let control =
            fixed_step_control(&inputs, Quat::identity(), &tuning, CameraView::default());
        assert!(control.jump);
        assert_eq!(control.move_vector, Vec3::zeros());
    }

    #[test]
    fn variable_step_deltas_are_handed_out_once_per_tick() {
        let mut buffer = InputBuffer::<PlayerInputs>::default();
        let mut live = PlayerInputs::default();

        buffer.add(NetworkTick::new(1), live);
        add_input_delta(&mut live.camera_look_input.x, 3.0);
        add_input_delta(&mut live.camera_zoom_input, -1.0);
        buffer.add(NetworkTick::new(2), live);

        let time = NetworkTime {
            server_tick: NetworkTick::new(2),
        };
        let deltas = variable_step_control(&time, &buffer, &OrbitCameraControl::default())
            .expect("new tick");
        assert!((deltas.look_degrees_delta.x - 3.0).abs() < 1.0e-5);
        assert_eq!(deltas.look_degrees_delta.y, 0.0);
        assert!((deltas.zoom_delta - -1.0).abs() < 1.0e-5);
        assert_eq!(deltas.applied_tick, NetworkTick::new(2));

        assert!(variable_step_control(&time, &buffer, &deltas).is_none());
    }

    #[test]
    fn variable_step_covers_every_tick_since_last_applied() {
        let mut buffer = InputBuffer::<PlayerInputs>::default();
        let mut live = PlayerInputs::default();
        for tick in 1..=3 {
            add_input_delta(&mut live.camera_look_input.x, 3.0);
            buffer.add(NetworkTick::new(tick), live);
        }

        let applied = OrbitCameraControl {
            applied_tick: NetworkTick::new(1),
            ..OrbitCameraControl::default()
        };
        let time = NetworkTime {
            server_tick: NetworkTick::new(3),
        };
        let deltas = variable_step_control(&time, &buffer, &applied).expect("new tick");
        assert!((deltas.look_degrees_delta.x - 6.0).abs() < 1.0e-5);

        // A camera that never applied anything only gets the current tick.
        let deltas = variable_step_control(&time, &buffer, &OrbitCameraControl::default())
            .expect("new tick");
        assert!((deltas.look_degrees_delta.x - 3.0).abs() < 1.0e-5);
    }

    #[test]
    fn variable_step_ignores_ticks_older_than_applied() {
        let mut buffer = InputBuffer::<PlayerInputs>::default();
        buffer.add(NetworkTick::new(4), PlayerInputs::default());
        let applied = OrbitCameraControl {
            applied_tick: NetworkTick::new(5),
            ..OrbitCameraControl::default()
        };
        let time = NetworkTime {
            server_tick: NetworkTick::new(4),
        };
        assert!(variable_step_control(&time, &buffer, &applied).is_none());
    }
}
