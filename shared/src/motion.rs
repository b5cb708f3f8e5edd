//! Character motion: turns a [`CharacterControl`] into velocity, rotation and a collision-
//! resolved translation.
//!
//! The velocity/rotation update is plain math over the tuning record. Collision, stepping and
//! slope handling are delegated to Rapier's `KinematicCharacterController` in
//! [`step_character`]; this module only feeds it a desired translation and reads back the
//! result.

use crate::{
    constants::{DIST_EPS, MAX_TICK_DT_S, TANK_TURN_DEGREES_PER_SECOND},
    control::CharacterControl,
    math::{
        Quat, Vec3, clamp_to_max_length, forward_from_rotation, normalize_or_zero,
        project_on_plane, right_from_rotation, rotate_towards_direction_around_up,
        sharpness_interpolant, up_axis,
    },
    rapier_world::StaticWorld,
    tuning::{CharacterProperties, CharacterTuning},
};
use rapier3d::control::KinematicCharacterController;
use rapier3d::na::Isometry3;
use rapier3d::prelude::{Capsule, QueryFilter};

/// Small downward speed (m/s) added to a grounded character's translation so the controller
/// keeps detecting ground contact on flat floors and gentle slopes.
const GROUNDED_DOWN_BIAS_MPS: f32 = 1.75;

/// Dynamic state the motion update owns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterBody {
    /// Meters per second.
    pub velocity: Vec3,
    pub grounded: bool,
    /// Normal of the supporting surface; the up direction when airborne.
    pub ground_normal: Vec3,
    /// Normal of the last non-walkable surface hit while airborne.
    pub obstruction_normal: Option<Vec3>,
}

impl Default for CharacterBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::zeros(),
            grounded: false,
            ground_normal: Vec3::y(),
            obstruction_normal: None,
        }
    }
}

/// Everything one simulation tick reads and writes for a character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterState {
    pub translation: Vec3,
    pub rotation: Quat,
    pub body: CharacterBody,
}

impl CharacterState {
    pub fn at(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::identity(),
            body: CharacterBody::default(),
        }
    }
}

/// Rotates `vector` onto the plane of `plane_normal`, keeping its length and its heading
/// around `up`.
pub fn reorient_on_plane(vector: Vec3, plane_normal: Vec3, up: Vec3) -> Vec3 {
    let length = vector.norm();
    if length <= DIST_EPS {
        return Vec3::zeros();
    }
    let right = vector.cross(&up);
    let tangent = normalize_or_zero(plane_normal.cross(&right));
    if tangent == Vec3::zeros() {
        return project_on_plane(vector, plane_normal);
    }
    tangent * length
}

/// The part of the move vector that drives velocity.
///
/// Tank movement only drives along the character's forward; the sideways part turns it.
fn driving_move_vector(tuning: &CharacterTuning, control: &CharacterControl, rotation: Quat, up: Vec3) -> Vec3 {
    if !tuning.tank_movement {
        return control.move_vector;
    }
    let forward = normalize_or_zero(project_on_plane(forward_from_rotation(rotation), up));
    forward * control.move_vector.dot(&forward)
}

/// Velocity update for one tick.
///
/// Grounded
/// - Velocity moves toward `move · ground_max_speed` (laid on the ground plane) with
///   `grounded_movement_sharpness`.
/// - A jump replaces the vertical velocity with `up · jump_speed` and ungrounds the body.
///
/// Airborne
/// - Planar acceleration `move · air_acceleration`. It never raises planar speed past
///   `air_max_speed` (a faster body keeps its speed but is not pushed further).
/// - With `prevent_air_acceleration_against_ungrounded_hits`, acceleration into the last
///   non-walkable obstruction is removed.
/// - Gravity, then drag `v /= 1 + drag · dt`.
pub fn update_velocity(
    tuning: &CharacterTuning,
    control: &CharacterControl,
    rotation: Quat,
    body: &mut CharacterBody,
    up: Vec3,
    dt: f32,
) {
    let drive = driving_move_vector(tuning, control, rotation, up);

    if body.grounded {
        let target = reorient_on_plane(drive * tuning.ground_max_speed, body.ground_normal, up);
        let t = sharpness_interpolant(tuning.grounded_movement_sharpness, dt);
        body.velocity = body.velocity.lerp(&target, t);

        if control.jump {
            body.velocity = project_on_plane(body.velocity, up) + up * tuning.jump_speed;
            body.grounded = false;
            body.ground_normal = up;
        }
        return;
    }

    let mut acceleration = drive * tuning.air_acceleration;
    if acceleration.norm_squared() > DIST_EPS {
        if tuning.prevent_air_acceleration_against_ungrounded_hits
            && let Some(normal) = body.obstruction_normal
        {
            let into = acceleration.dot(&normal);
            if into < 0.0 {
                acceleration -= normal * into;
            }
        }

        let planar = project_on_plane(body.velocity, up);
        let vertical = body.velocity - planar;
        let accelerated = planar + project_on_plane(acceleration, up) * dt;
        let speed_cap = tuning.air_max_speed.max(planar.norm());
        body.velocity = clamp_to_max_length(accelerated, speed_cap) + vertical;
    }

    body.velocity += tuning.gravity * dt;
    body.velocity /= 1.0 + tuning.air_drag.max(0.0) * dt;
}

/// Rotation update for one tick.
///
/// - Default: turn toward the move direction with `rotation_sharpness`.
/// - Tank movement: the sideways part of the move vector yaws at
///   [`TANK_TURN_DEGREES_PER_SECOND`] (positive = right).
pub fn update_rotation(
    tuning: &CharacterTuning,
    control: &CharacterControl,
    rotation: Quat,
    up: Vec3,
    dt: f32,
) -> Quat {
    if tuning.tank_movement {
        let turn = control.move_vector.dot(&right_from_rotation(rotation));
        if turn.abs() <= DIST_EPS {
            return rotation;
        }
        let yaw = Quat::from_axis_angle(
            &up_axis(up),
            -(turn * TANK_TURN_DEGREES_PER_SECOND * dt).to_radians(),
        );
        return yaw * rotation;
    }

    if control.move_vector.norm_squared() <= DIST_EPS {
        return rotation;
    }
    rotate_towards_direction_around_up(
        rotation,
        control.move_vector,
        up,
        tuning.rotation_sharpness,
        dt,
    )
}

/// Moves the body through the static world for one tick and refreshes its contact state.
///
/// Returns the new translation. Afterwards:
/// - `grounded` / `ground_normal` reflect the controller's ground detection.
/// - Velocity going into the ground or into an obstruction is removed; a grounded body's
///   velocity is kept on the ground plane when `constrain_velocity_to_ground_plane` is set.
#[allow(clippy::too_many_arguments)]
pub fn step_character(
    world: &StaticWorld,
    controller: &KinematicCharacterController,
    tuning: &CharacterTuning,
    properties: &CharacterProperties,
    translation: Vec3,
    body: &mut CharacterBody,
    up: Vec3,
    dt: f32,
) -> Vec3 {
    let shape = Capsule::new_y(properties.capsule_half_height, properties.capsule_radius);
    let pose = Isometry3::translation(translation.x, translation.y, translation.z);
    let query_pipeline = world.query_pipeline(QueryFilter::default());

    let mut desired = body.velocity * dt;
    if body.grounded {
        desired -= up * (GROUNDED_DOWN_BIAS_MPS * dt);
    }

    let min_ground_dot = properties.min_ground_normal_dot();
    let mut ground_normal: Option<Vec3> = None;
    let mut obstruction_normal: Option<Vec3> = None;
    let movement = controller.move_shape(dt, &query_pipeline, &shape, &pose, desired, |collision| {
        // Surface normal of the obstacle, facing against the attempted motion.
        let mut normal = -collision.hit.normal1.into_inner();
        if normal.dot(&desired) > DIST_EPS {
            normal = -normal;
        }
        if normal.dot(&up) >= min_ground_dot {
            ground_normal = Some(normal);
        } else {
            obstruction_normal = Some(normal);
        }
    });

    body.grounded = movement.grounded;
    body.ground_normal = match (body.grounded, ground_normal) {
        (true, Some(normal)) => normal,
        _ => up,
    };

    if body.grounded {
        let into_ground = body.velocity.dot(&body.ground_normal);
        if into_ground < 0.0 {
            body.velocity -= body.ground_normal * into_ground;
        }
        if tuning.step_and_slope.constrain_velocity_to_ground_plane {
            body.velocity = project_on_plane(body.velocity, body.ground_normal);
        }
        body.obstruction_normal = None;
    } else {
        if let Some(normal) = obstruction_normal {
            let into = body.velocity.dot(&normal);
            if into < 0.0 {
                body.velocity -= normal * into;
            }
        }
        body.obstruction_normal = obstruction_normal;
    }

    translation + movement.translation
}

/// One full simulation tick of a character: velocity, rotation, then collision-resolved motion.
///
/// `dt` is clamped to `[0, MAX_TICK_DT_S]`.
pub fn simulate_character(
    world: &StaticWorld,
    controller: &KinematicCharacterController,
    tuning: &CharacterTuning,
    properties: &CharacterProperties,
    control: &CharacterControl,
    state: &mut CharacterState,
    dt: f32,
) {
    let dt = dt.clamp(0.0, MAX_TICK_DT_S);
    if dt <= 0.0 {
        return;
    }
    let up = tuning.up();

    update_velocity(tuning, control, state.rotation, &mut state.body, up, dt);
    state.rotation = update_rotation(tuning, control, state.rotation, up, dt);
    state.translation = step_character(
        world,
        controller,
        tuning,
        properties,
        state.translation,
        &mut state.body,
        up,
        dt,
    );
}
