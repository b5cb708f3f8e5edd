//! Orbit camera state and the camera-rotation math the control glue depends on.
//!
//! The camera is described by a planar forward direction (on the character's up plane) plus a
//! pitch angle instead of a full rotation. That is all that needs replicating, and the
//! rotation is recomputed from it on every peer with [`calculate_camera_rotation`].

use crate::math::{
    Quat, Vec3, create_rotation_with_up_priority, euler_pitch_yaw, forward_from_rotation,
    look_rotation_safe, normalize_or_zero, project_on_plane, sharpness_interpolant, up_axis,
};
use crate::tick::NetworkTick;
use nalgebra::Vector2;

/// Camera rotation from the up direction, a planar forward and a pitch in degrees.
///
/// Positive pitch looks down.
pub fn calculate_camera_rotation(up: Vec3, planar_forward: Vec3, pitch_degrees: f32) -> Quat {
    create_rotation_with_up_priority(up, planar_forward) * euler_pitch_yaw(pitch_degrees, 0.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCameraSettings {
    /// Degrees of rotation per degree of look input.
    pub rotation_speed: f32,
    pub min_pitch_degrees: f32,
    pub max_pitch_degrees: f32,
    pub start_distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Distance change per unit of zoom input.
    pub distance_movement_speed: f32,
    pub distance_movement_sharpness: f32,
}

impl Default for OrbitCameraSettings {
    fn default() -> Self {
        Self {
            rotation_speed: 2.0,
            min_pitch_degrees: -89.0,
            max_pitch_degrees: 89.0,
            start_distance: 5.0,
            min_distance: 0.0,
            max_distance: 10.0,
            distance_movement_speed: 1.0,
            distance_movement_sharpness: 20.0,
        }
    }
}

/// Orbit camera around a followed character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    /// Unit forward on the character's up plane.
    pub planar_forward: Vec3,
    pub pitch_degrees: f32,
    /// Distance the zoom input asks for.
    pub target_distance: f32,
    /// Smoothed distance actually used.
    pub current_distance: f32,
    pub settings: OrbitCameraSettings,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(OrbitCameraSettings::default())
    }
}

impl OrbitCamera {
    pub fn new(settings: OrbitCameraSettings) -> Self {
        let start = settings
            .start_distance
            .clamp(settings.min_distance, settings.max_distance);
        Self {
            planar_forward: -Vec3::z(),
            pitch_degrees: 0.0,
            target_distance: start,
            current_distance: start,
            settings,
        }
    }

    pub fn rotation(&self, up: Vec3) -> Quat {
        calculate_camera_rotation(up, self.planar_forward, self.pitch_degrees)
    }

    /// Applies one tick of look/zoom deltas.
    ///
    /// - Positive `look_degrees_delta.x` turns right, positive `y` looks up.
    /// - Pitch is clamped to the settings range.
    /// - Positive `zoom_delta` moves the camera away; the target distance is clamped and the
    ///   current distance follows it with `distance_movement_sharpness`.
    pub fn apply_control(&mut self, control: &OrbitCameraControl, up: Vec3, dt: f32) {
        let s = self.settings;
        let up_axis = up_axis(up);

        let yaw = Quat::from_axis_angle(
            &up_axis,
            -(control.look_degrees_delta.x * s.rotation_speed).to_radians(),
        );
        let rotated = project_on_plane(yaw * self.planar_forward, up_axis.into_inner());
        self.planar_forward = match normalize_or_zero(rotated) {
            v if v == Vec3::zeros() => forward_from_rotation(
                create_rotation_with_up_priority(up_axis.into_inner(), self.planar_forward),
            ),
            v => v,
        };

        self.pitch_degrees = (self.pitch_degrees - control.look_degrees_delta.y * s.rotation_speed)
            .clamp(s.min_pitch_degrees, s.max_pitch_degrees);

        self.target_distance = (self.target_distance
            + control.zoom_delta * s.distance_movement_speed)
            .clamp(s.min_distance, s.max_distance);
        let t = sharpness_interpolant(s.distance_movement_sharpness, dt);
        self.current_distance += (self.target_distance - self.current_distance) * t;
    }

    /// World translation and rotation of the camera orbiting `target`.
    pub fn camera_pose(&self, target: Vec3, up: Vec3) -> (Vec3, Quat) {
        let rotation = self.rotation(up);
        let translation = target - forward_from_rotation(rotation) * self.current_distance;
        (translation, rotation)
    }
}

/// Look and zoom deltas to apply to an orbit camera, reconstructed for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCameraControl {
    /// Degrees, `x` horizontal and `y` vertical.
    pub look_degrees_delta: Vector2<f32>,
    pub zoom_delta: f32,
    /// Tick whose deltas were last written; deltas of a tick are applied once.
    pub applied_tick: NetworkTick,
}

impl Default for OrbitCameraControl {
    fn default() -> Self {
        Self {
            look_degrees_delta: Vector2::zeros(),
            zoom_delta: 0.0,
            applied_tick: NetworkTick::INVALID,
        }
    }
}

/// Compact replicated camera orientation: pitch/yaw angles around a planar forward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReplicatedCameraAngles {
    /// Degrees: `x` is pitch (positive looks down), `y` is yaw (positive turns right).
    pub camera_angles: Vector2<f32>,
    pub planar_forward: Vec3,
}

impl ReplicatedCameraAngles {
    pub fn rotation(&self, up: Vec3) -> Quat {
        look_rotation_safe(self.planar_forward, up)
            * euler_pitch_yaw(self.camera_angles.x, self.camera_angles.y)
    }
}
