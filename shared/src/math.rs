//! Rotation and vector helpers used by the control and motion glue.
//!
//! Conventions (right-handed, matching Bevy):
//! - `+Y` is up, `-Z` is forward, `+X` is right.
//! - Angles passed as "degrees" are converted here; everything else is radians.
//!
//! Every helper is total: degenerate inputs (zero vectors, parallel axes) produce a safe
//! fallback instead of NaNs.

use crate::constants::DIST_EPS;
use nalgebra::{Unit, UnitQuaternion, Vector3};
use std::f32::consts::PI;

pub type Vec3 = Vector3<f32>;
pub type Quat = UnitQuaternion<f32>;

#[inline]
pub fn up_from_rotation(rotation: Quat) -> Vec3 {
    rotation * Vec3::y()
}

#[inline]
pub fn forward_from_rotation(rotation: Quat) -> Vec3 {
    rotation * -Vec3::z()
}

#[inline]
pub fn right_from_rotation(rotation: Quat) -> Vec3 {
    rotation * Vec3::x()
}

/// Removes the component of `vector` along `plane_normal` (expected unit length).
#[inline]
pub fn project_on_plane(vector: Vec3, plane_normal: Vec3) -> Vec3 {
    vector - plane_normal * vector.dot(&plane_normal)
}

#[inline]
pub fn normalize_or_zero(vector: Vec3) -> Vec3 {
    vector.try_normalize(DIST_EPS).unwrap_or_else(Vec3::zeros)
}

/// Scales `vector` down so its length is at most `max_length`. Shorter vectors are unchanged.
#[inline]
pub fn clamp_to_max_length(vector: Vec3, max_length: f32) -> Vec3 {
    let max_length = max_length.max(0.0);
    let len_sq = vector.norm_squared();
    if len_sq > max_length * max_length && len_sq > DIST_EPS * DIST_EPS {
        vector * (max_length / len_sq.sqrt())
    } else {
        vector
    }
}

/// Unit `up`, falling back to world up for zero vectors.
#[inline]
pub fn up_axis(up: Vec3) -> Unit<Vec3> {
    Unit::try_new(up, DIST_EPS).unwrap_or_else(Vec3::y_axis)
}

/// Rotation whose forward (`-Z`) faces `forward` and whose up is as close as possible to `up`.
///
/// Returns identity when either vector is zero or both are parallel.
pub fn look_rotation_safe(forward: Vec3, up: Vec3) -> Quat {
    let forward = normalize_or_zero(forward);
    let up = normalize_or_zero(up);
    if forward == Vec3::zeros() || up == Vec3::zeros() {
        return Quat::identity();
    }
    if forward.cross(&up).norm_squared() <= DIST_EPS {
        return Quat::identity();
    }

    // `face_towards` maps +Z onto the given direction; our forward is -Z.
    Quat::face_towards(&-forward, &up)
}

/// Rotation that keeps `up` exact and faces `forward` as well as possible on the up plane.
///
/// When `forward` is parallel to `up`, any perpendicular forward is chosen.
pub fn create_rotation_with_up_priority(up: Vec3, forward: Vec3) -> Quat {
    let up = up_axis(up).into_inner();
    let mut planar = normalize_or_zero(project_on_plane(forward, up));
    if planar == Vec3::zeros() {
        let fallback = if up.z.abs() < 0.9 { -Vec3::z() } else { Vec3::x() };
        planar = normalize_or_zero(project_on_plane(fallback, up));
    }

    look_rotation_safe(planar, up)
}

/// Local rotation for a pitch/yaw pair in degrees.
///
/// Positive pitch looks down, positive yaw turns right. Yaw is applied after pitch.
pub fn euler_pitch_yaw(pitch_degrees: f32, yaw_degrees: f32) -> Quat {
    let yaw = Quat::from_axis_angle(&Vec3::y_axis(), -yaw_degrees.to_radians());
    let pitch = Quat::from_axis_angle(&Vec3::x_axis(), -pitch_degrees.to_radians());
    yaw * pitch
}

/// Frame-rate independent interpolation factor for exponential smoothing.
#[inline]
pub fn sharpness_interpolant(sharpness: f32, dt: f32) -> f32 {
    (1.0 - (-sharpness.max(0.0) * dt.max(0.0)).exp()).clamp(0.0, 1.0)
}

/// Rotates `rotation` about `up` toward facing `direction`, smoothed by `sharpness`.
///
/// Only the planar part of `direction` matters. Returns `rotation` unchanged for zero directions.
pub fn rotate_towards_direction_around_up(
    rotation: Quat,
    direction: Vec3,
    up: Vec3,
    sharpness: f32,
    dt: f32,
) -> Quat {
    let up = up_axis(up);
    let planar = normalize_or_zero(project_on_plane(direction, up.into_inner()));
    if planar == Vec3::zeros() {
        return rotation;
    }

    let target = look_rotation_safe(planar, up.into_inner());
    let t = sharpness_interpolant(sharpness, dt);
    rotation
        .try_slerp(&target, t, DIST_EPS)
        // Exactly opposite: there is no unique arc, so turn about `up`.
        .unwrap_or_else(|| Quat::from_axis_angle(&up, PI * t) * rotation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).norm() < 1.0e-4
    }

    #[test]
    fn identity_axes_follow_bevy_convention() {
        let q = Quat::identity();
        assert!(approx(up_from_rotation(q), Vec3::y()));
        assert!(approx(forward_from_rotation(q), -Vec3::z()));
        assert!(approx(right_from_rotation(q), Vec3::x()));
    }

    #[test]
    fn clamp_to_max_length_only_shrinks() {
        let long = Vec3::new(1.0, 0.0, 1.0);
        let clamped = clamp_to_max_length(long, 1.0);
        assert!((clamped.norm() - 1.0).abs() < 1.0e-5);
        assert!(approx(clamped.normalize(), long.normalize()));

        let short = Vec3::new(0.25, 0.0, 0.0);
        assert_eq!(clamp_to_max_length(short, 1.0), short);
        assert_eq!(clamp_to_max_length(Vec3::zeros(), 1.0), Vec3::zeros());
    }

    #[test]
    fn look_rotation_faces_forward_and_keeps_up() {
        let forward = Vec3::new(1.0, 0.0, 0.0);
        let q = look_rotation_safe(forward, Vec3::y());
        assert!(approx(forward_from_rotation(q), forward));
        assert!(approx(up_from_rotation(q), Vec3::y()));
        assert!(approx(right_from_rotation(q), Vec3::z()));
    }

    #[test]
    fn look_rotation_degenerate_is_identity() {
        assert_eq!(look_rotation_safe(Vec3::zeros(), Vec3::y()), Quat::identity());
        assert_eq!(look_rotation_safe(Vec3::y(), Vec3::y()), Quat::identity());
    }

    #[test]
    fn up_priority_flattens_forward() {
        let q = create_rotation_with_up_priority(Vec3::y(), Vec3::new(0.0, 5.0, -1.0));
        assert!(approx(up_from_rotation(q), Vec3::y()));
        assert!(approx(forward_from_rotation(q), -Vec3::z()));

        // Parallel forward still yields a valid frame.
        let q = create_rotation_with_up_priority(Vec3::y(), Vec3::y());
        assert!(approx(up_from_rotation(q), Vec3::y()));
        assert!(forward_from_rotation(q).y.abs() < 1.0e-4);
    }

    #[test]
    fn positive_pitch_looks_down_and_positive_yaw_turns_right() {
        let down = forward_from_rotation(euler_pitch_yaw(90.0, 0.0));
        assert!(approx(down, -Vec3::y()));

        let right = forward_from_rotation(euler_pitch_yaw(0.0, 90.0));
        assert!(approx(right, Vec3::x()));
    }

    #[test]
    fn sharpness_interpolant_is_bounded() {
        assert_eq!(sharpness_interpolant(10.0, 0.0), 0.0);
        assert!((sharpness_interpolant(1.0e6, 1.0) - 1.0).abs() < 1.0e-6);
        let mid = sharpness_interpolant(15.0, 1.0 / 60.0);
        assert!(mid > 0.0 && mid < 1.0);
    }

    #[test]
    fn rotate_towards_direction_reaches_target_with_high_sharpness() {
        let q = rotate_towards_direction_around_up(
            Quat::identity(),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::y(),
            1.0e6,
            1.0,
        );
        assert!(approx(forward_from_rotation(q), Vec3::x()));

        // Turning fully around still makes progress instead of stalling.
        let q = rotate_towards_direction_around_up(
            Quat::identity(),
            Vec3::z(),
            Vec3::y(),
            5.0,
            1.0 / 60.0,
        );
        assert!(!approx(forward_from_rotation(q), -Vec3::z()));
        assert!(approx(up_from_rotation(q), Vec3::y()));
    }
}
