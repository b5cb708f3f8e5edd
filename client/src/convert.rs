//! Conversions between Bevy's glam types and the nalgebra types used by `shared`.

use bevy::prelude::{Quat, Vec2, Vec3};
use nalgebra::{Quaternion, UnitQuaternion, Vector2, Vector3};

pub fn to_na_vec2(v: Vec2) -> Vector2<f32> {
    Vector2::new(v.x, v.y)
}

pub fn to_na_vec3(v: Vec3) -> Vector3<f32> {
    Vector3::new(v.x, v.y, v.z)
}

pub fn to_vec3(v: &Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn to_na_quat(q: Quat) -> UnitQuaternion<f32> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

pub fn to_quat(q: &UnitQuaternion<f32>) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quaternions_survive_the_trip() {
        let q = Quat::from_rotation_y(0.7) * Quat::from_rotation_x(-0.3);
        let back = to_quat(&to_na_quat(q));
        assert!(q.angle_between(back) < 1.0e-5);

        // Same rotation of a vector on both sides.
        let v = Vec3::new(0.0, 0.0, -1.0);
        let na = to_na_quat(q) * to_na_vec3(v);
        assert!((to_vec3(&na) - q * v).length() < 1.0e-5);
    }
}
