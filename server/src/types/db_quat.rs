/// A unit quaternion (w + xi + yj + zk), stored as four `f32` scalars.
///
/// Stored in `(x, y, z, w)` order to match common game engine conventions.
#[derive(spacetimedb::SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub struct DbQuat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for DbQuat {
    /// Identity: facing -Z.
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

impl From<DbQuat> for nalgebra::UnitQuaternion<f32> {
    fn from(q: DbQuat) -> Self {
        nalgebra::UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(q.w, q.x, q.y, q.z))
    }
}

impl From<nalgebra::UnitQuaternion<f32>> for DbQuat {
    fn from(uq: nalgebra::UnitQuaternion<f32>) -> Self {
        let q = uq.into_inner();
        DbQuat {
            x: q.i,
            y: q.j,
            z: q.k,
            w: q.w,
        }
    }
}
