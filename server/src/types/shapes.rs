use shared::rapier_world::{ColliderShapeDef, rapier3d::prelude::vector};

/// Capsule dimensions for collider definitions.
///
/// - `radius`: radius of spherical caps and cylinder.
/// - `half_height`: half of the cylinder length along local +Y.
/// - Total capsule height = `2*half_height + 2*radius`.
#[derive(spacetimedb::SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub struct DbCapsule {
    pub radius: f32,
    pub half_height: f32,
}

/// Collider shape used by world statics.
///
/// Rapier planes/half-spaces are infinite; any visual plane size is client-side only.
#[derive(spacetimedb::SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Infinite plane (half-space). `f32` is the offset along the plane normal
    /// `n = rotation * +Y`.
    Plane(f32),
    /// Oriented box defined by local half-extents (hx, hy, hz).
    Cuboid(super::DbVec3),
    /// Y-aligned capsule.
    Capsule(DbCapsule),
}

impl From<ColliderShape> for ColliderShapeDef {
    fn from(shape: ColliderShape) -> Self {
        match shape {
            ColliderShape::Plane(offset_along_normal) => ColliderShapeDef::Plane {
                offset_along_normal,
            },
            ColliderShape::Cuboid(he) => ColliderShapeDef::Cuboid {
                half_extents: vector![he.x, he.y, he.z],
            },
            ColliderShape::Capsule(dim) => ColliderShapeDef::CapsuleY {
                radius: dim.radius,
                half_height: dim.half_height,
            },
        }
    }
}

impl From<&ColliderShapeDef> for ColliderShape {
    fn from(def: &ColliderShapeDef) -> Self {
        match *def {
            ColliderShapeDef::Plane {
                offset_along_normal,
            } => ColliderShape::Plane(offset_along_normal),
            ColliderShapeDef::Cuboid { half_extents } => ColliderShape::Cuboid(half_extents.into()),
            ColliderShapeDef::CapsuleY {
                radius,
                half_height,
            } => ColliderShape::Capsule(DbCapsule {
                radius,
                half_height,
            }),
        }
    }
}
