//! Rapier query world for immutable level geometry.
//!
//! Server and client build the same world from the same [`WorldStaticDef`] list (sorted by
//! `id` for deterministic insertion order). Only the broad phase is built: the kinematic
//! character controller needs scene queries, not a stepped simulation.

// Re-export Rapier so downstream crates can name its types without depending on it directly.
pub use rapier3d;

use rapier3d::na::{Isometry3, Translation3, UnitQuaternion};
use rapier3d::prelude::*;

/// Schema-agnostic definition of one static collider.
///
/// Conventions
/// - Units are meters.
/// - The collider is built in local space and placed with `translation` + `rotation`.
/// - Planes use `rotation * +Y` as their outward normal.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldStaticDef {
    /// Stable unique identifier used to order insertion.
    pub id: u32,
    pub translation: Vector<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub shape: ColliderShapeDef,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ColliderShapeDef {
    /// Infinite half-space, shifted along its normal by `offset_along_normal`.
    Plane { offset_along_normal: f32 },
    Cuboid { half_extents: Vector<f32> },
    CapsuleY { radius: f32, half_height: f32 },
}

impl WorldStaticDef {
    /// World pose of the collider, including the plane offset.
    pub fn pose(&self) -> Isometry3<f32> {
        let translation = match self.shape {
            ColliderShapeDef::Plane {
                offset_along_normal,
            } => self.translation + (self.rotation * Vector::<f32>::y()) * offset_along_normal,
            _ => self.translation,
        };
        Isometry3::from_parts(Translation3::from(translation), self.rotation)
    }
}

pub fn collider_from_def(def: &WorldStaticDef) -> Collider {
    let mut collider = match &def.shape {
        ColliderShapeDef::Plane { .. } => ColliderBuilder::halfspace(Vector::<f32>::y_axis()).build(),
        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build()
        }
        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius).build(),
    };
    collider.set_position(def.pose());
    collider
}

/// In-memory Rapier structures needed for scene queries against the static level.
pub struct StaticWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
}

impl StaticWorld {
    pub fn build(mut defs: Vec<WorldStaticDef>) -> Self {
        defs.sort_by_key(|d| d.id);

        let bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let modified_colliders: Vec<ColliderHandle> = defs
            .iter()
            .map(|def| colliders.insert(collider_from_def(def)))
            .collect();

        let mut broad_phase = BroadPhaseBvh::new();
        let mut events = Vec::new();
        broad_phase.update(
            &IntegrationParameters::default(),
            &colliders,
            &bodies,
            &modified_colliders,
            &[],
            &mut events,
        );

        Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase: NarrowPhase::default(),
        }
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// A borrowed query pipeline over the level, for scene queries and the KCC.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }
}

/// The sample level: a ground plane, a few blocks, a low step and a ramp.
pub fn demo_world_statics() -> Vec<WorldStaticDef> {
    let upright = UnitQuaternion::identity();
    vec![
        WorldStaticDef {
            id: 1,
            translation: vector![0.0, 0.0, 0.0],
            rotation: upright,
            shape: ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
        },
        WorldStaticDef {
            id: 2,
            translation: vector![5.0, 0.5, 0.0],
            rotation: upright,
            shape: ColliderShapeDef::Cuboid {
                half_extents: vector![0.5, 0.5, 0.5],
            },
        },
        WorldStaticDef {
            id: 3,
            translation: vector![-4.0, 0.15, -4.0],
            rotation: upright,
            shape: ColliderShapeDef::Cuboid {
                half_extents: vector![1.5, 0.15, 1.5],
            },
        },
        WorldStaticDef {
            id: 4,
            translation: vector![0.0, 0.6, -10.0],
            rotation: UnitQuaternion::from_axis_angle(&Vector::<f32>::x_axis(), 20f32.to_radians()),
            shape: ColliderShapeDef::Cuboid {
                half_extents: vector![2.0, 0.25, 4.0],
            },
        },
        WorldStaticDef {
            id: 5,
            translation: vector![-6.0, 1.5, 6.0],
            rotation: upright,
            shape: ColliderShapeDef::CapsuleY {
                radius: 0.75,
                half_height: 0.75,
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_pose_shifts_along_normal() {
        let def = WorldStaticDef {
            id: 1,
            translation: vector![0.0, 1.0, 0.0],
            rotation: UnitQuaternion::identity(),
            shape: ColliderShapeDef::Plane {
                offset_along_normal: 0.5,
            },
        };
        let pose = def.pose();
        assert!((pose.translation.vector - vector![0.0, 1.5, 0.0]).norm() < 1.0e-6);
    }

    #[test]
    fn build_inserts_every_def() {
        let world = StaticWorld::build(demo_world_statics());
        assert_eq!(world.collider_count(), demo_world_statics().len());
    }

    #[test]
    fn demo_ids_are_unique() {
        let mut ids: Vec<u32> = demo_world_statics().iter().map(|d| d.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), demo_world_statics().len());
    }
}
