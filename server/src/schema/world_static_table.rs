use crate::types::*;
use shared::WorldStaticDef;
use spacetimedb::*;

/// Static collider rows used to build the immutable world collision geometry.
///
/// The server reads these rows into an in-memory Rapier query world once, and reuses it
/// every tick for the kinematic character controller. Clients load the same rows to build
/// their prediction world and to render the level.
#[table(name = world_static, public)]
pub struct WorldStatic {
    /// Unique id (primary key). Also orders collider insertion.
    #[primary_key]
    pub id: u32,

    /// World transform applied to the shape.
    pub translation: DbVec3,
    pub rotation: DbQuat,

    pub shape: ColliderShape,
}

impl From<&WorldStaticDef> for WorldStatic {
    fn from(def: &WorldStaticDef) -> Self {
        Self {
            id: def.id,
            translation: def.translation.into(),
            rotation: def.rotation.into(),
            shape: ColliderShape::from(&def.shape),
        }
    }
}

impl From<WorldStatic> for WorldStaticDef {
    fn from(row: WorldStatic) -> Self {
        Self {
            id: row.id,
            translation: row.translation.into(),
            rotation: row.rotation.into(),
            shape: row.shape.into(),
        }
    }
}
