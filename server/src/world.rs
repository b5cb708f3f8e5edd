//! World geometry seeding and the Rapier query-world cache.
//!
//! - World statics are treated as immutable. We build once and reuse every tick.
//! - Insertion order is deterministic: `StaticWorld::build` sorts definitions by `id`.
//! - The cache is query-focused. It never steps a physics simulation.
//!
//! The cache lives in a `OnceLock`, so it is only valid while `world_static` does not change
//! after `init`.

use crate::schema::{WorldStatic, world_static};
use shared::{StaticWorld, WorldStaticDef, demo_world_statics};
use spacetimedb::{ReducerContext, Table};
use std::sync::OnceLock;

static STATIC_WORLD: OnceLock<StaticWorld> = OnceLock::new();

/// Replace every `world_static` row with the sample level.
pub fn recreate_static_world(ctx: &ReducerContext) {
    let stale: Vec<u32> = ctx.db.world_static().iter().map(|row| row.id).collect();
    for id in stale {
        ctx.db.world_static().id().delete(id);
    }
    let defs = demo_world_statics();
    for def in &defs {
        ctx.db.world_static().insert(WorldStatic::from(def));
    }
    log::info!("Seeded {} world statics", defs.len());
}

/// The cached Rapier query world, built from `world_static` on first use.
pub fn static_world(ctx: &ReducerContext) -> &'static StaticWorld {
    STATIC_WORLD.get_or_init(|| {
        let defs: Vec<WorldStaticDef> = ctx.db.world_static().iter().map(Into::into).collect();
        log::info!("Building static world from {} colliders", defs.len());
        StaticWorld::build(defs)
    })
}
