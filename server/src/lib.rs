mod reducers {
    mod connection;
    pub mod simulation_tick;
    pub mod submit_input;
}
pub mod schema;
pub mod types;
mod utils;
mod world;

use crate::schema::*;
use spacetimedb::*;

#[reducer(init)]
pub fn init(ctx: &ReducerContext) {
    seed_character_tuning(ctx);
    world::recreate_static_world(ctx);
    reducers::simulation_tick::init(ctx);
}
