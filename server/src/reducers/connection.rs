//! Connection lifecycle reducers.
//!
//! - On connect: spawn a character and an orbit camera and link them to a new `Player` row.
//!   A stale row from an unclean disconnect is cleaned up first.
//! - On disconnect: delete the player, its character, its camera and its buffered inputs.

use crate::schema::*;
use crate::types::DbVec3;
use shared::constants::CHARACTER_SPAWN_TRANSLATION;
use spacetimedb::{Identity, ReducerContext, Table};

#[spacetimedb::reducer(client_connected)]
pub fn identity_connected(ctx: &ReducerContext) {
    log::info!("Client connected: {:?}", ctx.sender);

    if ctx.db.player().identity().find(ctx.sender).is_some() {
        log::warn!("Replacing stale player rows for {:?}", ctx.sender);
        despawn_player(ctx, ctx.sender);
    }

    let character = ctx.db.character().insert(Character::spawn(
        ctx.sender,
        DbVec3::from(CHARACTER_SPAWN_TRANSLATION),
    ));
    let camera = ctx
        .db
        .orbit_camera()
        .insert(OrbitCameraRow::spawn(ctx.sender, character.id));

    ctx.db.player().insert(Player {
        identity: ctx.sender,
        character_id: character.id,
        camera_id: camera.id,
    });
    log::info!(
        "Spawned character {} and camera {} for {:?}",
        character.id,
        camera.id,
        ctx.sender
    );
}

#[spacetimedb::reducer(client_disconnected)]
pub fn identity_disconnected(ctx: &ReducerContext) {
    log::info!("Client disconnected: {:?}", ctx.sender);
    despawn_player(ctx, ctx.sender);
}

fn despawn_player(ctx: &ReducerContext, identity: Identity) {
    let Some(player) = ctx.db.player().identity().find(identity) else {
        return;
    };

    ctx.db.character().id().delete(player.character_id);
    ctx.db.orbit_camera().id().delete(player.camera_id);
    let inputs: Vec<u64> = ctx
        .db
        .player_input()
        .owner()
        .filter(identity)
        .map(|row| row.id)
        .collect();
    for id in inputs {
        ctx.db.player_input().id().delete(id);
    }
    ctx.db.player().identity().delete(identity);
}
