//! Players driven by the server.
//!
//! - The `player` row of this client's identity spawns the local character, camera and player.
//!   Rows of other identities spawn a [`Replicated`] character that follows its `character` row.
//! - The simulation clock follows the published server tick, a few ticks ahead.
//! - Every tick recorded for the local player is submitted with `submit_input`.

use super::{InputHistory, LocalPlayer, Player};
use crate::{
    camera::OrbitControl,
    character::{Replicated, SimCharacter},
    module_bindings::{
        Character, CharacterTableAccess, Player as PlayerRow, SimulationTickTimer, submit_input,
    },
    server::{SpacetimeDB, types::character_state},
    tick::SimulationClock,
    world::{LOCAL_CHARACTER_COLOR, spawn_character, spawn_local_controls},
};
use bevy::{platform::collections::HashMap, prelude::*};
use bevy_spacetimedb::{ReadDeleteMessage, ReadInsertMessage, ReadUpdateMessage};
use shared::{
    NetworkTick,
    constants::{CHARACTER_SPAWN_TRANSLATION, CLIENT_TICK_LEAD, CLOCK_RESYNC_THRESHOLD_TICKS},
};
use spacetimedb_sdk::{Identity, Table};

const REMOTE_CHARACTER_COLOR: Color = Color::srgb(0.31, 0.55, 0.9);

/// Entities spawned for server rows.
#[derive(Resource, Default)]
pub struct ServerEntityMapping {
    /// `character` row id to its entity.
    pub characters: HashMap<u64, Entity>,
    /// Player identity to every entity spawned for it.
    pub players: HashMap<Identity, Vec<Entity>>,
}

/// Present once the simulation clock follows the server tick.
#[derive(Resource)]
pub struct ServerTickSynced;

pub(super) fn on_player_inserted(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    stdb: SpacetimeDB,
    mut msgs: ReadInsertMessage<PlayerRow>,
    mut mapping: ResMut<ServerEntityMapping>,
) {
    for msg in msgs.read() {
        let row = &msg.row;
        if mapping.players.contains_key(&row.identity) {
            continue;
        }

        let is_local = row.identity == stdb.identity();
        let translation = stdb
            .db()
            .character()
            .iter()
            .find(|character| character.id == row.character_id)
            .map(|character| Vec3::from(character.translation))
            .unwrap_or_else(|| Vec3::from_array(CHARACTER_SPAWN_TRANSLATION));
        let color = if is_local {
            LOCAL_CHARACTER_COLOR
        } else {
            REMOTE_CHARACTER_COLOR
        };

        let character = spawn_character(&mut commands, &mut meshes, &mut materials, translation, color);
        let mut spawned = vec![character];
        if is_local {
            let player = spawn_local_controls(&mut commands, character);
            spawned.push(player);
        } else {
            commands.entity(character).insert(Replicated);
        }
        debug!("Spawned {} entities for player {:?}", spawned.len(), row.identity);

        mapping.characters.insert(row.character_id, character);
        mapping.players.insert(row.identity, spawned);
    }
}

pub(super) fn on_player_deleted(
    mut commands: Commands,
    mut msgs: ReadDeleteMessage<PlayerRow>,
    mut mapping: ResMut<ServerEntityMapping>,
    players: Query<&Player>,
) {
    for msg in msgs.read() {
        mapping.characters.remove(&msg.row.character_id);
        let Some(entities) = mapping.players.remove(&msg.row.identity) else {
            continue;
        };
        for entity in entities {
            if let Ok(player) = players.get(entity) {
                commands.entity(player.0.controlled_camera).despawn();
            }
            commands.entity(entity).despawn();
        }
    }
}

pub(super) fn on_character_updated(
    mut msgs: ReadUpdateMessage<Character>,
    mapping: Res<ServerEntityMapping>,
    mut characters: Query<&mut SimCharacter, With<Replicated>>,
) {
    for msg in msgs.read() {
        let Some(&entity) = mapping.characters.get(&msg.new.id) else {
            continue;
        };
        let Ok(mut sim) = characters.get_mut(entity) else {
            continue;
        };
        sim.0 = character_state(&msg.new);
    }
}

/// Keeps the clock `CLIENT_TICK_LEAD` ticks ahead of the server.
///
/// A resync drops the recorded inputs of local players, since their ticks no longer line up.
pub(super) fn sync_clock(
    mut commands: Commands,
    mut inserted: ReadInsertMessage<SimulationTickTimer>,
    mut updated: ReadUpdateMessage<SimulationTickTimer>,
    mut clock: ResMut<SimulationClock>,
    mut players: Query<(&Player, &mut InputHistory), With<LocalPlayer>>,
    mut controls: Query<&mut OrbitControl>,
) {
    let newest = inserted
        .read()
        .map(|msg| msg.row.tick)
        .chain(updated.read().map(|msg| msg.new.tick))
        .last();
    let Some(raw) = newest else {
        return;
    };

    let server_tick = NetworkTick::from_raw(raw);
    if !clock
        .0
        .sync_to_server(server_tick, CLIENT_TICK_LEAD, CLOCK_RESYNC_THRESHOLD_TICKS)
    {
        return;
    }
    info!(
        "Simulation clock synced to tick {} (server {})",
        clock.tick().tick_index(),
        server_tick.tick_index()
    );
    commands.insert_resource(ServerTickSynced);

    for (player, mut history) in &mut players {
        history.0.clear();
        if let Ok(mut control) = controls.get_mut(player.0.controlled_camera) {
            control.0.applied_tick = NetworkTick::INVALID;
        }
    }
}

/// Sends the inputs just recorded for the local player.
pub(super) fn submit_local_inputs(
    clock: Res<SimulationClock>,
    stdb: SpacetimeDB,
    players: Query<&InputHistory, With<LocalPlayer>>,
) {
    let tick = clock.tick();
    for history in &players {
        let Some(inputs) = history.0.input_for_tick(tick) else {
            continue;
        };
        if let Err(err) = stdb.reducers().submit_input(tick.tick_index(), inputs.into()) {
            warn!("Failed to submit input for tick {}: {err}", tick.tick_index());
        }
    }
}
