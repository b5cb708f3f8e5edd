use crate::types::*;
use shared::{InputBuffer, NetworkTick, PlayerInputs};
use spacetimedb::*;

/// Buffered inputs of one player, one row per tick.
///
/// Private: only the owning client writes it (through `submit_input`) and only the simulation
/// reads it. At most `INPUT_BUFFER_CAPACITY` rows are kept per player.
#[table(name = player_input)]
#[derive(Clone, Debug)]
pub struct PlayerInput {
    #[primary_key]
    #[auto_inc]
    pub id: u64,

    #[index(btree)]
    pub owner: Identity,

    /// Raw `NetworkTick`.
    pub tick: u32,

    pub frame: InputFrame,
}

/// Rebuilds the input buffer of `owner` from its rows.
///
/// Each row carries the events of its own tick, as the client records them.
pub fn input_buffer(ctx: &ReducerContext, owner: Identity) -> InputBuffer<PlayerInputs> {
    let mut buffer = InputBuffer::default();
    for row in ctx.db.player_input().owner().filter(owner) {
        buffer.add(NetworkTick::from_raw(row.tick), row.frame.into());
    }
    buffer
}

/// Sorts rows by tick, oldest first, across a tick wrap.
pub fn sort_oldest_first(rows: &mut [PlayerInput]) {
    let Some(newest) = rows
        .iter()
        .map(|r| NetworkTick::from_raw(r.tick))
        .reduce(|a, b| if b.is_newer_than(a) { b } else { a })
    else {
        return;
    };
    rows.sort_by_key(|r| newest.ticks_since(NetworkTick::from_raw(r.tick)));
    rows.reverse();
}
