//! Client input submission.
//!
//! Clients send one [`InputFrame`] per simulated tick. Frames are stored in the private
//! `player_input` table, one row per tick, and read back by the simulation tick.
//!
//! Validation
//! - The caller must own a `Player` row.
//! - Every value must be finite; move axes must lie in `[-1, 1]`.
//! - The tick must be valid and within `INPUT_BUFFER_CAPACITY` ticks of the server tick, in
//!   either direction. Older frames can no longer be simulated; newer ones would evict frames
//!   that still can.
//!
//! A resubmitted tick replaces the stored frame.

use super::simulation_tick::current_server_tick;
use crate::{schema::*, types::InputFrame};
use shared::{NetworkTick, PlayerInputs, constants::INPUT_BUFFER_CAPACITY};
use spacetimedb::{Identity, ReducerContext, Table};

/// Whether a frame for `tick` may be stored while the server simulates `server_tick`.
pub fn input_tick_in_window(tick: NetworkTick, server_tick: NetworkTick) -> bool {
    if !tick.is_valid() || !server_tick.is_valid() {
        return false;
    }
    let ahead = tick.ticks_since(server_tick);
    let capacity = INPUT_BUFFER_CAPACITY as i32;
    ahead > -capacity && ahead <= capacity
}

pub fn validate_frame(frame: &InputFrame) -> Result<(), String> {
    let inputs = PlayerInputs::from(*frame);
    if !inputs.is_finite() {
        return Err("input frame contains non-finite values".into());
    }
    if inputs.move_input.iter().any(|v| v.abs() > 1.0) {
        return Err("move input out of range".into());
    }
    Ok(())
}

#[spacetimedb::reducer]
pub fn submit_input(ctx: &ReducerContext, tick: u32, frame: InputFrame) -> Result<(), String> {
    if ctx.db.player().identity().find(ctx.sender).is_none() {
        log::warn!("submit_input from unknown player {:?}", ctx.sender);
        return Err("unknown player".into());
    }

    if let Err(err) = validate_frame(&frame) {
        log::warn!("Rejected input from {:?}: {err}", ctx.sender);
        return Err(err);
    }

    let tick = NetworkTick::new(tick);
    let server_tick = current_server_tick(ctx);
    if !input_tick_in_window(tick, server_tick) {
        log::warn!(
            "Rejected input for tick {} from {:?}; server tick is {}",
            tick.tick_index(),
            ctx.sender,
            server_tick.tick_index()
        );
        return Err("input tick outside the buffer window".into());
    }

    store_frame(ctx, ctx.sender, tick, frame);
    Ok(())
}

fn store_frame(ctx: &ReducerContext, owner: Identity, tick: NetworkTick, frame: InputFrame) {
    let mut rows: Vec<PlayerInput> = ctx.db.player_input().owner().filter(owner).collect();

    if let Some(existing) = rows.iter_mut().find(|row| row.tick == tick.raw()) {
        existing.frame = frame;
        ctx.db.player_input().id().update(existing.clone());
        return;
    }

    let inserted = ctx.db.player_input().insert(PlayerInput {
        id: 0,
        owner,
        tick: tick.raw(),
        frame,
    });
    rows.push(inserted);

    if rows.len() <= INPUT_BUFFER_CAPACITY {
        return;
    }
    sort_oldest_first(&mut rows);
    let excess = rows.len() - INPUT_BUFFER_CAPACITY;
    for row in &rows[..excess] {
        ctx.db.player_input().id().delete(row.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DbVec2;

    #[test]
    fn window_accepts_recent_and_near_future_ticks() {
        let server = NetworkTick::new(1_000);
        assert!(input_tick_in_window(server, server));
        assert!(input_tick_in_window(NetworkTick::new(1_000 - 63), server));
        assert!(input_tick_in_window(NetworkTick::new(1_000 + 64), server));

        assert!(!input_tick_in_window(NetworkTick::new(1_000 - 64), server));
        assert!(!input_tick_in_window(NetworkTick::new(1_000 + 65), server));
        assert!(!input_tick_in_window(NetworkTick::INVALID, server));
    }

    #[test]
    fn window_wraps_with_the_tick() {
        let server = NetworkTick::new(NetworkTick::MAX_INDEX);
        assert!(input_tick_in_window(NetworkTick::new(3), server));
    }

    #[test]
    fn frames_with_bad_values_are_rejected() {
        let ok = InputFrame {
            move_input: DbVec2::new(1.0, -1.0),
            ..InputFrame::default()
        };
        assert!(validate_frame(&ok).is_ok());

        let nan = InputFrame {
            camera_zoom_input: f32::NAN,
            ..InputFrame::default()
        };
        assert!(validate_frame(&nan).is_err());

        let too_fast = InputFrame {
            move_input: DbVec2::new(2.0, 0.0),
            ..InputFrame::default()
        };
        assert!(validate_frame(&too_fast).is_err());
    }
}
