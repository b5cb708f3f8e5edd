//! Authoritative simulation tick.
//!
//! This file contains:
//! - `SimulationTickTimer` scheduled table, which also publishes the current network tick
//! - `init(ctx)` to schedule the tick
//! - `simulation_tick` scheduled reducer
//!
//! Every tick, per player:
//! 1. variable step: look/zoom deltas of the tick are applied to the orbit camera (once);
//! 2. fixed step: the tick's inputs become the character control;
//! 3. motion: the character moves through the static world.
//!
//! The tick uses the fixed interval as its timestep so the server steps exactly like the
//! client's fixed update.

use crate::{
    schema::*,
    utils::{get_fixed_delta_time, get_variable_delta_time},
    world::static_world,
};
use shared::{
    CameraView, CharacterProperties, CharacterTuning, InputBuffer, NetworkTick, NetworkTime,
    OrbitCameraControl, PlayerInputs, StaticWorld,
    constants::{MAX_TICK_DT_S, SIMULATION_TICK_INTERVAL},
    fixed_step_control, kinematic_controller,
    rapier_world::rapier3d::control::KinematicCharacterController,
    simulate_character, variable_step_control,
};
use spacetimedb::{ReducerContext, ScheduleAt, Table, TimeDuration, Timestamp};

/// Scheduled timer for the simulation tick.
///
/// Scheduled tables must include a `scheduled_id: u64` primary key with `#[auto_inc]`.
/// Public so clients can align their tick clock with `tick`.
#[spacetimedb::table(name = simulation_tick_timer, public, scheduled(simulation_tick))]
pub struct SimulationTickTimer {
    /// Primary key for the scheduled job (single row used).
    #[primary_key]
    #[auto_inc]
    pub scheduled_id: u64,

    pub scheduled_at: ScheduleAt,

    /// Raw `NetworkTick` of the last simulated tick.
    pub tick: u32,

    /// Timestamp of the previous invocation.
    pub last_tick: Timestamp,
}

const TIMER_ID: u64 = 1;

/// Schedule the simulation tick, restarting the tick counter.
pub fn init(ctx: &ReducerContext) {
    let interval = TimeDuration::from_micros(SIMULATION_TICK_INTERVAL.as_micros() as i64);

    ctx.db.simulation_tick_timer().scheduled_id().delete(TIMER_ID);
    ctx.db.simulation_tick_timer().insert(SimulationTickTimer {
        scheduled_id: TIMER_ID,
        scheduled_at: ScheduleAt::Interval(interval),
        tick: NetworkTime::starting().server_tick.raw(),
        last_tick: ctx.timestamp,
    });
    log::info!("init simulation_tick");
}

/// The last simulated tick, invalid before `init` ran.
pub fn current_server_tick(ctx: &ReducerContext) -> NetworkTick {
    ctx.db
        .simulation_tick_timer()
        .scheduled_id()
        .find(TIMER_ID)
        .map(|timer| NetworkTick::from_raw(timer.tick))
        .unwrap_or(NetworkTick::INVALID)
}

/// Everything one tick needs besides the per-player rows.
pub struct TickContext<'a> {
    pub time: NetworkTime,
    pub world: &'a StaticWorld,
    pub controller: KinematicCharacterController,
    pub tuning: CharacterTuning,
    pub properties: CharacterProperties,
    pub dt: f32,
}

/// Runs one tick for one player on its rows.
pub fn step_player(
    tick: &TickContext<'_>,
    inputs: &InputBuffer<PlayerInputs>,
    camera: &mut OrbitCameraRow,
    character: &mut Character,
) {
    let up = tick.tuning.up();

    let mut orbit = camera.orbit();
    match variable_step_control(&tick.time, inputs, &camera.control()) {
        Some(control) => {
            orbit.apply_control(&control, up, tick.dt);
            camera.set_control(&control);
        }
        None => orbit.apply_control(&OrbitCameraControl::default(), up, tick.dt),
    }
    camera.set_orbit(&orbit);

    let mut state = character.state();
    let tick_inputs = inputs.input_for_tick(tick.time.server_tick).unwrap_or_default();
    let control = fixed_step_control(
        &tick_inputs,
        state.rotation,
        &tick.tuning,
        CameraView {
            orbit: Some(&orbit),
            replicated_angles: None,
        },
    );
    character.set_control(&control);

    simulate_character(
        tick.world,
        &tick.controller,
        &tick.tuning,
        &tick.properties,
        &control,
        &mut state,
        tick.dt,
    );
    character.set_state(&state);
}

#[spacetimedb::reducer]
pub fn simulation_tick(ctx: &ReducerContext, mut timer: SimulationTickTimer) -> Result<(), String> {
    // Only the server (module identity) may invoke scheduled reducers.
    if ctx.sender != ctx.identity() {
        log::error!("`simulation_tick` may not be invoked by clients.");
        return Err("`simulation_tick` may not be invoked by clients.".into());
    }

    let fixed_dt = get_fixed_delta_time(&timer.scheduled_at)
        .unwrap_or(SIMULATION_TICK_INTERVAL.as_secs_f32())
        .min(MAX_TICK_DT_S);
    let real_dt = get_variable_delta_time(ctx.timestamp, timer.last_tick).unwrap_or(fixed_dt);
    if real_dt > fixed_dt * 4.0 {
        log::debug!("simulation_tick stalled for {real_dt:.3}s");
    }

    let mut time = NetworkTime {
        server_tick: NetworkTick::from_raw(timer.tick),
    };
    if !time.server_tick.is_valid() {
        time = NetworkTime::starting();
    }
    time.advance();
    timer.tick = time.server_tick.raw();
    timer.last_tick = ctx.timestamp;
    ctx.db.simulation_tick_timer().scheduled_id().update(timer);

    let Some(tuning_row) = ctx.db.character_tuning().id().find(CharacterTuningRow::ID) else {
        return Err("`simulation_tick` couldn't find character tuning.".into());
    };
    let tuning = tuning_row.tuning();
    let properties = tuning_row.properties();
    let tick = TickContext {
        time,
        world: static_world(ctx),
        controller: kinematic_controller(&tuning, &properties),
        tuning,
        properties,
        dt: fixed_dt,
    };

    for player in ctx.db.player().iter() {
        let link = player.link();
        let Some(mut character) = ctx.db.character().id().find(link.controlled_character) else {
            log::error!("Failed to find character {} of {:?}", link.controlled_character, player.identity);
            continue;
        };
        let Some(mut camera) = ctx.db.orbit_camera().id().find(link.controlled_camera) else {
            log::error!("Failed to find camera {} of {:?}", link.controlled_camera, player.identity);
            continue;
        };

        let inputs = input_buffer(ctx, player.identity);
        step_player(&tick, &inputs, &mut camera, &mut character);

        ctx.db.orbit_camera().id().update(camera);
        ctx.db.character().id().update(character);
    }

    Ok(())
}
