//! Local simulation clock.
//!
//! One Bevy fixed step is one network tick. The clock advances in `FixedFirst`, before the
//! inputs of the new tick are recorded and before anything in `FixedUpdate` reads them.

use bevy::prelude::*;
use shared::{NetworkTick, NetworkTime, constants::SIMULATION_TICK_HZ};

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(Time::<Fixed>::from_hz(SIMULATION_TICK_HZ as f64));
    app.init_resource::<SimulationClock>();
    app.configure_sets(FixedFirst, (TickSet::Advance, TickSet::Record).chain());
    app.add_systems(FixedFirst, advance_clock.in_set(TickSet::Advance));
}

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickSet {
    /// Moves the clock to the tick about to be simulated.
    Advance,
    /// Stores sampled inputs at the new tick.
    Record,
}

#[derive(Resource, Debug, Clone, Copy)]
pub struct SimulationClock(pub NetworkTime);

impl Default for SimulationClock {
    fn default() -> Self {
        Self(NetworkTime::starting())
    }
}

impl SimulationClock {
    pub fn tick(&self) -> NetworkTick {
        self.0.server_tick
    }
}

fn advance_clock(mut clock: ResMut<SimulationClock>) {
    clock.0.advance();
}
