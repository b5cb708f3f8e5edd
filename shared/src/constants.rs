use std::time::Duration;

/// Fixed simulation rate (ticks per second) shared by client prediction and the server tick.
pub const SIMULATION_TICK_HZ: u32 = 60;

/// Duration of one simulation tick.
pub const SIMULATION_TICK_INTERVAL: Duration =
    Duration::from_micros(1_000_000 / SIMULATION_TICK_HZ as u64);

/// Largest delta time (seconds) a single simulation tick may integrate.
///
/// Keeps motion sane after stalls (debugger breaks, long frames, late scheduled reducers).
pub const MAX_TICK_DT_S: f32 = 0.1;

/// Maximum number of ticked input entries kept per player.
///
/// Inputs older than this window can no longer be looked up, and the server rejects
/// submissions that fall outside of it.
pub const INPUT_BUFFER_CAPACITY: usize = 64;

/// How many ticks a client simulates ahead of the server, so its inputs arrive in time.
pub const CLIENT_TICK_LEAD: u32 = 2;

/// Drift (ticks) from the lead target after which a client clock snaps back to it.
pub const CLOCK_RESYNC_THRESHOLD_TICKS: i32 = 16;

/// Scale applied to raw mouse motion (pixels) before it is accumulated as look input (degrees).
pub const LOOK_SENSITIVITY: f32 = 0.1;

/// Scale applied to raw mouse wheel lines before they are accumulated as zoom input.
pub const ZOOM_SENSITIVITY: f32 = 1.0;

/// Yaw rate used by tank movement when the move input has a sideways component.
pub const TANK_TURN_DEGREES_PER_SECOND: f32 = 180.0;

/// Default capsule radius of a character (meters).
pub const CHARACTER_CAPSULE_RADIUS: f32 = 0.5;

/// Default capsule half height (cylinder part only) of a character (meters).
pub const CHARACTER_CAPSULE_HALF_HEIGHT: f32 = 0.5;

/// Where characters are spawned (meters), slightly above the ground so they settle on the first tick.
pub const CHARACTER_SPAWN_TRANSLATION: [f32; 3] = [0.0, 1.5, 0.0];

/// Practical small distance / length for comparisons (meters).
pub const DIST_EPS: f32 = 1.0e-6;

/// Accumulated input axes (camera look/zoom) wrap into `[0, INPUT_ACCUMULATOR_WRAP)`.
///
/// Small enough to keep sub-0.01 precision, large enough that no realistic per-tick delta
/// reaches half of it.
pub const INPUT_ACCUMULATOR_WRAP: f32 = 65_536.0;
