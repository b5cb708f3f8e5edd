//! Character tuning: movement speeds, sharpness, gravity, step/slope handling and mode flags.
//!
//! A tuning record is configured once per character and only read afterwards. The same record
//! drives the velocity/rotation update in [`crate::motion`] and configures the external
//! collision solver (Rapier's kinematic character controller) through
//! [`kinematic_controller`].

use crate::math::{Vec3, up_axis};
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};

/// Step and slope handling parameters handed to the collision solver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepAndSlopeHandling {
    /// Whether the character automatically climbs steps.
    pub step_handling: bool,
    /// Tallest step that can be climbed (meters).
    pub max_step_height: f32,
    /// Free space required past a step edge before the step is taken (meters).
    pub extra_step_checks_distance: f32,
    /// Width used to check the ground under a step (meters).
    pub character_width_for_step_grounding_check: f32,
    /// Don't snap to ground when the motion leads over a ledge with no ground below.
    pub prevent_grounding_when_moving_towards_no_grounding: bool,
    /// Whether a downward slope change larger than `max_downward_slope_change_angle` ungrounds.
    pub has_max_downward_slope_change_angle: bool,
    /// Degrees.
    pub max_downward_slope_change_angle: f32,
    /// Keep grounded velocity on the ground plane.
    pub constrain_velocity_to_ground_plane: bool,
}

impl Default for StepAndSlopeHandling {
    fn default() -> Self {
        Self {
            step_handling: false,
            max_step_height: 0.5,
            extra_step_checks_distance: 0.1,
            character_width_for_step_grounding_check: 1.0,
            prevent_grounding_when_moving_towards_no_grounding: true,
            has_max_downward_slope_change_angle: false,
            max_downward_slope_change_angle: 90.0,
            constrain_velocity_to_ground_plane: true,
        }
    }
}

/// Movement-mode flags of a [`CharacterTuning`].
///
/// The numeric values are part of the packed storage format ([`MovementModes::bits`]).
/// Do not reorder or reuse values without a migration.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MovementMode {
    /// Move relative to the camera instead of the character.
    RelativeMovement = 0,
    /// Forward/back moves, left/right turns.
    TankMovement = 1,
    /// Don't accelerate in the air into a non-walkable obstruction.
    PreventAirAccelerationAgainstUngroundedHits = 2,
}

impl MovementMode {
    const fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

/// Packed set of [`MovementMode`] flags.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MovementModes {
    pub bits: u8,
}

impl MovementModes {
    const KNOWN_BITS: u8 = MovementMode::RelativeMovement.mask()
        | MovementMode::TankMovement.mask()
        | MovementMode::PreventAirAccelerationAgainstUngroundedHits.mask();

    /// Unknown bits are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            bits: bits & Self::KNOWN_BITS,
        }
    }

    pub fn set(&mut self, mode: MovementMode, enabled: bool) {
        if enabled {
            self.bits |= mode.mask();
        } else {
            self.bits &= !mode.mask();
        }
    }

    pub fn has(&self, mode: MovementMode) -> bool {
        self.bits & mode.mask() != 0
    }
}

/// Per-character movement tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterTuning {
    pub rotation_sharpness: f32,
    /// Meters per second.
    pub ground_max_speed: f32,
    pub grounded_movement_sharpness: f32,
    /// Meters per second squared.
    pub air_acceleration: f32,
    /// Meters per second.
    pub air_max_speed: f32,
    pub air_drag: f32,
    /// Meters per second.
    pub jump_speed: f32,
    /// Meters per second squared.
    pub gravity: Vec3,
    pub prevent_air_acceleration_against_ungrounded_hits: bool,
    pub step_and_slope: StepAndSlopeHandling,
    pub relative_movement: bool,
    pub tank_movement: bool,
}

impl Default for CharacterTuning {
    fn default() -> Self {
        Self {
            rotation_sharpness: 25.0,
            ground_max_speed: 10.0,
            grounded_movement_sharpness: 15.0,
            air_acceleration: 50.0,
            air_max_speed: 10.0,
            air_drag: 0.0,
            jump_speed: 10.0,
            gravity: Vec3::new(0.0, -30.0, 0.0),
            prevent_air_acceleration_against_ungrounded_hits: true,
            step_and_slope: StepAndSlopeHandling::default(),
            relative_movement: false,
            tank_movement: false,
        }
    }
}

impl CharacterTuning {
    pub fn movement_modes(&self) -> MovementModes {
        let mut modes = MovementModes::default();
        modes.set(MovementMode::RelativeMovement, self.relative_movement);
        modes.set(MovementMode::TankMovement, self.tank_movement);
        modes.set(
            MovementMode::PreventAirAccelerationAgainstUngroundedHits,
            self.prevent_air_acceleration_against_ungrounded_hits,
        );
        modes
    }

    pub fn set_movement_modes(&mut self, modes: MovementModes) {
        self.relative_movement = modes.has(MovementMode::RelativeMovement);
        self.tank_movement = modes.has(MovementMode::TankMovement);
        self.prevent_air_acceleration_against_ungrounded_hits =
            modes.has(MovementMode::PreventAirAccelerationAgainstUngroundedHits);
    }

    /// The character's up direction: opposite to gravity, world up without gravity.
    pub fn up(&self) -> Vec3 {
        up_axis(-self.gravity).into_inner()
    }
}

/// Solver-side description of the character body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterProperties {
    /// Meters.
    pub capsule_radius: f32,
    /// Half height of the cylindrical part (meters).
    pub capsule_half_height: f32,
    /// Steepest walkable slope (degrees).
    pub max_grounded_slope_degrees: f32,
    /// Gap kept between the capsule and obstacles (meters).
    pub skin_offset: f32,
    /// How far down the character snaps to ground while grounded (meters).
    pub snap_to_ground_distance: f32,
}

impl Default for CharacterProperties {
    fn default() -> Self {
        Self {
            capsule_radius: crate::constants::CHARACTER_CAPSULE_RADIUS,
            capsule_half_height: crate::constants::CHARACTER_CAPSULE_HALF_HEIGHT,
            max_grounded_slope_degrees: 60.0,
            skin_offset: 0.02,
            snap_to_ground_distance: 0.2,
        }
    }
}

impl CharacterProperties {
    /// Minimum up component of a surface normal to count as ground.
    pub fn min_ground_normal_dot(&self) -> f32 {
        self.max_grounded_slope_degrees.to_radians().cos()
    }
}

/// Configure the kinematic character controller from tuning and body properties.
///
/// Mapping
/// - Autostep only with `step_handling`; height from `max_step_height`, width from
///   `extra_step_checks_distance`.
/// - Climb limit from `max_grounded_slope_degrees`; steeper surfaces slide.
/// - Snap-to-ground is disabled when a downward slope change limit tighter than the climb
///   limit is requested, so the character leaves sharp crests instead of gluing to them.
pub fn kinematic_controller(
    tuning: &CharacterTuning,
    properties: &CharacterProperties,
) -> KinematicCharacterController {
    let step = &tuning.step_and_slope;
    let climb = properties.max_grounded_slope_degrees.to_radians();

    let autostep = step.step_handling.then(|| CharacterAutostep {
        max_height: CharacterLength::Absolute(step.max_step_height.max(0.0)),
        min_width: CharacterLength::Absolute(step.extra_step_checks_distance.max(0.0)),
        include_dynamic_bodies: false,
    });

    let snap_blocked = step.has_max_downward_slope_change_angle
        && step.max_downward_slope_change_angle.to_radians() < climb;
    let snap_to_ground = (!snap_blocked && properties.snap_to_ground_distance > 0.0)
        .then(|| CharacterLength::Absolute(properties.snap_to_ground_distance));

    KinematicCharacterController {
        up: up_axis(tuning.up()),
        offset: CharacterLength::Absolute(properties.skin_offset.max(0.0)),
        slide: true,
        autostep,
        max_slope_climb_angle: climb,
        min_slope_slide_angle: climb,
        snap_to_ground,
        ..KinematicCharacterController::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_tuning() {
        let t = CharacterTuning::default();
        assert_eq!(t.rotation_sharpness, 25.0);
        assert_eq!(t.ground_max_speed, 10.0);
        assert_eq!(t.grounded_movement_sharpness, 15.0);
        assert_eq!(t.air_acceleration, 50.0);
        assert_eq!(t.air_max_speed, 10.0);
        assert_eq!(t.air_drag, 0.0);
        assert_eq!(t.jump_speed, 10.0);
        assert_eq!(t.gravity, Vec3::new(0.0, -30.0, 0.0));
        assert!(t.prevent_air_acceleration_against_ungrounded_hits);
        assert!(!t.relative_movement);
        assert!(!t.tank_movement);
        assert!(!t.step_and_slope.step_handling);
    }

    #[test]
    fn movement_modes_round_trip_through_bits() {
        let mut t = CharacterTuning::default();
        t.relative_movement = true;
        let modes = t.movement_modes();
        assert_eq!(modes.bits, 0b101);

        let mut other = CharacterTuning::default();
        other.set_movement_modes(MovementModes::from_bits(modes.bits));
        assert!(other.relative_movement);
        assert!(!other.tank_movement);
        assert!(other.prevent_air_acceleration_against_ungrounded_hits);
    }

    #[test]
    fn unknown_mode_bits_are_dropped() {
        assert_eq!(MovementModes::from_bits(0xFF).bits, 0b111);
    }

    #[test]
    fn up_opposes_gravity() {
        let mut t = CharacterTuning::default();
        assert!((t.up() - Vec3::y()).norm() < 1.0e-6);
        t.gravity = Vec3::zeros();
        assert!((t.up() - Vec3::y()).norm() < 1.0e-6);
    }

    #[test]
    fn controller_autostep_follows_step_handling() {
        let mut t = CharacterTuning::default();
        let p = CharacterProperties::default();
        assert!(kinematic_controller(&t, &p).autostep.is_none());

        t.step_and_slope.step_handling = true;
        let kcc = kinematic_controller(&t, &p);
        let autostep = kcc.autostep.expect("autostep enabled");
        assert!(matches!(autostep.max_height, CharacterLength::Absolute(h) if h == 0.5));
        assert!((kcc.max_slope_climb_angle - 60f32.to_radians()).abs() < 1.0e-6);
    }

    #[test]
    fn tight_downward_slope_limit_disables_snap() {
        let mut t = CharacterTuning::default();
        let p = CharacterProperties::default();
        assert!(kinematic_controller(&t, &p).snap_to_ground.is_some());

        t.step_and_slope.has_max_downward_slope_change_angle = true;
        t.step_and_slope.max_downward_slope_change_angle = 30.0;
        assert!(kinematic_controller(&t, &p).snap_to_ground.is_none());
    }
}
