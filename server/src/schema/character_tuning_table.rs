use crate::types::*;
use shared::{CharacterProperties, CharacterTuning, MovementModes};
use spacetimedb::*;

/// Character movement tuning shared by server and clients.
///
/// A single-row table (`id = 1`) that:
/// - the server reads every tick to drive character motion and configure Rapier's
///   `KinematicCharacterController`, and
/// - clients subscribe to in order to predict with the same parameters.
///
/// Values are in meters, seconds and degrees.
#[table(name = character_tuning, public)]
pub struct CharacterTuningRow {
    /// Unique id (primary key). Use a single row with `id = 1`.
    #[primary_key]
    pub id: u32,

    pub rotation_sharpness: f32,
    pub ground_max_speed: f32,
    pub grounded_movement_sharpness: f32,
    pub air_acceleration: f32,
    pub air_max_speed: f32,
    pub air_drag: f32,
    pub jump_speed: f32,
    pub gravity: DbVec3,
    pub step_and_slope: DbStepAndSlope,

    /// Packed `shared::MovementMode` flags.
    pub movement_modes: u8,

    pub capsule_radius: f32,
    pub capsule_half_height: f32,
    pub max_grounded_slope_deg: f32,
    /// Small gap preserved between the character and its surroundings (meters).
    pub skin_offset: f32,
    pub snap_to_ground_distance: f32,
}

impl CharacterTuningRow {
    pub const ID: u32 = 1;

    pub fn new(tuning: &CharacterTuning, properties: &CharacterProperties) -> Self {
        Self {
            id: Self::ID,
            rotation_sharpness: tuning.rotation_sharpness,
            ground_max_speed: tuning.ground_max_speed,
            grounded_movement_sharpness: tuning.grounded_movement_sharpness,
            air_acceleration: tuning.air_acceleration,
            air_max_speed: tuning.air_max_speed,
            air_drag: tuning.air_drag,
            jump_speed: tuning.jump_speed,
            gravity: tuning.gravity.into(),
            step_and_slope: tuning.step_and_slope.into(),
            movement_modes: tuning.movement_modes().bits,
            capsule_radius: properties.capsule_radius,
            capsule_half_height: properties.capsule_half_height,
            max_grounded_slope_deg: properties.max_grounded_slope_degrees,
            skin_offset: properties.skin_offset,
            snap_to_ground_distance: properties.snap_to_ground_distance,
        }
    }

    pub fn tuning(&self) -> CharacterTuning {
        let mut tuning = CharacterTuning {
            rotation_sharpness: self.rotation_sharpness,
            ground_max_speed: self.ground_max_speed,
            grounded_movement_sharpness: self.grounded_movement_sharpness,
            air_acceleration: self.air_acceleration,
            air_max_speed: self.air_max_speed,
            air_drag: self.air_drag,
            jump_speed: self.jump_speed,
            gravity: self.gravity.into(),
            step_and_slope: self.step_and_slope.into(),
            ..CharacterTuning::default()
        };
        tuning.set_movement_modes(MovementModes::from_bits(self.movement_modes));
        tuning
    }

    pub fn properties(&self) -> CharacterProperties {
        CharacterProperties {
            capsule_radius: self.capsule_radius,
            capsule_half_height: self.capsule_half_height,
            max_grounded_slope_degrees: self.max_grounded_slope_deg,
            skin_offset: self.skin_offset,
            snap_to_ground_distance: self.snap_to_ground_distance,
        }
    }
}

/// Seed (or reset) the tuning row with defaults.
pub fn seed_character_tuning(ctx: &ReducerContext) {
    ctx.db.character_tuning().id().delete(CharacterTuningRow::ID);
    ctx.db.character_tuning().insert(CharacterTuningRow::new(
        &CharacterTuning::default(),
        &CharacterProperties::default(),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_round_trips_tuning_and_modes() {
        let tuning = CharacterTuning {
            relative_movement: true,
            prevent_air_acceleration_against_ungrounded_hits: false,
            air_drag: 0.5,
            ..CharacterTuning::default()
        };
        let properties = CharacterProperties::default();
        let row = CharacterTuningRow::new(&tuning, &properties);

        assert_eq!(row.tuning(), tuning);
        assert_eq!(row.properties(), properties);
    }
}
