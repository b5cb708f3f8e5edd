use shared::StepAndSlopeHandling;

/// Stored form of [`StepAndSlopeHandling`]. Distances in meters, angles in degrees.
#[derive(spacetimedb::SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub struct DbStepAndSlope {
    pub step_handling: bool,
    pub max_step_height: f32,
    pub extra_step_checks_distance: f32,
    pub character_width_for_step_grounding_check: f32,
    pub prevent_grounding_when_moving_towards_no_grounding: bool,
    pub has_max_downward_slope_change_angle: bool,
    pub max_downward_slope_change_angle: f32,
    pub constrain_velocity_to_ground_plane: bool,
}

impl From<DbStepAndSlope> for StepAndSlopeHandling {
    fn from(s: DbStepAndSlope) -> Self {
        StepAndSlopeHandling {
            step_handling: s.step_handling,
            max_step_height: s.max_step_height,
            extra_step_checks_distance: s.extra_step_checks_distance,
            character_width_for_step_grounding_check: s.character_width_for_step_grounding_check,
            prevent_grounding_when_moving_towards_no_grounding: s
                .prevent_grounding_when_moving_towards_no_grounding,
            has_max_downward_slope_change_angle: s.has_max_downward_slope_change_angle,
            max_downward_slope_change_angle: s.max_downward_slope_change_angle,
            constrain_velocity_to_ground_plane: s.constrain_velocity_to_ground_plane,
        }
    }
}

impl From<StepAndSlopeHandling> for DbStepAndSlope {
    fn from(s: StepAndSlopeHandling) -> Self {
        DbStepAndSlope {
            step_handling: s.step_handling,
            max_step_height: s.max_step_height,
            extra_step_checks_distance: s.extra_step_checks_distance,
            character_width_for_step_grounding_check: s.character_width_for_step_grounding_check,
            prevent_grounding_when_moving_towards_no_grounding: s
                .prevent_grounding_when_moving_towards_no_grounding,
            has_max_downward_slope_change_angle: s.has_max_downward_slope_change_angle,
            max_downward_slope_change_angle: s.max_downward_slope_change_angle,
            constrain_velocity_to_ground_plane: s.constrain_velocity_to_ground_plane,
        }
    }
}
