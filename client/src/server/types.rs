use crate::module_bindings::{Character, DbQuat, DbVec2, DbVec3, InputFrame};
use bevy::prelude::*;
use nalgebra as na;
use shared::{CharacterBody, CharacterState, InputEvent, PlayerInputs};

impl From<DbVec3> for Vec3 {
    fn from(v: DbVec3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<DbVec3> for na::Vector3<f32> {
    fn from(v: DbVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<na::Vector2<f32>> for DbVec2 {
    fn from(v: na::Vector2<f32>) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<DbQuat> for na::UnitQuaternion<f32> {
    fn from(q: DbQuat) -> Self {
        na::UnitQuaternion::from_quaternion(na::Quaternion::new(q.w, q.x, q.y, q.z))
    }
}

impl From<PlayerInputs> for InputFrame {
    fn from(inputs: PlayerInputs) -> Self {
        InputFrame {
            move_input: inputs.move_input.into(),
            camera_look_input: inputs.camera_look_input.into(),
            camera_zoom_input: inputs.camera_zoom_input,
            jump_count: inputs.jump_pressed.count,
        }
    }
}

/// Simulation state carried by a replicated `character` row.
pub fn character_state(row: &Character) -> CharacterState {
    CharacterState {
        translation: row.translation.clone().into(),
        rotation: row.rotation.clone().into(),
        body: CharacterBody {
            velocity: row.velocity.clone().into(),
            grounded: row.grounded,
            ground_normal: row.ground_normal.clone().into(),
            obstruction_normal: row.obstruction_normal.clone().map(Into::into),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_frame_carries_tick_events() {
        let mut inputs = PlayerInputs {
            move_input: na::Vector2::new(1.0, -1.0),
            camera_look_input: na::Vector2::new(12.0, 3.0),
            camera_zoom_input: 4.0,
            jump_pressed: InputEvent::default(),
        };
        inputs.jump_pressed.set();

        let frame = InputFrame::from(inputs);
        assert_eq!((frame.move_input.x, frame.move_input.y), (1.0, -1.0));
        assert_eq!((frame.camera_look_input.x, frame.camera_look_input.y), (12.0, 3.0));
        assert_eq!(frame.camera_zoom_input, 4.0);
        assert_eq!(frame.jump_count, 1);
    }
}
