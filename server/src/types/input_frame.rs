use super::DbVec2;
use shared::{InputEvent, PlayerInputs};

/// One tick of player input as submitted by a client.
///
/// `camera_look_input` and `camera_zoom_input` are accumulated values (see
/// `shared::add_input_delta`); `jump_count` is the number of jump presses sampled for this tick
/// alone.
#[derive(spacetimedb::SpacetimeType, Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    pub move_input: DbVec2,
    pub camera_look_input: DbVec2,
    pub camera_zoom_input: f32,
    pub jump_count: u32,
}

impl From<InputFrame> for PlayerInputs {
    fn from(frame: InputFrame) -> Self {
        PlayerInputs {
            move_input: frame.move_input.into(),
            camera_look_input: frame.camera_look_input.into(),
            camera_zoom_input: frame.camera_zoom_input,
            jump_pressed: InputEvent {
                count: frame.jump_count,
            },
        }
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
