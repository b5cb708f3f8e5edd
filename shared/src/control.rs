use crate::math::Vec3;

/// Per-tick motion request of one character.
///
/// Written by the fixed-step control glue, read by [`crate::motion`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterControl {
    /// Desired world-space move direction scaled by input strength. Length is at most 1.
    pub move_vector: Vec3,
    /// Jump was pressed on this tick.
    pub jump: bool,
}

impl Default for CharacterControl {
    fn default() -> Self {
        Self {
            move_vector: Vec3::zeros(),
            jump: false,
        }
    }
}
