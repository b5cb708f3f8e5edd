use crate::types::*;
use shared::{CharacterBody, CharacterControl, CharacterState};
use spacetimedb::*;

/// Authoritative simulated character, replicated to every client.
#[table(name = character, public)]
pub struct Character {
    #[primary_key]
    #[auto_inc]
    pub id: u64,

    #[index(btree)]
    pub owner: Identity,

    pub translation: DbVec3,
    pub rotation: DbQuat,

    /// Meters per second.
    pub velocity: DbVec3,
    pub grounded: bool,
    pub ground_normal: DbVec3,
    /// Last non-walkable surface hit while airborne.
    pub obstruction_normal: Option<DbVec3>,

    /// Control of the last simulated tick.
    pub move_vector: DbVec3,
    pub jump: bool,
}

impl Character {
    pub fn spawn(owner: Identity, translation: DbVec3) -> Self {
        Self {
            id: 0,
            owner,
            translation,
            rotation: DbQuat::default(),
            velocity: DbVec3::ZERO,
            grounded: false,
            ground_normal: DbVec3::UP,
            obstruction_normal: None,
            move_vector: DbVec3::ZERO,
            jump: false,
        }
    }

    pub fn state(&self) -> CharacterState {
        CharacterState {
            translation: self.translation.into(),
            rotation: self.rotation.into(),
            body: CharacterBody {
                velocity: self.velocity.into(),
                grounded: self.grounded,
                ground_normal: self.ground_normal.into(),
                obstruction_normal: self.obstruction_normal.map(Into::into),
            },
        }
    }

    pub fn set_state(&mut self, state: &CharacterState) {
        self.translation = state.translation.into();
        self.rotation = state.rotation.into();
        self.velocity = state.body.velocity.into();
        self.grounded = state.body.grounded;
        self.ground_normal = state.body.ground_normal.into();
        self.obstruction_normal = state.body.obstruction_normal.map(Into::into);
    }

    pub fn control(&self) -> CharacterControl {
        CharacterControl {
            move_vector: self.move_vector.into(),
            jump: self.jump,
        }
    }

    pub fn set_control(&mut self, control: &CharacterControl) {
        self.move_vector = control.move_vector.into();
        self.jump = control.jump;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_and_control_round_trip() {
        let mut row = Character::spawn(Identity::ZERO, DbVec3::new(1.0, 2.0, 3.0));
        let mut state = row.state();
        state.body.velocity = nalgebra::Vector3::new(0.5, -1.0, 2.0);
        state.body.grounded = true;
        state.body.obstruction_normal = Some(nalgebra::Vector3::x());
        row.set_state(&state);
        assert_eq!(row.state(), state);

        let control = CharacterControl {
            move_vector: -nalgebra::Vector3::z(),
            jump: true,
        };
        row.set_control(&control);
        assert_eq!(row.control(), control);
    }
}
