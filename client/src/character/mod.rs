mod interpolate;

use crate::{
    convert::{to_na_quat, to_na_vec3, to_quat, to_vec3},
    player::ControlSet,
};
use bevy::prelude::*;
use shared::{
    CharacterControl, CharacterProperties, CharacterState, CharacterTuning, StaticWorld,
    kinematic_controller, rapier_world::rapier3d::control::KinematicCharacterController,
    simulate_character,
};

pub use interpolate::smooth_character_transforms;

pub(super) fn plugin(app: &mut App) {
    app.configure_sets(FixedUpdate, CharacterSet::Motion.after(ControlSet::FixedStep));
    app.add_systems(
        FixedUpdate,
        (sync_controllers, simulate_characters)
            .chain()
            .in_set(CharacterSet::Motion),
    );
    app.add_systems(PostUpdate, smooth_character_transforms);
}

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterSet {
    Motion,
}

/// Level geometry the characters collide with.
#[derive(Resource)]
pub struct LevelCollision(pub StaticWorld);

#[derive(Component)]
pub struct Character;

/// A character whose state is written from server updates instead of simulated here.
#[derive(Component)]
pub struct Replicated;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Tuning(pub CharacterTuning);

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Properties(pub CharacterProperties);

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Control(pub CharacterControl);

/// Solver configuration derived from [`Tuning`] and [`Properties`].
#[derive(Component, Debug, Clone, Copy)]
pub struct Controller(pub KinematicCharacterController);

/// Simulated character state, advanced once per tick. The render [`Transform`] follows it.
#[derive(Component, Debug, Clone, Copy)]
pub struct SimCharacter(pub CharacterState);

impl SimCharacter {
    pub fn translation(&self) -> Vec3 {
        to_vec3(&self.0.translation)
    }

    pub fn rotation(&self) -> Quat {
        to_quat(&self.0.rotation)
    }
}

/// Components of a simulated character standing at `transform`.
pub fn character_bundle(
    transform: Transform,
    tuning: CharacterTuning,
    properties: CharacterProperties,
) -> impl Bundle {
    let mut state = CharacterState::at(to_na_vec3(transform.translation));
    state.rotation = to_na_quat(transform.rotation);
    (
        Character,
        Tuning(tuning),
        Properties(properties),
        Control::default(),
        Controller(kinematic_controller(&tuning, &properties)),
        SimCharacter(state),
        transform,
    )
}

fn sync_controllers(
    mut characters: Query<
        (&Tuning, &Properties, &mut Controller),
        Or<(Changed<Tuning>, Changed<Properties>)>,
    >,
) {
    for (tuning, properties, mut controller) in &mut characters {
        controller.0 = kinematic_controller(&tuning.0, &properties.0);
    }
}

fn simulate_characters(
    time: Res<Time<Fixed>>,
    level: Option<Res<LevelCollision>>,
    mut characters: Query<
        (&Tuning, &Properties, &Controller, &Control, &mut SimCharacter),
        Without<Replicated>,
    >,
) {
    let Some(level) = level else {
        return;
    };
    let dt = time.timestep().as_secs_f32();

    for (tuning, properties, controller, control, mut sim) in &mut characters {
        simulate_character(
            &level.0,
            &controller.0,
            &tuning.0,
            &properties.0,
            &control.0,
            &mut sim.0,
            dt,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tick;
    use shared::demo_world_statics;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins((tick::plugin, plugin));
        app.insert_resource(LevelCollision(StaticWorld::build(demo_world_statics())));
        app
    }

    #[test]
    fn idle_character_falls_and_lands() {
        let mut app = app();
        let character = app
            .world_mut()
            .spawn(character_bundle(
                Transform::from_xyz(0.0, 3.0, 0.0),
                CharacterTuning::default(),
                CharacterProperties::default(),
            ))
            .id();

        for _ in 0..120 {
            app.world_mut().run_schedule(FixedUpdate);
        }

        let sim = app.world().get::<SimCharacter>(character).unwrap();
        assert!(sim.0.body.grounded);
        assert!((sim.translation().y - 1.0).abs() < 0.1);
    }

    #[test]
    fn control_moves_the_character() {
        let mut app = app();
        let character = app
            .world_mut()
            .spawn(character_bundle(
                Transform::from_xyz(0.0, 1.05, 0.0),
                CharacterTuning::default(),
                CharacterProperties::default(),
            ))
            .id();
        app.world_mut().get_mut::<Control>(character).unwrap().0 = CharacterControl {
            move_vector: -nalgebra::Vector3::z(),
            jump: false,
        };

        for _ in 0..30 {
            app.world_mut().run_schedule(FixedUpdate);
        }

        let sim = app.world().get::<SimCharacter>(character).unwrap();
        assert!(sim.translation().z < -1.0);
    }

    #[test]
    fn tuning_change_rebuilds_controller() {
        let mut app = app();
        let character = app
            .world_mut()
            .spawn(character_bundle(
                Transform::default(),
                CharacterTuning::default(),
                CharacterProperties::default(),
            ))
            .id();
        assert!(app.world().get::<Controller>(character).unwrap().0.autostep.is_none());

        app.world_mut()
            .get_mut::<Tuning>(character)
            .unwrap()
            .0
            .step_and_slope
            .step_handling = true;
        app.world_mut().run_schedule(FixedUpdate);

        assert!(app.world().get::<Controller>(character).unwrap().0.autostep.is_some());
    }

    #[test]
    fn replicated_characters_are_not_simulated() {
        let mut app = app();
        let character = app
            .world_mut()
            .spawn((
                character_bundle(
                    Transform::from_xyz(0.0, 3.0, 0.0),
                    CharacterTuning::default(),
                    CharacterProperties::default(),
                ),
                Replicated,
            ))
            .id();

        for _ in 0..10 {
            app.world_mut().run_schedule(FixedUpdate);
        }

        let sim = app.world().get::<SimCharacter>(character).unwrap();
        assert_eq!(sim.translation(), Vec3::new(0.0, 3.0, 0.0));
    }
}
