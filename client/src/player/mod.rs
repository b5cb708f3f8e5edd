use crate::tick::TickSet;
use bevy::prelude::*;
use leafwing_input_manager::plugin::InputManagerSystem;
use shared::{InputBuffer, PlayerInputs, PlayerLink};

mod control;
mod input;
#[cfg(feature = "online")]
mod replication;

pub(super) fn plugin(app: &mut App) {
    // Sample after leafwing has refreshed the action state for this frame.
    app.add_systems(
        PreUpdate,
        input::sample_player_inputs.after(InputManagerSystem::Update),
    );
    app.add_systems(FixedFirst, input::record_player_inputs.in_set(TickSet::Record));

    app.add_systems(
        FixedUpdate,
        control::fixed_step_control.in_set(ControlSet::FixedStep),
    );
    app.add_systems(
        Update,
        control::variable_step_control.in_set(ControlSet::VariableStep),
    );

    #[cfg(feature = "online")]
    {
        app.init_resource::<replication::ServerEntityMapping>();
        app.add_systems(
            PreUpdate,
            (
                replication::on_player_inserted,
                replication::on_player_deleted,
                replication::on_character_updated,
                replication::sync_clock,
            ),
        );
        app.add_systems(
            FixedFirst,
            replication::submit_local_inputs
                .after(TickSet::Record)
                .run_if(resource_exists::<replication::ServerTickSynced>),
        );
    }
}

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlSet {
    /// Player inputs of the tick become character control.
    FixedStep,
    /// Player look/zoom inputs become orbit camera deltas.
    VariableStep,
}

/// A player and the entities it drives.
#[derive(Component, Debug, Clone, Copy)]
pub struct Player(pub PlayerLink<Entity>);

/// Inputs sampled since the last recorded tick.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct LiveInputs(pub PlayerInputs);

/// Inputs recorded per tick.
#[derive(Component, Debug, Default)]
pub struct InputHistory(pub InputBuffer<PlayerInputs>);

/// The player owned by this client. Only local players sample and record device input.
#[derive(Component)]
pub struct LocalPlayer;

pub fn player_bundle(link: PlayerLink<Entity>) -> impl Bundle {
    (
        Player(link),
        LiveInputs::default(),
        InputHistory::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        camera::{FollowedCharacter, OrbitCameraState, OrbitControl},
        character::{self, Control, LevelCollision, character_bundle},
        input::PlayerAction,
        tick,
    };
    use leafwing_input_manager::prelude::ActionState;
    use shared::{CharacterProperties, CharacterTuning, StaticWorld, demo_world_statics};

    struct Fixture {
        app: App,
        character: Entity,
        camera: Entity,
    }

    fn fixture() -> Fixture {
        let mut app = App::new();
        app.add_plugins((tick::plugin, plugin, character::plugin));
        app.insert_resource(ActionState::<PlayerAction>::default());
        app.insert_resource(LevelCollision(StaticWorld::build(demo_world_statics())));

        let character = app
            .world_mut()
            .spawn(character_bundle(
                Transform::from_xyz(0.0, 1.05, 0.0),
                CharacterTuning::default(),
                CharacterProperties::default(),
            ))
            .id();
        let camera = app
            .world_mut()
            .spawn((
                OrbitCameraState::default(),
                OrbitControl::default(),
                FollowedCharacter::default(),
            ))
            .id();
        app.world_mut().spawn((
            player_bundle(PlayerLink {
                controlled_character: character,
                controlled_camera: camera,
            }),
            LocalPlayer,
        ));

        Fixture {
            app,
            character,
            camera,
        }
    }

    fn run_tick(app: &mut App) {
        app.world_mut().run_schedule(PreUpdate);
        app.world_mut().run_schedule(FixedFirst);
        app.world_mut().run_schedule(FixedUpdate);
        app.world_mut().run_schedule(Update);
    }

    #[test]
    fn forward_input_drives_character_control() {
        let Fixture {
            mut app, character, ..
        } = fixture();
        app.world_mut()
            .resource_mut::<ActionState<PlayerAction>>()
            .set_axis_pair(&PlayerAction::Move, Vec2::new(0.0, 1.0));

        run_tick(&mut app);

        let control = app.world().get::<Control>(character).unwrap().0;
        assert!((control.move_vector - -nalgebra::Vector3::z()).norm() < 1.0e-4);
        assert!(!control.jump);
    }

    #[test]
    fn camera_follows_controlled_character_and_gets_look_deltas() {
        let Fixture {
            mut app,
            character,
            camera,
        } = fixture();
        run_tick(&mut app);

        app.world_mut()
            .resource_mut::<ActionState<PlayerAction>>()
            .set_axis_pair(&PlayerAction::Look, Vec2::new(20.0, 0.0));
        run_tick(&mut app);

        assert_eq!(
            app.world().get::<FollowedCharacter>(camera).unwrap().0,
            Some(character)
        );
        let control = app.world().get::<OrbitControl>(camera).unwrap().0;
        let clock = app.world().resource::<tick::SimulationClock>().tick();
        assert_eq!(control.applied_tick, clock);
        assert!((control.look_degrees_delta.x - 2.0).abs() < 1.0e-4);
    }

    #[test]
    fn look_from_every_tick_of_a_slow_frame_reaches_the_camera() {
        let Fixture {
            mut app, camera, ..
        } = fixture();
        run_tick(&mut app);

        app.world_mut()
            .resource_mut::<ActionState<PlayerAction>>()
            .set_axis_pair(&PlayerAction::Look, Vec2::new(20.0, 0.0));
        // One frame that simulates two ticks.
        app.world_mut().run_schedule(PreUpdate);
        for _ in 0..2 {
            app.world_mut().run_schedule(FixedFirst);
            app.world_mut().run_schedule(FixedUpdate);
        }
        app.world_mut().run_schedule(Update);

        let control = app.world().get::<OrbitControl>(camera).unwrap().0;
        let clock = app.world().resource::<tick::SimulationClock>().tick();
        assert_eq!(control.applied_tick, clock);
        assert!((control.look_degrees_delta.x - 2.0).abs() < 1.0e-4);
    }
}
