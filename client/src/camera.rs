use crate::{
    character::{Tuning, smooth_character_transforms},
    convert::{to_na_vec3, to_quat, to_vec3},
    player::ControlSet,
};
use bevy::{
    camera::Exposure,
    pbr::{AtmosphereMode, AtmosphereSettings},
    prelude::*,
};
use shared::{OrbitCamera, OrbitCameraControl};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Update, update_orbit_cameras.after(ControlSet::VariableStep));
    app.add_systems(
        PostUpdate,
        place_orbit_cameras.after(smooth_character_transforms),
    );
}

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct OrbitCameraState(pub OrbitCamera);

/// Look/zoom deltas of the last tick handed to this camera.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct OrbitControl(pub OrbitCameraControl);

/// Character the camera orbits around.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct FollowedCharacter(pub Option<Entity>);

pub fn orbit_camera_bundle(camera: OrbitCamera) -> impl Bundle {
    (
        OrbitCameraState(camera),
        OrbitControl::default(),
        FollowedCharacter::default(),
        Exposure { ev100: 16.0 },
        bevy::core_pipeline::tonemapping::Tonemapping::AcesFitted,
        Camera3d::default(),
        Transform::default(),
        DistanceFog {
            color: Color::srgba(0.35, 0.48, 0.66, 1.0),
            directional_light_color: Color::srgba(1.0, 0.95, 0.85, 0.5),
            directional_light_exponent: 30.0,
            falloff: FogFalloff::from_visibility_colors(
                1000.0, // Fog distance
                Color::srgb(0.35, 0.5, 0.66),
                Color::srgb(0.8, 0.8, 0.7),
            ),
        },
        AtmosphereSettings {
            rendering_method: AtmosphereMode::Raymarched,
            ..default()
        },
    )
}

/// The character's up direction, world up when the character is gone.
fn followed_up(followed: &FollowedCharacter, tunings: &Query<&Tuning>) -> Vec3 {
    followed
        .0
        .and_then(|entity| tunings.get(entity).ok())
        .map(|tuning| to_vec3(&tuning.0.up()))
        .unwrap_or(Vec3::Y)
}

/// Applies new look/zoom deltas once and keeps the distance smoothing running every frame.
fn update_orbit_cameras(
    time: Res<Time>,
    tunings: Query<&Tuning>,
    mut cameras: Query<(&mut OrbitCameraState, Ref<OrbitControl>, &FollowedCharacter)>,
) {
    let dt = time.delta_secs();
    for (mut orbit, control, followed) in &mut cameras {
        let up = to_na_vec3(followed_up(followed, &tunings));
        let deltas = if control.is_changed() {
            control.0
        } else {
            OrbitCameraControl::default()
        };
        orbit.0.apply_control(&deltas, up, dt);
    }
}

fn place_orbit_cameras(
    tunings: Query<&Tuning>,
    targets: Query<&Transform, Without<OrbitCameraState>>,
    mut cameras: Query<(&mut Transform, &OrbitCameraState, &FollowedCharacter)>,
) {
    for (mut transform, orbit, followed) in &mut cameras {
        let Some(target) = followed.0.and_then(|entity| targets.get(entity).ok()) else {
            continue;
        };
        let up = to_na_vec3(followed_up(followed, &tunings));
        let (translation, rotation) = orbit.0.camera_pose(to_na_vec3(target.translation), up);
        transform.translation = to_vec3(&translation);
        transform.rotation = to_quat(&rotation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    #[test]
    fn deltas_apply_once_per_change() {
        let mut app = App::new();
        app.init_resource::<Time>();
        app.add_systems(Update, update_orbit_cameras);
        let camera = app
            .world_mut()
            .spawn((
                OrbitCameraState::default(),
                OrbitControl::default(),
                FollowedCharacter::default(),
            ))
            .id();
        app.world_mut().run_schedule(Update);

        app.world_mut().get_mut::<OrbitControl>(camera).unwrap().0.look_degrees_delta =
            Vector2::new(0.0, -10.0);
        app.world_mut().run_schedule(Update);
        let pitch = app.world().get::<OrbitCameraState>(camera).unwrap().0.pitch_degrees;
        assert!((pitch - 20.0).abs() < 1.0e-4);

        // Unchanged control on the next frame does not rotate again.
        app.world_mut().run_schedule(Update);
        let again = app.world().get::<OrbitCameraState>(camera).unwrap().0.pitch_degrees;
        assert_eq!(pitch, again);
    }

    #[test]
    fn camera_is_placed_behind_followed_character() {
        let mut app = App::new();
        app.add_systems(PostUpdate, place_orbit_cameras);
        let target = app.world_mut().spawn(Transform::from_xyz(1.0, 2.0, 3.0)).id();
        let camera = app
            .world_mut()
            .spawn((
                OrbitCameraState::default(),
                FollowedCharacter(Some(target)),
                Transform::default(),
            ))
            .id();

        app.world_mut().run_schedule(PostUpdate);

        let transform = app.world().get::<Transform>(camera).unwrap();
        let distance = app.world().get::<OrbitCameraState>(camera).unwrap().0.current_distance;
        assert!((transform.translation - Vec3::new(1.0, 2.0, 3.0 + distance)).length() < 1.0e-4);
        assert!((transform.forward().as_vec3() - Vec3::NEG_Z).length() < 1.0e-4);
    }
}
