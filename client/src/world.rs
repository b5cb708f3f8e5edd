use crate::{
    camera::orbit_camera_bundle,
    character::{LevelCollision, character_bundle},
    convert::{to_quat, to_vec3},
    player::{LocalPlayer, player_bundle},
};
use bevy::prelude::*;
use shared::{
    CharacterProperties, CharacterTuning, ColliderShapeDef, OrbitCamera, PlayerLink, StaticWorld,
    WorldStaticDef, demo_world_statics,
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, setup_level);
    // Online, players are spawned from the server's `player` rows.
    #[cfg(not(feature = "online"))]
    app.add_systems(Startup, spawn_local_player);
}

fn static_transform(def: &WorldStaticDef) -> Transform {
    let pose = def.pose();
    Transform::from_translation(to_vec3(&pose.translation.vector)).with_rotation(to_quat(&pose.rotation))
}

fn static_mesh(shape: &ColliderShapeDef) -> Mesh {
    match shape {
        ColliderShapeDef::Plane { .. } => Plane3d::default().mesh().size(100., 100.).build(),
        ColliderShapeDef::Cuboid { half_extents } => {
            Cuboid::new(half_extents.x * 2.0, half_extents.y * 2.0, half_extents.z * 2.0).into()
        }
        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => Capsule3d::new(*radius, half_height * 2.0).into(),
    }
}

fn setup_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let statics = demo_world_statics();
    info!("World setup with {} static colliders", statics.len());

    let ground = materials.add(StandardMaterial {
        base_color: Color::linear_rgb(0.2, 0.3, 0.25),
        perceptual_roughness: 1.0,
        metallic: 0.0,
        ..default()
    });
    let props = materials.add(Color::srgb_u8(124, 144, 255));

    for def in &statics {
        let material = match def.shape {
            ColliderShapeDef::Plane { .. } => ground.clone(),
            _ => props.clone(),
        };
        commands.spawn((
            Mesh3d(meshes.add(static_mesh(&def.shape))),
            MeshMaterial3d(material),
            static_transform(def),
        ));
    }

    commands.spawn((
        PointLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0),
    ));

    commands.insert_resource(LevelCollision(StaticWorld::build(statics)));
}

/// Spawns a character with its capsule mesh at `translation`.
pub fn spawn_character(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    translation: Vec3,
    color: Color,
) -> Entity {
    let tuning = CharacterTuning::default();
    let properties = CharacterProperties::default();

    commands
        .spawn((
            Name::new("Character"),
            character_bundle(Transform::from_translation(translation), tuning, properties),
            Visibility::default(),
        ))
        .with_child((
            Mesh3d(meshes.add(Capsule3d::new(
                properties.capsule_radius,
                properties.capsule_half_height * 2.0,
            ))),
            MeshMaterial3d(materials.add(color)),
        ))
        .id()
}

/// Spawns the orbit camera and the local player driving `character`, returning the player.
pub fn spawn_local_controls(commands: &mut Commands, character: Entity) -> Entity {
    let camera = commands
        .spawn((Name::new("Orbit Camera"), orbit_camera_bundle(OrbitCamera::default())))
        .id();

    let link = PlayerLink {
        controlled_character: character,
        controlled_camera: camera,
    };
    let player = commands
        .spawn((Name::new("Local Player"), player_bundle(link), LocalPlayer))
        .id();
    info!("Spawned local player controlling {character} with camera {camera}");
    player
}

pub const LOCAL_CHARACTER_COLOR: Color = Color::srgb(0.9, 0.55, 0.31);

#[cfg(not(feature = "online"))]
fn spawn_local_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let [x, y, z] = shared::constants::CHARACTER_SPAWN_TRANSLATION;
    let character = spawn_character(
        &mut commands,
        &mut meshes,
        &mut materials,
        Vec3::new(x, y, z),
        LOCAL_CHARACTER_COLOR,
    );
    spawn_local_controls(&mut commands, character);
}
