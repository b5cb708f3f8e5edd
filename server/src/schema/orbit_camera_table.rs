use crate::types::*;
use nalgebra::Vector2;
use shared::{NetworkTick, OrbitCamera, OrbitCameraControl, OrbitCameraSettings};
use spacetimedb::*;

/// Orbit camera of a player, replicated so other peers can derive its rotation.
///
/// Only the planar forward and pitch are stored; the rotation is recomputed from them with
/// `shared::calculate_camera_rotation` around the followed character's up direction.
#[table(name = orbit_camera, public)]
pub struct OrbitCameraRow {
    #[primary_key]
    #[auto_inc]
    pub id: u64,

    #[index(btree)]
    pub owner: Identity,

    /// Followed character.
    pub character_id: u64,

    pub planar_forward: DbVec3,
    pub pitch_degrees: f32,
    pub target_distance: f32,
    pub current_distance: f32,

    /// Look/zoom deltas of `applied_tick`.
    pub look_degrees_delta: DbVec2,
    pub zoom_delta: f32,
    /// Raw `NetworkTick` whose deltas were last applied; 0 before the first.
    pub applied_tick: u32,
}

impl OrbitCameraRow {
    pub fn spawn(owner: Identity, character_id: u64) -> Self {
        let mut row = Self {
            id: 0,
            owner,
            character_id,
            planar_forward: DbVec3::ZERO,
            pitch_degrees: 0.0,
            target_distance: 0.0,
            current_distance: 0.0,
            look_degrees_delta: DbVec2::default(),
            zoom_delta: 0.0,
            applied_tick: NetworkTick::INVALID.raw(),
        };
        row.set_orbit(&OrbitCamera::default());
        row
    }

    pub fn orbit(&self) -> OrbitCamera {
        OrbitCamera {
            planar_forward: self.planar_forward.into(),
            pitch_degrees: self.pitch_degrees,
            target_distance: self.target_distance,
            current_distance: self.current_distance,
            settings: OrbitCameraSettings::default(),
        }
    }

    pub fn set_orbit(&mut self, orbit: &OrbitCamera) {
        self.planar_forward = orbit.planar_forward.into();
        self.pitch_degrees = orbit.pitch_degrees;
        self.target_distance = orbit.target_distance;
        self.current_distance = orbit.current_distance;
    }

    pub fn control(&self) -> OrbitCameraControl {
        OrbitCameraControl {
            look_degrees_delta: Vector2::from(self.look_degrees_delta),
            zoom_delta: self.zoom_delta,
            applied_tick: NetworkTick::from_raw(self.applied_tick),
        }
    }

    pub fn set_control(&mut self, control: &OrbitCameraControl) {
        self.look_degrees_delta = control.look_degrees_delta.into();
        self.zoom_delta = control.zoom_delta;
        self.applied_tick = control.applied_tick.raw();
    }
}
