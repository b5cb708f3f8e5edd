//! Debug/performance tooling for native dev builds.
//!
//! Only compiled with `dev_native` (`#[cfg(feature = "dev_native")] mod debug_tools;` in
//! `main.rs`).

use crate::character::{Control, SimCharacter};
use crate::convert::to_vec3;
use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, SystemInformationDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::render::diagnostic::RenderDiagnosticsPlugin;
use iyes_perf_ui::prelude::*;

/// Add debug/perf tooling (intended for `dev_native` builds only).
pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        RenderDiagnosticsPlugin,
        PerfUiPlugin,
    ));

    app.add_systems(Startup, spawn_perf_ui);
    app.add_systems(Update, draw_character_gizmos);
}

fn spawn_perf_ui(mut commands: Commands) {
    commands.spawn(PerfUiAllEntries::default());
}

/// Move vector in yellow, velocity in cyan, ground normal in green while grounded.
fn draw_character_gizmos(mut gizmos: Gizmos, characters: Query<(&Transform, &Control, &SimCharacter)>) {
    for (transform, control, sim) in &characters {
        let origin = transform.translation;
        let body = &sim.0.body;

        let move_vector = to_vec3(&control.0.move_vector);
        if move_vector.length_squared() > 0.0 {
            gizmos.arrow(origin, origin + move_vector * 2.0, Color::srgb(1.0, 0.9, 0.1));
        }
        gizmos.arrow(origin, origin + to_vec3(&body.velocity) * 0.25, Color::srgb(0.1, 0.9, 1.0));
        if body.grounded {
            gizmos.arrow(origin, origin + to_vec3(&body.ground_normal), Color::srgb(0.2, 1.0, 0.2));
        }
    }
}
