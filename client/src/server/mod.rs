//! SpacetimeDB connection.
//!
//! `crate::module_bindings` is generated from the `server` module with
//! `spacetime generate --lang rust --out-dir client/src/module_bindings --project-path server`.

pub mod reducers;
pub mod types;

use crate::module_bindings::{
    CharacterTableAccess, DbConnection, PlayerTableAccess, RemoteTables,
    SimulationTickTimerTableAccess,
};
use bevy::prelude::*;
use bevy_spacetimedb::{ReadStdbConnectedMessage, StdbConnection, StdbPlugin};
use reducers::*;

pub type SpacetimeDB<'a> = Res<'a, StdbConnection<DbConnection>>;

const SERVER_URI: &str = "http://127.0.0.1:3000";
const MODULE_NAME: &str = "third-person";

pub(super) fn plugin(app: &mut App) {
    let stdb_plugin = StdbPlugin::default()
        .with_uri(SERVER_URI)
        .with_module_name(MODULE_NAME);

    let stdb_plugin = match read_token() {
        Some(token) => {
            info!("Using JWT from CLI/ENV for SpacetimeDB connection.");
            stdb_plugin.with_token(token)
        }
        None => {
            warn!("No JWT provided via CLI/ENV; identity will be ephemeral for this run.");
            stdb_plugin
        }
    };

    app.add_plugins(
        stdb_plugin
            .add_reducer::<SubmitInput>()
            .add_table(RemoteTables::player)
            .add_table(RemoteTables::character)
            .add_table(RemoteTables::simulation_tick_timer)
            .with_run_fn(DbConnection::run_threaded),
    );
    app.add_systems(Update, on_connect);
}

fn on_connect(mut messages: ReadStdbConnectedMessage, stdb: SpacetimeDB) {
    for message in messages.read() {
        info!("SpacetimeDB module connected: {:?}", message.identity);

        stdb.subscription_builder().subscribe(vec![
            "SELECT * FROM player",
            "SELECT * FROM character",
            "SELECT * FROM simulation_tick_timer",
        ]);
    }
}

/// A JWT from `--token <JWT>`, `--token=<JWT>` or the `STDB_TOKEN` environment variable.
fn read_token() -> Option<String> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--token" {
            return args.next();
        }
        if let Some(token) = arg.strip_prefix("--token=") {
            return Some(token.to_string());
        }
    }
    std::env::var("STDB_TOKEN").ok()
}
