use spacetimedb::*;

/// A connected player and the rows it drives.
///
/// Created on connect together with its `character` and `orbit_camera` rows and deleted with
/// them on disconnect.
#[table(name = player, public)]
pub struct Player {
    #[primary_key]
    pub identity: Identity,

    #[unique]
    pub character_id: u64,
    #[unique]
    pub camera_id: u64,
}

impl Player {
    pub fn link(&self) -> shared::PlayerLink<u64> {
        shared::PlayerLink {
            controlled_character: self.character_id,
            controlled_camera: self.camera_id,
        }
    }
}
