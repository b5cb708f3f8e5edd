mod character_table;
mod character_tuning_table;
mod orbit_camera_table;
mod player_input_table;
mod player_table;
mod world_static_table;

pub use character_table::*;
pub use character_tuning_table::*;
pub use orbit_camera_table::*;
pub use player_input_table::*;
pub use player_table::*;
pub use world_static_table::*;
