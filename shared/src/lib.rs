pub mod camera;
pub mod constants;
pub mod control;
pub mod input;
pub mod math;
pub mod motion;
pub mod player;
pub mod rapier_world;
pub mod tick;
pub mod tuning;

pub use camera::{
    OrbitCamera, OrbitCameraControl, OrbitCameraSettings, ReplicatedCameraAngles,
    calculate_camera_rotation,
};
pub use control::CharacterControl;
pub use input::{InputEvent, PlayerInputs, add_input_delta, input_delta};
pub use motion::{CharacterBody, CharacterState, simulate_character};
pub use player::{CameraView, PlayerLink, fixed_step_control, variable_step_control};
pub use rapier_world::{ColliderShapeDef, StaticWorld, WorldStaticDef, demo_world_statics};
pub use tick::{InputBuffer, NetworkTick, NetworkTime, TickInput};
pub use tuning::{
    CharacterProperties, CharacterTuning, MovementMode, MovementModes, StepAndSlopeHandling,
    kinematic_controller,
};
