mod db_quat;
mod db_vec2;
mod db_vec3;
mod input_frame;
mod shapes;
mod step_and_slope;

pub use db_quat::DbQuat;
pub use db_vec2::DbVec2;
pub use db_vec3::DbVec3;
pub use input_frame::InputFrame;
pub use shapes::{ColliderShape, DbCapsule};
pub use step_and_slope::DbStepAndSlope;
