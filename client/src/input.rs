use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    #[actionlike(DualAxis)]
    Move,
    #[actionlike(DualAxis)]
    Look,
    #[actionlike(Axis)]
    Zoom,
    Jump,
}

impl PlayerAction {
    pub fn default_input_map() -> InputMap<Self> {
        InputMap::default()
            .with_dual_axis(Self::Move, VirtualDPad::wasd())
            .with_dual_axis(Self::Look, MouseMove::default())
            .with_axis(Self::Zoom, MouseScrollAxis::Y)
            .with(Self::Jump, KeyCode::Space)
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<PlayerAction>::default());

    app.register_type::<PlayerAction>();

    app.insert_resource(PlayerAction::default_input_map());
    app.insert_resource(ActionState::<PlayerAction>::default());
}
