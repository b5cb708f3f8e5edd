use crate::module_bindings::{
    InputFrame, Reducer, RemoteModule, RemoteReducers, submit_input_reducer::submit_input,
};
use bevy_spacetimedb::RegisterReducerMessage;
use spacetimedb_sdk::ReducerEvent;

#[derive(Debug, RegisterReducerMessage)]
pub struct SubmitInput {
    pub event: ReducerEvent<Reducer>,
    pub tick: u32,
    pub frame: InputFrame,
}
