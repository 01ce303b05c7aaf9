mod replay;

pub use replay::{
    handle_replay_requests, replay_keyboard_system, replay_tick_system, FastForwardReplay,
    ReplayFinished, ReplayTimer, StartReplay, StopReplay,
};
