use bevy::prelude::*;
use std::path::PathBuf;

use crate::components::SharedTask;
use crate::replay::ReplayEngine;
use crate::resources::ReplayConfig;
use crate::systems::{
    handle_replay_requests, replay_keyboard_system, replay_tick_system, FastForwardReplay,
    ReplayFinished, ReplayTimer, StartReplay, StopReplay,
};

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum ReplaySet {
    Input,
    Tick,
}

/// Drives a `ReplayEngine` from the app's update loop.
pub struct ReplayPlugin {
    config: ReplayConfig,
    task: Option<SharedTask>,
    autostart: Option<StartReplay>,
}

impl ReplayPlugin {
    pub fn new(config: ReplayConfig) -> Self {
        ReplayPlugin {
            config,
            task: None,
            autostart: None,
        }
    }

    /// Fly synthetic runs against this task engine instead of the configured task
    pub fn with_task(mut self, task: SharedTask) -> Self {
        self.task = Some(task);
        self
    }

    /// Start replaying `path` (or a synthetic flight) when the app starts
    pub fn with_autostart(mut self, path: Option<PathBuf>) -> Self {
        self.autostart = Some(StartReplay { path });
        self
    }

    fn build_engine(&self) -> ReplayEngine {
        match &self.task {
            Some(task) => ReplayEngine::with_task(self.config.clone(), task.clone()),
            None => ReplayEngine::new(self.config.clone()),
        }
    }
}

impl Plugin for ReplayPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.build_engine())
            .init_resource::<ReplayTimer>()
            .add_event::<StartReplay>()
            .add_event::<StopReplay>()
            .add_event::<FastForwardReplay>()
            .add_event::<ReplayFinished>()
            .configure_sets(Update, (ReplaySet::Input, ReplaySet::Tick).chain())
            .add_systems(
                Update,
                (
                    (replay_keyboard_system, handle_replay_requests)
                        .chain()
                        .in_set(ReplaySet::Input),
                    replay_tick_system.in_set(ReplaySet::Tick),
                ),
            );

        if let Some(request) = self.autostart.clone() {
            app.add_systems(Startup, move |mut starts: EventWriter<StartReplay>| {
                starts.send(request.clone());
            });
        }
    }
}
