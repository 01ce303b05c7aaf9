use bevy::{prelude::*, time::TimeUpdateStrategy};
use soar_replay::{
    components::SharedTask,
    plugins::{ReplayPlugin, ReplaySet},
    replay::{BlackboardRecord, ReplayEngine},
    resources::ReplayConfig,
    systems::ReplayFinished,
};
use std::path::PathBuf;
use std::time::Duration;

/// Records seen on the blackboard at the end of each frame
#[derive(Resource, Default, Debug)]
pub struct PublishedRecords {
    pub records: Vec<BlackboardRecord>,
    pub finished: bool,
}

impl PublishedRecords {
    pub fn times(&self) -> Vec<f64> {
        self.records.iter().filter_map(|r| r.state.time).collect()
    }

    pub fn last(&self) -> Option<&BlackboardRecord> {
        self.records.last()
    }
}

fn record_published(
    engine: Res<ReplayEngine>,
    mut published: ResMut<PublishedRecords>,
    mut finished: EventReader<ReplayFinished>,
) {
    let record = engine.blackboard().snapshot();
    let last_sequence = published.last().map_or(0, |r| r.sequence);
    if record.sequence != last_sequence {
        published.records.push(record);
    }
    if finished.read().next().is_some() {
        published.finished = true;
    }
}

// Builder for creating a test application around the replay plugin
pub struct TestAppBuilder {
    config: ReplayConfig,
    log: Option<PathBuf>,
    task: Option<SharedTask>,
    frame_period: Duration,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            config: ReplayConfig::default(),
            log: None,
            task: None,
            frame_period: Duration::from_millis(100),
        }
    }
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ReplayConfig) -> Self {
        self.config = config;
        self
    }

    /// Replay this log instead of flying a synthetic flight
    pub fn with_log(mut self, path: PathBuf) -> Self {
        self.log = Some(path);
        self
    }

    pub fn with_task(mut self, task: SharedTask) -> Self {
        self.task = Some(task);
        self
    }

    pub fn with_frame_period(mut self, period: Duration) -> Self {
        self.frame_period = period;
        self
    }

    pub fn build(self) -> TestApp {
        let mut plugin = ReplayPlugin::new(self.config).with_autostart(self.log);
        if let Some(task) = self.task {
            plugin = plugin.with_task(task);
        }

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(self.frame_period))
            .add_plugins(plugin)
            .init_resource::<PublishedRecords>()
            .add_systems(Update, record_published.after(ReplaySet::Tick));

        // Run an initial update so the autostart request is handled
        app.update();

        TestApp { app }
    }
}

/// Main test application wrapper
pub struct TestApp {
    pub app: App,
}

impl TestApp {
    pub fn run_frames(&mut self, frames: usize) {
        for _ in 0..frames {
            self.app.update();
        }
    }

    /// Runs until the replay reports it finished. Returns false if it never did.
    pub fn run_until_finished(&mut self, max_frames: usize) -> bool {
        for _ in 0..max_frames {
            if self.published().finished {
                return true;
            }
            self.app.update();
        }
        self.published().finished
    }

    pub fn engine(&self) -> &ReplayEngine {
        self.app.world().resource::<ReplayEngine>()
    }

    pub fn engine_mut(&mut self) -> Mut<ReplayEngine> {
        self.app.world_mut().resource_mut::<ReplayEngine>()
    }

    pub fn published(&self) -> &PublishedRecords {
        self.app.world().resource::<PublishedRecords>()
    }

    pub fn send<E: Event>(&mut self, event: E) {
        self.app.world_mut().send_event(event);
    }
}
