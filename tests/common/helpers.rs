use soar_replay::{
    components::{share_task, GlidePolar, SharedTask, StaticTask, TaskPoint},
    resources::ReplayConfig,
    utils::geo_point,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::common::igc_log;

/// Writes an IGC fixture into `dir` and returns its path
pub fn write_igc(dir: &TempDir, times: &[u32]) -> PathBuf {
    let path = dir.path().join("flight.igc");
    fs::write(&path, igc_log(times)).expect("Failed to write IGC fixture");
    path
}

/// Config replaying raw fixes at the given speed
pub fn create_raw_config(speed: f64) -> ReplayConfig {
    ReplayConfig {
        interpolate: false,
        playback_speed: speed,
        ..Default::default()
    }
}

/// Out-and-return task with a target floor above the start altitude band
pub fn create_low_start_task() -> SharedTask {
    share_task(
        StaticTask::new(
            vec![
                TaskPoint::new(geo_point(46.0, 7.0), 1000.0, 300.0),
                TaskPoint::new(geo_point(46.5, 7.0), 500.0, 300.0),
                TaskPoint::new(geo_point(46.0, 7.0), 1000.0, 300.0),
            ],
            GlidePolar::default(),
        )
        .with_target_floor(1250.0),
    )
}
