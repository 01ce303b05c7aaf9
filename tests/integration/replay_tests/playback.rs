use approx::assert_relative_eq;
use soar_replay::resources::ReplayConfig;
use tempfile::TempDir;

use crate::common::{
    assert_non_decreasing, assert_record_valid, create_raw_config, fixture_time, steady_times,
    warped_times, write_igc, TestAppBuilder, FIXTURE_START,
};

#[test]
fn test_raw_log_replays_every_fix() {
    let dir = TempDir::new().unwrap();
    let times = steady_times(10, 1);
    let mut app = TestAppBuilder::new()
        .with_config(create_raw_config(10.0))
        .with_log(write_igc(&dir, &times))
        .build();

    assert!(app.engine().is_active());
    assert!(app.run_until_finished(300), "Replay never finished");
    assert!(!app.engine().is_active());

    let published = app.published();
    for record in &published.records {
        assert_record_valid(record);
        assert!(!record.provenance.interpolated);
    }
    assert_non_decreasing(&published.times());

    let last = published.last().expect("Nothing was published");
    assert_eq!(last.sequence, times.len() as u64);
    assert_eq!(last.state.time, Some(fixture_time(FIXTURE_START + 9)));
    assert_relative_eq!(last.state.vertical_rate, 2.0);
}

#[test]
fn test_finished_replay_clears_motion() {
    let dir = TempDir::new().unwrap();
    let mut app = TestAppBuilder::new()
        .with_config(create_raw_config(10.0))
        .with_log(write_igc(&dir, &steady_times(5, 1)))
        .build();
    assert!(app.run_until_finished(300));

    let record = app.engine().blackboard().snapshot();
    assert_eq!(record.state.ground_speed, 0.0);
    assert!(!record.provenance.replay);
    assert_eq!(record.sequence, 5);
}

#[test]
fn test_interpolated_replay_is_smooth() {
    let dir = TempDir::new().unwrap();
    let times = steady_times(8, 4);
    let config = ReplayConfig {
        playback_speed: 4.0,
        ..Default::default()
    };
    let mut app = TestAppBuilder::new()
        .with_config(config)
        .with_log(write_igc(&dir, &times))
        .build();
    assert!(app.run_until_finished(500), "Replay never finished");

    let published = app.published();
    let recorded = published.times();
    assert!(recorded.len() >= 4, "Only {} records", recorded.len());
    assert_non_decreasing(&recorded);
    for record in &published.records {
        assert_record_valid(record);
        assert!(record.provenance.interpolated);
        assert!(record.state.ground_speed > 0.0);
    }

    let first = fixture_time(times[0]);
    let last = fixture_time(times[times.len() - 1]);
    assert!(recorded.iter().all(|t| (first..=last).contains(t)));
}

#[test]
fn test_time_warp_recovers() {
    let dir = TempDir::new().unwrap();
    let times = warped_times();
    let mut app = TestAppBuilder::new()
        .with_config(create_raw_config(10.0))
        .with_log(write_igc(&dir, &times))
        .build();
    assert!(app.run_until_finished(300), "Replay never finished");

    let published = app.published();
    let last = published.last().expect("Nothing was published");
    // Every fix is published once, including those after the jump back
    assert_eq!(last.sequence, times.len() as u64);
    assert_eq!(last.state.time, Some(fixture_time(FIXTURE_START + 6)));

    let latest = published.times().into_iter().fold(f64::MIN, f64::max);
    assert!(latest > fixture_time(FIXTURE_START + 6));
}

#[test]
fn test_unsupported_log_does_not_start() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("track.gpx");
    std::fs::write(&path, "<gpx/>").unwrap();

    let mut app = TestAppBuilder::new().with_log(path).build();
    app.run_frames(20);

    assert!(!app.engine().is_active());
    assert!(app.engine().virtual_time().is_none());
    assert!(app.published().records.is_empty());
    assert!(!app.published().finished);
}

#[test]
fn test_short_log_plays_raw_fixes() {
    let dir = TempDir::new().unwrap();
    let times = steady_times(3, 2);
    let mut app = TestAppBuilder::new()
        .with_config(ReplayConfig {
            playback_speed: 4.0,
            ..Default::default()
        })
        .with_log(write_igc(&dir, &times))
        .build();
    assert!(app.run_until_finished(300), "Replay never finished");

    let published = app.published();
    assert_eq!(published.records.len(), times.len());
    assert!(published.records.iter().all(|r| !r.provenance.interpolated));
    assert_eq!(
        published.last().and_then(|record| record.state.time),
        Some(fixture_time(FIXTURE_START + 4))
    );
}
