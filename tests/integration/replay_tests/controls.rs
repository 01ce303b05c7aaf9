use bevy::prelude::*;
use soar_replay::systems::{FastForwardReplay, StopReplay};
use tempfile::TempDir;

use crate::common::{
    assert_non_decreasing, create_raw_config, steady_times, write_igc, TestApp, TestAppBuilder,
};

fn long_replay(dir: &TempDir) -> TestApp {
    TestAppBuilder::new()
        .with_config(create_raw_config(1.0))
        .with_log(write_igc(dir, &steady_times(300, 1)))
        .build()
}

#[test]
fn test_pause_holds_virtual_time() {
    let dir = TempDir::new().unwrap();
    let mut app = long_replay(&dir);
    app.run_frames(25);

    app.engine_mut().set_playback_speed(0.0);
    app.run_frames(2);
    let paused_at = app.engine().virtual_time();
    let sequence = app.engine().blackboard().snapshot().sequence;
    assert!(paused_at.is_some());

    app.run_frames(40);
    assert_eq!(app.engine().virtual_time(), paused_at);
    assert_eq!(app.engine().blackboard().snapshot().sequence, sequence);
    assert!(app.engine().is_active());

    app.engine_mut().set_playback_speed(1.0);
    app.run_frames(30);
    assert!(app.engine().virtual_time() > paused_at);
}

#[test]
fn test_fast_forward_skips_ahead() {
    let dir = TempDir::new().unwrap();
    let mut app = long_replay(&dir);
    app.run_frames(5);
    let before = app.engine().virtual_time().expect("Replay has not started");

    app.send(FastForwardReplay { seconds: 60.0 });
    app.run_frames(30);

    let after = app.engine().virtual_time().unwrap();
    assert!(!app.engine().is_fast_forwarding());
    assert!(
        (60.0..70.0).contains(&(after - before)),
        "Skipped {} seconds",
        after - before
    );
    // Fixes passed over while skipping are not published
    let latest = app.published().last().and_then(|record| record.state.time);
    assert!(latest.is_some_and(|time| time >= before + 60.0));
    assert!(app.engine().blackboard().snapshot().sequence < 60);
    assert_non_decreasing(&app.published().times());
}

#[test]
fn test_fast_forward_without_replay_is_ignored() {
    let mut app = TestAppBuilder::new().build();
    app.send(StopReplay);
    app.run_frames(1);
    assert!(!app.engine().is_active());

    app.send(FastForwardReplay { seconds: 60.0 });
    app.run_frames(5);
    assert!(!app.engine().is_active());
    assert!(!app.engine().is_fast_forwarding());
}

#[test]
fn test_stop_event_ends_replay() {
    let dir = TempDir::new().unwrap();
    let mut app = long_replay(&dir);
    app.run_frames(30);
    assert!(app.engine().blackboard().snapshot().provenance.replay);

    app.send(StopReplay);
    app.run_frames(1);

    assert!(!app.engine().is_active());
    assert!(app.engine().armed_delay().is_none());
    assert!(!app.engine().blackboard().snapshot().provenance.replay);
    // Stopping on request is not the same as running out of fixes
    app.run_frames(10);
    assert!(!app.published().finished);
}

fn tap(app: &mut TestApp, key: KeyCode) {
    app.app
        .world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(key);
    app.run_frames(1);
    let mut keys = app.app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keys.release(key);
    keys.clear();
}

#[test]
fn test_keyboard_controls_speed() {
    let dir = TempDir::new().unwrap();
    let mut app = long_replay(&dir);
    app.app.init_resource::<ButtonInput<KeyCode>>();

    tap(&mut app, KeyCode::ArrowUp);
    assert_eq!(app.engine().playback_speed(), 2.0);
    tap(&mut app, KeyCode::ArrowUp);
    assert_eq!(app.engine().playback_speed(), 4.0);

    tap(&mut app, KeyCode::Space);
    assert_eq!(app.engine().playback_speed(), 0.0);
    tap(&mut app, KeyCode::Space);
    assert_eq!(app.engine().playback_speed(), 1.0);
}
