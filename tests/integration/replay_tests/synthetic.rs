use soar_replay::{
    components::{FlightMode, TaskProgressView},
    resources::ReplayConfig,
};

use crate::common::{assert_non_decreasing, create_low_start_task, TestAppBuilder};

#[test]
fn test_synthetic_flight_publishes_each_second() {
    let mut app = TestAppBuilder::new().build();
    app.run_frames(60);

    assert!(app.engine().is_active());
    assert_eq!(app.engine().autopilot_mode(), Some(FlightMode::Cruise));

    let published = app.published();
    assert!(published.records.len() >= 3);
    let times = published.times();
    assert_non_decreasing(&times);
    assert!(times.iter().all(|t| t.fract() == 0.0));

    for record in &published.records {
        assert!(record.provenance.simulator);
        assert!(!record.provenance.interpolated);
        assert!(record.freshness.wind.is_some());
        assert!(record.state.ground_speed > 0.0);
    }

    let task = app.engine().task();
    assert!(task.lock().unwrap().is_started());
}

#[test]
fn test_synthetic_flight_climbs_then_cruises() {
    let config = ReplayConfig {
        playback_speed: 100.0,
        ..Default::default()
    };
    let mut app = TestAppBuilder::new()
        .with_config(config)
        .with_task(create_low_start_task())
        .build();

    let mut modes = Vec::new();
    for _ in 0..200 {
        app.run_frames(1);
        if let Some(mode) = app.engine().autopilot_mode() {
            if modes.last() != Some(&mode) {
                modes.push(mode);
            }
        }
    }

    let climb = modes
        .iter()
        .position(|m| *m == FlightMode::Climb)
        .expect("Never climbed");
    assert!(
        modes[climb..].contains(&FlightMode::Cruise),
        "Never left the climb: {:?}",
        modes
    );
}
