use soar_replay::replay::BlackboardRecord;

/// Assert that a published record describes a plausible replayed aircraft
#[track_caller]
pub fn assert_record_valid(record: &BlackboardRecord) {
    let state = &record.state;
    assert!(state.time.is_some(), "Record has no timestamp");
    assert!(
        state.latitude().is_finite() && state.longitude().is_finite(),
        "Location is not finite"
    );
    assert!(state.altitude.is_finite(), "Altitude is not finite");
    assert!(state.ground_speed >= 0.0, "Ground speed is negative");
    assert!(
        (0.0..360.0).contains(&state.track),
        "Track {} out of range",
        state.track
    );
    assert!(record.provenance.replay, "Record not marked as replay");
    assert!(!record.provenance.real, "Replay record marked as real");
}

/// Assert that times never go backwards
#[track_caller]
pub fn assert_non_decreasing(times: &[f64]) {
    for pair in times.windows(2) {
        assert!(
            pair[1] >= pair[0],
            "Time went backwards from {} to {}",
            pair[0],
            pair[1]
        );
    }
}
