use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};

use crate::components::AircraftState;

/// Where the published sample came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Sample from a live device
    pub real: bool,
    /// Sample played back by the replay engine
    pub replay: bool,
    /// Sample produced by the autopilot
    pub simulator: bool,
    /// Sample reconstructed between recorded fixes
    pub interpolated: bool,
}

/// Virtual time each field group was last written, `None` if never
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Freshness {
    pub location: Option<f64>,
    pub altitude: Option<f64>,
    pub baro_altitude: Option<f64>,
    pub ground_speed: Option<f64>,
    pub track: Option<f64>,
    pub airspeed: Option<f64>,
    pub vertical_rate: Option<f64>,
    pub wind: Option<f64>,
}

/// Latest replayed sample as seen by display and fusion consumers
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BlackboardRecord {
    pub state: AircraftState,
    pub provenance: Provenance,
    pub freshness: Freshness,
    /// Incremented on every publish
    pub sequence: u64,
}

impl BlackboardRecord {
    fn apply(&mut self, state: AircraftState, provenance: Provenance) {
        let stamp = state.time;
        let freshness = &mut self.freshness;
        freshness.location = stamp;
        freshness.ground_speed = stamp;
        freshness.track = stamp;
        if state.altitude_valid {
            freshness.altitude = stamp;
            freshness.baro_altitude = stamp;
            freshness.vertical_rate = stamp;
        }
        if provenance.simulator {
            freshness.airspeed = stamp;
            freshness.wind = stamp;
        }

        self.state = state;
        self.provenance = provenance;
        self.sequence += 1;
    }
}

/// Shared output slot of the replay engine.
///
/// Writers hold the lock only for the copy.
#[derive(Debug, Clone, Default)]
pub struct SharedBlackboard(Arc<Mutex<BlackboardRecord>>);

impl SharedBlackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, state: AircraftState, provenance: Provenance) {
        let mut record = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        record.apply(state, provenance);
    }

    /// Replay ended: the aircraft is no longer moving on the replay's behalf.
    pub fn stop_replay(&self) {
        let mut record = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        record.state.ground_speed = 0.0;
        record.provenance.replay = false;
        record.provenance.simulator = false;
        record.provenance.interpolated = false;
    }

    pub fn snapshot(&self) -> BlackboardRecord {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
