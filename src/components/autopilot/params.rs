use serde::{Deserialize, Serialize};

/// Tuning of the synthetic pilot, fixed for the duration of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotParameters {
    /// Magnitude of the random heading deviation [deg/s]
    pub bearing_noise: f64,
    /// Offset of chosen targets from the zone centre, as a fraction of the zone radius
    pub target_noise: f64,
    /// Maximum turn rate [deg/s]
    pub turn_speed: f64,
    /// Scales the polar sink rate in cruise
    pub sink_factor: f64,
    /// Scales the MacCready climb rate in thermals
    pub climb_factor: f64,
    /// Initial altitude [m]
    pub start_alt: f64,
    /// Scales the glide solution speed in cruise
    pub speed_factor: f64,
    /// Follow the task's wind optimised cruise track on long legs
    pub enable_bestcruisetrack: bool,
    /// Fly to the live navigation point instead of a fixed point in the zone
    pub goto_target: bool,
    /// Leg is complete within this distance of a live target [m]
    pub live_target_distance: f64,
    /// Leg is complete within this many ticks of ground speed of a fixed target
    pub tick_distance_factor: f64,
}

impl Default for AutopilotParameters {
    fn default() -> Self {
        Self {
            bearing_noise: 20.0,
            target_noise: 0.1,
            turn_speed: 25.0,
            sink_factor: 1.0,
            climb_factor: 1.0,
            start_alt: 1500.0,
            speed_factor: 1.0,
            enable_bestcruisetrack: false,
            goto_target: false,
            live_target_distance: 100.0,
            tick_distance_factor: 1.0,
        }
    }
}

impl AutopilotParameters {
    /// Pilot with no heading noise, turning hard and hitting zone centres.
    pub fn ideal() -> Self {
        Self {
            bearing_noise: 0.0,
            target_noise: 0.01,
            turn_speed: 90.0,
            ..Default::default()
        }
    }

    /// Sloppy pilot with slow turns and loose targets.
    pub fn realistic() -> Self {
        Self {
            bearing_noise: 20.0,
            target_noise: 0.2,
            turn_speed: 12.0,
            ..Default::default()
        }
    }
}
