use serde::{Deserialize, Serialize};

use crate::utils::{geo_point, GeoPoint};

/// Wind vector, `bearing` is the direction the wind blows from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindVector {
    /// Wind speed [m/s]
    pub speed: f64,
    /// Direction the wind comes from [deg]
    pub bearing: f64,
}

impl WindVector {
    pub fn new(speed: f64, bearing: f64) -> Self {
        Self { speed, bearing }
    }

    pub fn is_calm(&self) -> bool {
        self.speed <= 0.0
    }
}

/// Aircraft state sample produced by a replay source.
///
/// A flat value type; every consumer gets its own copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AircraftState {
    /// Position, x = longitude and y = latitude [deg]
    pub location: GeoPoint,
    /// GPS / navigation altitude [m]
    pub altitude: f64,
    /// Pressure altitude [m]
    pub baro_altitude: f64,
    /// False when the altitudes are carried over from an earlier sample
    pub altitude_valid: bool,
    /// Ground speed [m/s]
    pub ground_speed: f64,
    /// True airspeed [m/s]
    pub true_airspeed: f64,
    /// Indicated airspeed [m/s]
    pub indicated_airspeed: f64,
    /// Vertical rate, positive up [m/s]
    pub vertical_rate: f64,
    /// Ground track [deg]
    pub track: f64,
    /// Heading flown through the air [deg]
    pub heading: f64,
    pub wind: WindVector,
    /// Load factor [g]
    pub g_load: f64,
    pub flying: bool,
    /// Seconds since the reference epoch, `None` while undefined
    pub time: Option<f64>,
}

impl Default for AircraftState {
    fn default() -> Self {
        Self {
            location: geo_point(0.0, 0.0),
            altitude: 0.0,
            baro_altitude: 0.0,
            altitude_valid: true,
            ground_speed: 0.0,
            true_airspeed: 0.0,
            indicated_airspeed: 0.0,
            vertical_rate: 0.0,
            track: 0.0,
            heading: 0.0,
            wind: WindVector::default(),
            g_load: 1.0,
            flying: false,
            time: None,
        }
    }
}

impl AircraftState {
    /// Creates a state at a location and altitude with an undefined timestamp.
    pub fn at(location: GeoPoint, altitude: f64) -> Self {
        Self {
            location,
            altitude,
            baro_altitude: altitude,
            ..Default::default()
        }
    }

    pub fn with_time(mut self, time: f64) -> Self {
        self.time = Some(time);
        self
    }

    pub fn has_time(&self) -> bool {
        self.time.is_some()
    }

    pub fn latitude(&self) -> f64 {
        self.location.y()
    }

    pub fn longitude(&self) -> f64 {
        self.location.x()
    }
}
