use bevy::log::debug;

use super::{AircraftState, WindVector};
use crate::utils::{destination, distance_bearing, normalize_bearing, GeoPoint, SEED_GROUND_SPEED};

/// Point-mass aircraft integrated over fixed timesteps.
///
/// The aircraft flies `heading` at its true airspeed, then drifts with the
/// wind for the same timestep. Track and ground speed are derived from the
/// resulting displacement.
#[derive(Debug, Clone, Default)]
pub struct AircraftKinematics {
    state: AircraftState,
    state_last: AircraftState,
}

impl AircraftKinematics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the aircraft to fly from `previous` through `start` at `altitude`.
    pub fn start(&mut self, start: GeoPoint, previous: GeoPoint, altitude: f64) {
        let wind = self.state.wind;
        let (_, track) = distance_bearing(previous, start);

        self.state = AircraftState {
            location: start,
            altitude,
            baro_altitude: altitude,
            ground_speed: SEED_GROUND_SPEED,
            track: track.unwrap_or(0.0),
            heading: track.unwrap_or(0.0),
            wind,
            flying: true,
            time: Some(0.0),
            ..Default::default()
        };
        self.state_last = AircraftState {
            location: previous,
            ..self.state
        };
        debug!(
            "Aircraft started at ({:.5}, {:.5}) altitude {:.0}",
            start.y(),
            start.x(),
            altitude
        );
    }

    /// Offsets the clock reported by subsequent states.
    pub fn set_time(&mut self, time: f64) {
        self.state.time = Some(time);
    }

    pub fn set_wind(&mut self, wind: WindVector) {
        self.state.wind = wind;
    }

    pub fn set_airspeed(&mut self, true_airspeed: f64, indicated_airspeed: f64) {
        self.state.true_airspeed = true_airspeed.max(0.0);
        self.state.indicated_airspeed = indicated_airspeed.max(0.0);
    }

    pub fn set_vertical_rate(&mut self, vertical_rate: f64) {
        self.state.vertical_rate = vertical_rate;
    }

    /// Advances the aircraft by `timestep` seconds flying `heading`.
    pub fn integrate(&mut self, heading: f64, timestep: f64) {
        debug_assert!(timestep > 0.0, "timestep must be strictly positive");
        let heading = normalize_bearing(heading);

        self.state_last = self.state;
        let endpoint = self.endpoint(heading, timestep);
        let (flown, track) = distance_bearing(self.state_last.location, endpoint);

        let state = &mut self.state;
        state.location = endpoint;
        state.heading = heading;
        if let Some(track) = track {
            state.track = track;
        }
        state.ground_speed = flown / timestep;
        state.altitude += state.vertical_rate * timestep;
        state.baro_altitude = state.altitude;
        state.flying = true;
        state.time = Some(self.state_last.time.unwrap_or(0.0) + timestep);
    }

    /// Location after flying `heading` for `timestep` from the current location
    fn endpoint(&self, heading: f64, timestep: f64) -> GeoPoint {
        let through_air = destination(
            self.state.location,
            heading,
            self.state.true_airspeed * timestep,
        );
        let wind = self.state.wind;
        destination(through_air, wind.bearing + 180.0, wind.speed * timestep)
    }

    pub fn state(&self) -> AircraftState {
        self.state
    }

    pub fn state_last(&self) -> AircraftState {
        self.state_last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{bearing, distance, geo_point};
    use approx::assert_relative_eq;

    fn started_aircraft() -> AircraftKinematics {
        let mut aircraft = AircraftKinematics::new();
        aircraft.start(geo_point(45.0, 7.0), geo_point(44.99, 7.0), 1000.0);
        aircraft
    }

    #[test]
    fn test_start_seeds_ground_speed() {
        let aircraft = started_aircraft();
        let state = aircraft.state();
        assert_eq!(state.ground_speed, SEED_GROUND_SPEED);
        assert!(state.flying);
        assert_eq!(state.time, Some(0.0));
        assert_relative_eq!(state.track, 0.0, epsilon = 1e-6);
        assert_eq!(aircraft.state_last().location, geo_point(44.99, 7.0));
    }

    #[test]
    fn test_integrate_lands_on_target_without_wind() {
        let mut aircraft = started_aircraft();
        let origin = aircraft.state().location;
        let target = geo_point(45.1, 7.2);
        let d = distance(origin, target);
        let v = 25.0;

        aircraft.set_airspeed(v, v);
        aircraft.integrate(bearing(origin, target), d / v);

        let state = aircraft.state();
        assert!(distance(state.location, target) < 1.0);
        assert_relative_eq!(state.ground_speed, v, epsilon = 1e-3);
        assert_relative_eq!(state.time.unwrap(), d / v, epsilon = 1e-9);
    }

    #[test]
    fn test_wind_drift_and_vertical_rate() {
        let mut aircraft = started_aircraft();
        aircraft.set_wind(WindVector::new(10.0, 270.0));
        aircraft.set_airspeed(0.0, 0.0);
        aircraft.set_vertical_rate(2.0);
        aircraft.integrate(0.0, 1.0);

        let state = aircraft.state();
        // Westerly wind pushes the aircraft east
        assert_relative_eq!(state.track, 90.0, epsilon = 0.01);
        assert_relative_eq!(state.ground_speed, 10.0, epsilon = 1e-3);
        assert_relative_eq!(state.altitude, 1002.0);
    }

    #[test]
    fn test_zero_displacement_keeps_track() {
        let mut aircraft = started_aircraft();
        aircraft.set_airspeed(0.0, 0.0);
        aircraft.integrate(90.0, 1.0);
        let state = aircraft.state();
        assert_eq!(state.ground_speed, 0.0);
        assert_relative_eq!(state.track, 0.0, epsilon = 1e-6);
    }
}
