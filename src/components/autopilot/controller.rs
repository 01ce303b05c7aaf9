use bevy::log::{debug, info};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{AutopilotParameters, FlightMode, ModeInputs};
use crate::components::task::{GlidePolar, LegStats, TaskProgressView};
use crate::components::AircraftState;
use crate::utils::{
    angle_delta, bearing, destination, distance, normalize_bearing, GeoPoint, LowPassFilter,
    BEST_CRUISE_TRACK_MIN_DISTANCE, MIN_WIND_CORRECTION, START_RUNUP_DISTANCE,
    SYNTHETIC_TIMESTEP,
};

/// Control outputs for one tick of the kinematic model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutopilotCommand {
    pub heading: f64,
    pub true_airspeed: f64,
    pub indicated_airspeed: f64,
    pub vertical_rate: f64,
}

/// Where the synthetic flight begins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartPoint {
    pub location: GeoPoint,
    pub previous: GeoPoint,
    pub altitude: f64,
}

/// Synthetic pilot flying a task.
///
/// Each tick the controller decides the flight mode, then commands heading,
/// airspeed and vertical rate. After the aircraft has moved it checks whether
/// the leg is done and keeps its active point in step with the task engine.
pub struct AutopilotController {
    params: AutopilotParameters,
    mode: FlightMode,
    /// Internally tracked active point
    awp: usize,
    target: GeoPoint,
    heading: f64,
    timestep: f64,
    heading_filter: LowPassFilter,
    rng: ChaCha8Rng,
}

impl AutopilotController {
    pub fn new(params: AutopilotParameters, rng: ChaCha8Rng) -> Self {
        Self {
            params,
            mode: FlightMode::default(),
            awp: 0,
            target: GeoPoint::new(0.0, 0.0),
            heading: 0.0,
            timestep: SYNTHETIC_TIMESTEP,
            heading_filter: LowPassFilter::default(),
            rng,
        }
    }

    /// Resets the pilot onto the first leg and picks the start of the flight.
    ///
    /// The aircraft starts inside the first zone, runs up from a point behind
    /// it and points at its first target. `fallback` is used when the task has
    /// no points.
    pub fn start(&mut self, task: &mut dyn TaskProgressView, fallback: GeoPoint) -> StartPoint {
        self.mode = FlightMode::Cruise;
        self.awp = 0;
        self.heading_filter.reset(0.0);
        task.reset();

        let location = if task.is_empty() {
            fallback
        } else {
            task.random_oz_point(0, self.params.target_noise, &mut self.rng)
        };
        self.select_target(task);
        if task.is_empty() {
            self.target = fallback;
        }

        self.heading = if distance(location, self.target) > 0.0 {
            bearing(location, self.target)
        } else {
            0.0
        };
        let previous = destination(location, self.heading + 180.0, START_RUNUP_DISTANCE);
        task.set_active_point(self.awp);

        info!(
            "Autopilot started at ({:.5}, {:.5}) heading {:.0}",
            location.y(),
            location.x(),
            self.heading
        );
        StartPoint {
            location,
            previous,
            altitude: self.params.start_alt,
        }
    }

    /// Decides the flight mode and the commands for the next `timestep`.
    pub fn update_state(
        &mut self,
        task: &dyn TaskProgressView,
        state: &AircraftState,
        timestep: f64,
    ) -> AutopilotCommand {
        self.timestep = timestep;
        let stats = task.leg_stats();
        let polar = task.glide_polar();

        let inputs = ModeInputs {
            altitude: state.altitude,
            target_height: task.target_height(),
            remaining_altitude_diff: stats.remaining_altitude_diff,
            active_point: self.awp,
        };
        let next = self.mode.next(&inputs);
        if next != self.mode {
            info!(
                "Autopilot {} -> {} at altitude {:.0}",
                self.mode, next, state.altitude
            );
            self.mode = next;
        }

        let (heading, true_airspeed, vertical_rate) = match self.mode {
            FlightMode::Climb => (
                self.heading + self.params.turn_speed * timestep,
                polar.v_min,
                polar.mc * self.params.climb_factor,
            ),
            FlightMode::Cruise | FlightMode::FinalGlide => {
                let tas = self.cruise_speed(&stats, &polar);
                let heading = self.cruise_heading(task, state, &stats, tas, timestep);
                (heading, tas, -polar.sink_rate(tas) * self.params.sink_factor)
            }
        };

        let deviation = self.heading_deviation();
        self.heading = normalize_bearing(heading + deviation * timestep);

        AutopilotCommand {
            heading: self.heading,
            true_airspeed,
            indicated_airspeed: true_airspeed,
            vertical_rate,
        }
    }

    /// Advances the leg once the target is reached and reconciles the active
    /// point with the task engine.
    pub fn update_autopilot(&mut self, task: &mut dyn TaskProgressView, state: &AircraftState) {
        if !self.far_from_target(task, state) && self.awp + 1 < task.size() {
            self.awp += 1;
            self.select_target(task);
            task.set_active_point(self.awp);
            info!("Autopilot advanced to leg {}", self.awp);
        }

        let external = task.active_point_index();
        if external > self.awp {
            debug!("Task advanced to leg {} ahead of autopilot", external);
            self.awp = external;
            self.select_target(task);
        } else if external < self.awp {
            task.set_active_point(self.awp);
        }
    }

    pub fn mode(&self) -> FlightMode {
        self.mode
    }

    pub fn active_point(&self) -> usize {
        self.awp
    }

    pub fn params(&self) -> &AutopilotParameters {
        &self.params
    }

    /// Point currently flown to
    pub fn current_target(&self, task: &dyn TaskProgressView) -> GeoPoint {
        if self.has_live_target() {
            task.active_point_location().unwrap_or(self.target)
        } else {
            self.target
        }
    }

    fn has_live_target(&self) -> bool {
        self.params.goto_target && self.awp > 0
    }

    /// Picks a point for the current leg, held until the leg changes.
    fn select_target(&mut self, task: &dyn TaskProgressView) {
        self.target = task.random_oz_point(self.awp, self.params.target_noise, &mut self.rng);
    }

    fn far_from_target(&self, task: &dyn TaskProgressView, state: &AircraftState) -> bool {
        if task.is_ordered() && self.has_live_target() {
            let remaining = task.leg_stats().remaining_distance;
            return remaining.map_or(true, |d| d > self.params.live_target_distance)
                || !task.has_entered(self.awp);
        }

        let reach = state.ground_speed * self.timestep * self.params.tick_distance_factor;
        distance(state.location, self.target) > reach
            || (self.awp > 0 && !task.has_entered(self.awp))
    }

    fn cruise_speed(&self, stats: &LegStats, polar: &GlidePolar) -> f64 {
        if stats.optimum_speed > 0.0 {
            stats.optimum_speed * self.params.speed_factor
        } else {
            polar.v_best_ld()
        }
    }

    fn target_bearing(
        &self,
        task: &dyn TaskProgressView,
        state: &AircraftState,
        stats: &LegStats,
    ) -> f64 {
        let long_leg = stats
            .remaining_distance
            .is_some_and(|d| d > BEST_CRUISE_TRACK_MIN_DISTANCE);
        if self.params.enable_bestcruisetrack && long_leg {
            stats.cruise_track_bearing
        } else {
            bearing(state.location, self.current_target(task))
        }
    }

    /// Desired heading with wind crab, reached at no more than the turn rate
    fn cruise_heading(
        &self,
        task: &dyn TaskProgressView,
        state: &AircraftState,
        stats: &LegStats,
        tas: f64,
        timestep: f64,
    ) -> f64 {
        let mut desired = self.target_bearing(task, state, stats);

        let wind = state.wind;
        if !wind.is_calm() && tas > 0.0 {
            let sin_theta = (wind.bearing - desired).to_radians().sin();
            if sin_theta.abs() > MIN_WIND_CORRECTION {
                let ratio = (sin_theta * wind.speed / tas).clamp(-1.0, 1.0);
                desired += ratio.asin().to_degrees();
            }
        }

        let max_turn = self.params.turn_speed * timestep;
        let turn = angle_delta(desired - self.heading).clamp(-max_turn, max_turn);
        self.heading + turn
    }

    /// Filtered random heading rate, halved while circling
    fn heading_deviation(&mut self) -> f64 {
        let noise = if self.mode.is_climbing() {
            self.params.bearing_noise * 0.5
        } else {
            self.params.bearing_noise
        };
        let r: f64 = self.rng.gen_range(-1.0..=1.0);
        self.heading_filter.update(noise * r)
    }
}
