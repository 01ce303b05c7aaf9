use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::{GlidePolar, LegStats, TaskProgressView};
use crate::components::AircraftState;
use crate::utils::{bearing, destination, distance, geo_point, GeoPoint, MIN_TARGET_HEIGHT};

/// Cylinder task point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskPoint {
    pub location: GeoPoint,
    /// Observation zone radius [m]
    pub radius: f64,
    /// Ground elevation [m]
    pub elevation: f64,
}

impl TaskPoint {
    pub fn new(location: GeoPoint, radius: f64, elevation: f64) -> Self {
        Self {
            location,
            radius,
            elevation,
        }
    }

    pub fn contains(&self, location: GeoPoint) -> bool {
        distance(self.location, location) <= self.radius
    }
}

/// Minimal ordered task engine.
///
/// Tracks zone entries from the samples it observes and advances the active
/// point on entry. The glide estimate is a straight best-L/D glide over the
/// remaining task distance.
#[derive(Debug, Clone)]
pub struct StaticTask {
    points: Vec<TaskPoint>,
    polar: GlidePolar,
    target_floor: f64,
    auto_advance: bool,
    active: usize,
    entered: Vec<bool>,
    aircraft: Option<(GeoPoint, f64)>,
}

impl StaticTask {
    pub fn new(points: Vec<TaskPoint>, polar: GlidePolar) -> Self {
        let entered = vec![false; points.len()];
        Self {
            points,
            polar,
            target_floor: MIN_TARGET_HEIGHT,
            auto_advance: true,
            active: 0,
            entered,
            aircraft: None,
        }
    }

    pub fn empty(polar: GlidePolar) -> Self {
        Self::new(Vec::new(), polar)
    }

    /// Minimum altitude below which the autopilot starts climbing
    pub fn with_target_floor(mut self, floor: f64) -> Self {
        self.target_floor = floor;
        self
    }

    pub fn with_auto_advance(mut self, auto_advance: bool) -> Self {
        self.auto_advance = auto_advance;
        self
    }

    pub fn points(&self) -> &[TaskPoint] {
        &self.points
    }

    /// Distance from `location` through the remaining task points
    fn remaining_task_distance(&self, location: GeoPoint) -> f64 {
        let Some(active) = self.points.get(self.active) else {
            return 0.0;
        };
        let legs: f64 = self.points[self.active..]
            .windows(2)
            .map(|pair| distance(pair[0].location, pair[1].location))
            .sum();
        distance(location, active.location) + legs
    }
}

impl TaskProgressView for StaticTask {
    fn is_ordered(&self) -> bool {
        self.points.len() > 1
    }

    fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn is_started(&self) -> bool {
        self.entered.first().copied().unwrap_or(false)
    }

    fn is_finished(&self) -> bool {
        self.is_ordered() && self.entered.last().copied().unwrap_or(false)
    }

    fn random_oz_point(&self, leg: usize, noise: f64, rng: &mut dyn RngCore) -> GeoPoint {
        let Some(point) = self.points.get(leg).or(self.points.last()) else {
            return geo_point(0.0, 0.0);
        };
        let offset = point.radius * noise.clamp(0.0, 1.0) * rng.gen::<f64>().sqrt();
        let direction = rng.gen::<f64>() * 360.0;
        destination(point.location, direction, offset)
    }

    fn leg_stats(&self) -> LegStats {
        let (Some(active), Some((location, altitude))) =
            (self.points.get(self.active), self.aircraft)
        else {
            return LegStats::default();
        };

        let finish_elevation = self.points.last().map_or(0.0, |p| p.elevation);
        let required = self.remaining_task_distance(location) / self.polar.best_ld();

        LegStats {
            remaining_distance: Some(distance(location, active.location)),
            remaining_altitude_diff: altitude - finish_elevation - required,
            optimum_speed: self.polar.speed_to_fly(),
            cruise_track_bearing: bearing(location, active.location),
        }
    }

    fn target_height(&self) -> f64 {
        self.points
            .get(self.active)
            .map_or(self.target_floor, |p| p.elevation.max(self.target_floor))
    }

    fn glide_polar(&self) -> GlidePolar {
        self.polar
    }

    fn has_entered(&self, leg: usize) -> bool {
        self.entered.get(leg).copied().unwrap_or(false)
    }

    fn size(&self) -> usize {
        self.points.len()
    }

    fn active_point_index(&self) -> usize {
        self.active
    }

    fn active_point_location(&self) -> Option<GeoPoint> {
        self.points.get(self.active).map(|p| p.location)
    }

    fn set_active_point(&mut self, leg: usize) {
        if !self.points.is_empty() {
            self.active = leg.min(self.points.len() - 1);
        }
    }

    fn observe(&mut self, state: &AircraftState) {
        self.aircraft = Some((state.location, state.altitude));
        let Some(point) = self.points.get(self.active) else {
            return;
        };
        if point.contains(state.location) && !self.entered[self.active] {
            self.entered[self.active] = true;
            if self.auto_advance && self.active + 1 < self.points.len() {
                self.active += 1;
            }
        }
    }

    fn reset(&mut self) {
        self.active = 0;
        self.entered.fill(false);
        self.aircraft = None;
    }
}
