use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use super::GlidePolar;
use crate::components::AircraftState;
use crate::utils::GeoPoint;

/// Statistics of the active leg as reported by the task engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LegStats {
    /// Distance left on the active leg, `None` without an active point [m]
    pub remaining_distance: Option<f64>,
    /// Altitude above the glide needed to reach the finish [m]
    pub remaining_altitude_diff: f64,
    /// Glide solution speed for the leg, zero when there is no solution [m/s]
    pub optimum_speed: f64,
    /// Wind optimised track to the active point [deg]
    pub cruise_track_bearing: f64,
}

/// Read/mutate view over the external task engine.
///
/// The autopilot queries it every tick; the engine itself is not owned by
/// the replay.
pub trait TaskProgressView {
    fn is_ordered(&self) -> bool;
    fn is_empty(&self) -> bool;
    fn is_started(&self) -> bool;
    fn is_finished(&self) -> bool;

    /// Pseudo-random point inside the observation zone of `leg`, `noise` scales
    /// the offset from the zone centre.
    fn random_oz_point(&self, leg: usize, noise: f64, rng: &mut dyn RngCore) -> GeoPoint;

    fn leg_stats(&self) -> LegStats;
    fn target_height(&self) -> f64;
    fn glide_polar(&self) -> GlidePolar;
    fn has_entered(&self, leg: usize) -> bool;
    fn size(&self) -> usize;

    fn active_point_index(&self) -> usize;
    /// Live navigation point of the active leg
    fn active_point_location(&self) -> Option<GeoPoint>;
    fn set_active_point(&mut self, leg: usize);

    /// Notification of every sample produced for this task, for engines that
    /// track progress from the replay itself.
    fn observe(&mut self, _state: &AircraftState) {}

    /// Forget progress before a new flight
    fn reset(&mut self) {}
}

/// Task engine shared between the replay and its other consumers
pub type SharedTask = Arc<Mutex<dyn TaskProgressView + Send>>;

pub fn share_task<T: TaskProgressView + Send + 'static>(task: T) -> SharedTask {
    Arc::new(Mutex::new(task))
}
