use serde::{Deserialize, Serialize};

use super::HEADING_FILTER_PERIOD;

/// Normalize an angle in degrees to a bearing in [0, 360)
#[inline]
pub fn normalize_bearing(deg: f64) -> f64 {
    let bearing = deg.rem_euclid(360.0);
    if bearing >= 360.0 {
        0.0
    } else {
        bearing
    }
}

/// Normalize an angle difference in degrees to (-180, 180]
#[inline]
pub fn angle_delta(deg: f64) -> f64 {
    let delta = normalize_bearing(deg);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(start: f64, end: f64, factor: f64) -> f64 {
    start + (end - start) * factor.clamp(0.0, 1.0)
}

/// First order low-pass filter used to smooth random heading deviations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LowPassFilter {
    alpha: f64,
    value: f64,
}

impl Default for LowPassFilter {
    fn default() -> Self {
        Self::with_period(HEADING_FILTER_PERIOD)
    }
}

impl LowPassFilter {
    /// Filter with a time constant of `period` updates.
    pub fn with_period(period: f64) -> Self {
        Self {
            alpha: 1.0 / period.max(1.0),
            value: 0.0,
        }
    }

    pub fn reset(&mut self, value: f64) {
        self.value = value;
    }

    pub fn update(&mut self, input: f64) -> f64 {
        self.value += self.alpha * (input - self.value);
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}
