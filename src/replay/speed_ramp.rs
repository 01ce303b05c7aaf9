use serde::{Deserialize, Serialize};

use crate::utils::{MAX_PLAYBACK_SPEED, SPEED_RAMP_MAX_REPEATS, SPEED_RAMP_STEP};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedDirection {
    Faster,
    Slower,
}

/// Key-repeat acceleration for playback speed changes.
///
/// Repeated presses in one direction grow the step; changing direction
/// starts over at a single step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpeedRamp {
    last: Option<SpeedDirection>,
    repeats: u32,
}

impl SpeedRamp {
    pub fn new() -> Self {
        Self::default()
    }

    /// New playback speed after one press in `direction`
    pub fn nudge(&mut self, speed: f64, direction: SpeedDirection) -> f64 {
        if self.last == Some(direction) {
            self.repeats = (self.repeats + 1).min(SPEED_RAMP_MAX_REPEATS);
        } else {
            self.last = Some(direction);
            self.repeats = 0;
        }

        let step = SPEED_RAMP_STEP * f64::from(self.repeats + 1);
        let next = match direction {
            SpeedDirection::Faster => speed + step,
            SpeedDirection::Slower => speed - step,
        };
        next.clamp(0.0, MAX_PLAYBACK_SPEED)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
