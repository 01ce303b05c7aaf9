use bevy::log::info;
use std::time::{Duration, Instant};

use crate::utils::ReplayError;

/// Source of monotonic wall-clock readings
pub trait WallClock: Send + Sync {
    /// Time elapsed since an arbitrary fixed origin
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Replay time, decoupled from the wall clock.
///
/// Undefined until the first timestamped sample arrives. Advances by scaled
/// wall time, or by fixed steps while fast-forwarding to a horizon.
#[derive(Debug, Clone)]
pub struct VirtualClock {
    time: Option<f64>,
    fast_forward_to: Option<f64>,
    anchor: Option<Duration>,
    speed: f64,
    fast_forward_step: f64,
}

impl VirtualClock {
    pub fn new(speed: f64, fast_forward_step: f64) -> Self {
        Self {
            time: None,
            fast_forward_to: None,
            anchor: None,
            speed: speed.max(0.0),
            fast_forward_step,
        }
    }

    /// Forgets time, horizon and anchor; keeps the speed.
    pub fn reset(&mut self) {
        self.time = None;
        self.fast_forward_to = None;
        self.anchor = None;
    }

    pub fn time(&self) -> Option<f64> {
        self.time
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = Some(time);
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.max(0.0);
    }

    pub fn is_paused(&self) -> bool {
        self.speed <= 0.0
    }

    /// Wall time since the previous reading, moving the anchor to `now`
    pub fn tick(&mut self, now: Duration) -> Duration {
        let elapsed = self
            .anchor
            .map_or(Duration::ZERO, |anchor| now.saturating_sub(anchor));
        self.anchor = Some(now);
        elapsed
    }

    /// Advances virtual time for `elapsed` wall time, returns the step taken.
    pub fn advance(&mut self, elapsed: Duration) -> f64 {
        let Some(time) = self.time else {
            return 0.0;
        };

        let step = match self.fast_forward_to {
            Some(horizon) => {
                let step = self.fast_forward_step.min(horizon - time).max(0.0);
                if time + step >= horizon {
                    info!("Fast-forward reached {:.0}", horizon);
                    self.fast_forward_to = None;
                }
                step
            }
            None => elapsed.as_secs_f64() * self.speed,
        };
        self.time = Some(time + step);
        step
    }

    /// Skips `delta` seconds ahead of the current virtual time.
    pub fn fast_forward(&mut self, delta: f64) -> Result<f64, ReplayError> {
        if delta.is_nan() || delta <= 0.0 {
            return Err(ReplayError::InvalidConfig(format!(
                "fast-forward interval must be positive, got {}",
                delta
            )));
        }
        let time = self.time.ok_or(ReplayError::NotActive)?;
        let horizon = time + delta;
        self.fast_forward_to = Some(horizon);
        Ok(horizon)
    }

    pub fn is_fast_forwarding(&self) -> bool {
        self.fast_forward_to.is_some()
    }

    pub fn cancel_fast_forward(&mut self) {
        self.fast_forward_to = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_undefined_until_set() {
        let mut clock = VirtualClock::new(1.0, 10.0);
        clock.tick(Duration::from_secs(1));
        assert_eq!(clock.advance(Duration::from_secs(1)), 0.0);
        assert_eq!(clock.time(), None);
        assert!(matches!(clock.fast_forward(5.0), Err(ReplayError::NotActive)));
    }

    #[test]
    fn test_scaled_advance() {
        let mut clock = VirtualClock::new(4.0, 10.0);
        clock.set_time(100.0);
        assert_eq!(clock.tick(Duration::from_millis(500)), Duration::ZERO);
        let elapsed = clock.tick(Duration::from_millis(750));
        assert_relative_eq!(clock.advance(elapsed), 1.0);
        assert_relative_eq!(clock.time().unwrap(), 101.0);
    }

    #[test]
    fn test_fast_forward_lands_on_horizon() {
        let mut clock = VirtualClock::new(1.0, 10.0);
        clock.set_time(0.0);
        assert_relative_eq!(clock.fast_forward(25.0).unwrap(), 25.0);
        assert!(clock.is_fast_forwarding());

        let steps: Vec<f64> = (0..3).map(|_| clock.advance(Duration::ZERO)).collect();
        assert_eq!(steps, vec![10.0, 10.0, 5.0]);
        assert!(!clock.is_fast_forwarding());
        assert_relative_eq!(clock.time().unwrap(), 25.0);
    }

    #[test]
    fn test_rejects_non_positive_fast_forward() {
        let mut clock = VirtualClock::new(1.0, 10.0);
        clock.set_time(0.0);
        assert!(matches!(
            clock.fast_forward(0.0),
            Err(ReplayError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_pause_and_reset() {
        let mut clock = VirtualClock::new(-2.0, 10.0);
        assert!(clock.is_paused());
        clock.set_speed(2.0);
        clock.set_time(5.0);
        clock.reset();
        assert_eq!(clock.time(), None);
        assert_eq!(clock.speed(), 2.0);
    }
}
