use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::components::{AutopilotParameters, GlidePolar, StaticTask, TaskPoint, WindVector};
use crate::utils::{geo_point, GeoPoint, ReplayError, MIN_TARGET_HEIGHT};

/// Host timer and clock tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay before the first tick after start [ms]
    pub initial_delay_ms: u64,
    /// Delay while paused, fast-forwarding or waiting for the first sample [ms]
    pub short_delay_ms: u64,
    /// Bounds of the delay computed from the next sample [ms]
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Virtual seconds skipped per tick while fast-forwarding
    pub fast_forward_step: f64,
    /// Smallest backwards jump treated as a time warp [s]
    pub min_warp_tolerance: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 100,
            short_delay_ms: 100,
            min_delay_ms: 100,
            max_delay_ms: 1000,
            fast_forward_step: 10.0,
            min_warp_tolerance: 1.0,
        }
    }
}

impl TimingConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn short_delay(&self) -> Duration {
        Duration::from_millis(self.short_delay_ms)
    }

    /// Clamps a requested delay into the configured bounds
    pub fn clamp_delay(&self, seconds: f64) -> Duration {
        let max = Duration::from_millis(self.max_delay_ms);
        let min = Duration::from_millis(self.min_delay_ms).min(max);
        Duration::try_from_secs_f64(seconds.max(0.0))
            .unwrap_or(max)
            .clamp(min, max)
    }
}

/// Setup of synthetic flights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub seed: u64,
    pub wind: WindVector,
    /// Start location when the task has no points
    pub default_location: GeoPoint,
    /// Minimum altitude before the autopilot climbs [m]
    pub target_floor: f64,
    pub polar: GlidePolar,
    pub task: Vec<TaskPoint>,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            wind: WindVector::default(),
            default_location: geo_point(46.30, 7.00),
            target_floor: MIN_TARGET_HEIGHT,
            polar: GlidePolar::default(),
            task: vec![
                TaskPoint::new(geo_point(46.30, 7.00), 1000.0, 450.0),
                TaskPoint::new(geo_point(46.60, 7.50), 500.0, 600.0),
                TaskPoint::new(geo_point(46.20, 7.80), 500.0, 500.0),
                TaskPoint::new(geo_point(46.30, 7.00), 1000.0, 450.0),
            ],
        }
    }
}

impl SyntheticConfig {
    pub fn build_task(&self) -> StaticTask {
        StaticTask::new(self.task.clone(), self.polar).with_target_floor(self.target_floor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub timing: TimingConfig,
    /// Smooth recorded logs between fixes
    pub interpolate: bool,
    /// Virtual seconds per wall-clock second, zero pauses
    pub playback_speed: f64,
    pub autopilot: AutopilotParameters,
    pub synthetic: SyntheticConfig,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            interpolate: true,
            playback_speed: 1.0,
            autopilot: AutopilotParameters::default(),
            synthetic: SyntheticConfig::default(),
        }
    }
}

impl ReplayConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_yaml::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ReplayError> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ReplayError> {
        let timing = &self.timing;
        if timing.min_delay_ms > timing.max_delay_ms {
            return Err(ReplayError::InvalidConfig(format!(
                "min_delay_ms {} exceeds max_delay_ms {}",
                timing.min_delay_ms, timing.max_delay_ms
            )));
        }
        if timing.fast_forward_step <= 0.0 {
            return Err(ReplayError::InvalidConfig(
                "fast_forward_step must be positive".to_string(),
            ));
        }
        if self.playback_speed < 0.0 {
            return Err(ReplayError::InvalidConfig(
                "playback_speed must not be negative".to_string(),
            ));
        }
        if self.synthetic.polar.a <= 0.0 {
            return Err(ReplayError::InvalidConfig(
                "glide polar must curve upwards".to_string(),
            ));
        }
        Ok(())
    }
}
