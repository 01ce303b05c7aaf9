use bevy::log::{debug, info, warn};
use bevy::prelude::Resource;
use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use super::{
    InterpolatedFix, LogFileSource, Provenance, ReplaySource, SharedBlackboard, SpeedDirection,
    SpeedRamp, SyntheticSource, TrajectoryInterpolator,
};
use crate::components::{share_task, AircraftState, FlightMode, SharedTask};
use crate::resources::{ReplayConfig, SystemClock, VirtualClock, WallClock};
use crate::utils::{ReplayError, RngManager, TANGENT_INTERVAL};

/// Result of one engine tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Re-arm the host timer with this delay
    Continue(Duration),
    /// Source exhausted or replay stopped; no further ticks wanted
    Finished,
}

/// Plays a replay source against a virtual clock.
///
/// The engine is driven by a one-shot host timer: every tick advances the
/// virtual clock, publishes what the source has for that time and asks for
/// the next tick after a delay matching the gap to the next sample.
#[derive(Resource)]
pub struct ReplayEngine {
    config: ReplayConfig,
    source: Option<ReplaySource>,
    clock: VirtualClock,
    interpolator: TrajectoryInterpolator,
    /// Samples fed to the interpolator before it had a full window
    warmup: Vec<AircraftState>,
    /// Samples handed back to raw playback
    backlog: VecDeque<AircraftState>,
    /// Log too short to interpolate, played raw instead
    raw_fallback: bool,
    /// Last raw sample published, at or ahead of virtual time when it was
    next_sample: Option<AircraftState>,
    blackboard: SharedBlackboard,
    task: SharedTask,
    ramp: SpeedRamp,
    wall_clock: Box<dyn WallClock>,
    armed_delay: Option<Duration>,
}

impl ReplayEngine {
    pub fn new(config: ReplayConfig) -> Self {
        let task = share_task(config.synthetic.build_task());
        Self::with_task(config, task)
    }

    /// Engine flying synthetic runs against an external task engine
    pub fn with_task(config: ReplayConfig, task: SharedTask) -> Self {
        let clock = VirtualClock::new(config.playback_speed, config.timing.fast_forward_step);
        Self {
            config,
            source: None,
            clock,
            interpolator: TrajectoryInterpolator::new(),
            warmup: Vec::new(),
            backlog: VecDeque::new(),
            raw_fallback: false,
            next_sample: None,
            blackboard: SharedBlackboard::new(),
            task,
            ramp: SpeedRamp::new(),
            wall_clock: Box::new(SystemClock::new()),
            armed_delay: None,
        }
    }

    pub fn with_wall_clock(mut self, wall_clock: impl WallClock + 'static) -> Self {
        self.wall_clock = Box::new(wall_clock);
        self
    }

    /// Starts a replay of the log at `path`, or a synthetic flight without one.
    ///
    /// Any running replay is stopped first.
    pub fn start(&mut self, path: Option<&Path>) -> Result<(), ReplayError> {
        self.stop();

        let source: ReplaySource = match path {
            Some(path) => LogFileSource::open(path)?.into(),
            None => {
                let synthetic = &self.config.synthetic;
                info!("Starting synthetic flight with seed {}", synthetic.seed);
                SyntheticSource::new(
                    self.config.autopilot,
                    self.task.clone(),
                    synthetic.wind,
                    synthetic.default_location,
                    &RngManager::new(synthetic.seed),
                )
                .into()
            }
        };
        self.start_source(source);
        Ok(())
    }

    /// Starts a replay of an already opened source
    pub fn start_source(&mut self, source: ReplaySource) {
        self.stop();
        self.source = Some(source);
        self.clock.reset();
        self.reset_interpolator();
        self.backlog.clear();
        self.raw_fallback = false;
        self.next_sample = None;
        self.armed_delay = Some(self.config.timing.initial_delay());
    }

    /// Ends the replay and releases the source. No further ticks are requested.
    pub fn stop(&mut self) {
        self.armed_delay = None;
        self.next_sample = None;
        self.backlog.clear();
        self.clock.cancel_fast_forward();
        if self.source.take().is_some() {
            self.blackboard.stop_replay();
            info!("Replay stopped");
        }
    }

    /// Tick using the engine's wall clock
    pub fn update(&mut self) -> TickOutcome {
        let now = self.wall_clock.now();
        self.update_at(now)
    }

    /// Tick at wall-clock reading `now`.
    pub fn update_at(&mut self, now: Duration) -> TickOutcome {
        let Some(synthetic) = self.source.as_ref().map(ReplaySource::is_synthetic) else {
            return TickOutcome::Finished;
        };

        let elapsed = self.clock.tick(now);
        if self.clock.is_paused() {
            return self.arm(self.config.timing.short_delay());
        }

        let step = self.clock.advance(elapsed);
        let alive = if self.is_raw(synthetic) {
            self.update_raw(step)
        } else {
            self.update_interpolated(step)
        };
        if !alive {
            info!("Replay source exhausted");
            self.stop();
            return TickOutcome::Finished;
        }

        let delay = self.next_delay(self.is_raw(synthetic));
        self.arm(delay)
    }

    /// Skips `delta` seconds of virtual time ahead.
    pub fn fast_forward(&mut self, delta: f64) -> Result<(), ReplayError> {
        if self.source.is_none() {
            return Err(ReplayError::NotActive);
        }
        let horizon = self.clock.fast_forward(delta)?;
        self.reset_interpolator();
        info!("Fast-forwarding to {:.0}", horizon);
        Ok(())
    }

    /// Sets the playback speed, zero or less pauses the replay.
    pub fn set_playback_speed(&mut self, speed: f64) {
        self.clock.set_speed(speed);
        debug!("Playback speed {}", self.clock.speed());
    }

    /// Steps the playback speed with key-repeat acceleration
    pub fn nudge_speed(&mut self, direction: SpeedDirection) -> f64 {
        let speed = self.ramp.nudge(self.clock.speed(), direction);
        self.set_playback_speed(speed);
        speed
    }

    pub fn is_active(&self) -> bool {
        self.source.is_some()
    }

    pub fn is_fast_forwarding(&self) -> bool {
        self.clock.is_fast_forwarding()
    }

    pub fn virtual_time(&self) -> Option<f64> {
        self.clock.time()
    }

    pub fn playback_speed(&self) -> f64 {
        self.clock.speed()
    }

    /// Delay of the pending host timer request, `None` when stopped
    pub fn armed_delay(&self) -> Option<Duration> {
        self.armed_delay
    }

    pub fn blackboard(&self) -> SharedBlackboard {
        self.blackboard.clone()
    }

    pub fn task(&self) -> SharedTask {
        self.task.clone()
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Flight mode of a running synthetic flight
    pub fn autopilot_mode(&self) -> Option<FlightMode> {
        match &self.source {
            Some(ReplaySource::Synthetic(source)) => Some(source.autopilot().mode()),
            _ => None,
        }
    }

    fn arm(&mut self, delay: Duration) -> TickOutcome {
        self.armed_delay = Some(delay);
        TickOutcome::Continue(delay)
    }

    fn is_raw(&self, synthetic: bool) -> bool {
        !self.config.interpolate
            || synthetic
            || self.raw_fallback
            || self.clock.is_fast_forwarding()
    }

    fn read_sample(&mut self) -> Option<AircraftState> {
        if let Some(sample) = self.next_sample.take() {
            return Some(sample);
        }
        if let Some(sample) = self.backlog.pop_front() {
            return Some(sample);
        }
        self.source.as_mut()?.next_sample()
    }

    fn reset_interpolator(&mut self) {
        self.interpolator.reset();
        self.warmup.clear();
    }

    /// Backwards jump larger than both this tick's step and the minimum tolerance
    fn is_time_warp(&self, sample_time: f64, step: f64) -> bool {
        let tolerance = step.max(self.config.timing.min_warp_tolerance);
        self.clock
            .time()
            .is_some_and(|time| sample_time + tolerance < time)
    }

    fn provenance(&self, interpolated: bool) -> Provenance {
        let synthetic = self
            .source
            .as_ref()
            .is_some_and(ReplaySource::is_synthetic);
        Provenance {
            real: false,
            replay: true,
            simulator: synthetic,
            interpolated,
        }
    }

    /// Publishes the first sample at or after virtual time and keeps it to
    /// time the next tick. Samples virtual time has already passed are
    /// skipped. Returns false once the source is exhausted.
    fn update_raw(&mut self, step: f64) -> bool {
        if let (Some(time), Some(published)) = (self.clock.time(), self.next_sample) {
            if published.time.is_some_and(|t| t >= time) {
                return true;
            }
        }
        self.next_sample = None;

        loop {
            let Some(sample) = self.read_sample() else {
                return false;
            };
            let Some(sample_time) = sample.time else {
                debug!("Dropping sample without timestamp");
                continue;
            };

            if self.is_time_warp(sample_time, step) {
                warn!(
                    "Time warp from {:.1} back to {:.1}",
                    self.clock.time().unwrap_or_default(),
                    sample_time
                );
                self.clock.cancel_fast_forward();
                self.clock.set_time(sample_time);
            }

            let time = match self.clock.time() {
                Some(time) => time,
                None => {
                    self.clock.set_time(sample_time);
                    sample_time
                }
            };
            if sample_time >= time {
                self.blackboard.publish(sample, self.provenance(false));
                self.next_sample = Some(sample);
                return true;
            }
        }
    }

    /// Feeds the interpolator until it covers virtual time, then publishes the
    /// smoothed state. A log that ends before the window fills is played raw.
    /// Returns false once the source is exhausted.
    fn update_interpolated(&mut self, step: f64) -> bool {
        while self
            .clock
            .time()
            .map_or(true, |time| self.interpolator.needs_more_data(time))
        {
            let Some(sample) = self.read_sample() else {
                if self.interpolator.is_ready() || self.warmup.is_empty() {
                    return false;
                }
                info!(
                    "Log ended after {} fixes, too few to interpolate",
                    self.warmup.len()
                );
                self.raw_fallback = true;
                self.backlog.extend(self.warmup.drain(..));
                self.interpolator.reset();
                return self.update_raw(step);
            };
            let Some(sample_time) = sample.time else {
                continue;
            };

            if self.is_time_warp(sample_time, step) {
                warn!(
                    "Time warp from {:.1} back to {:.1}",
                    self.clock.time().unwrap_or_default(),
                    sample_time
                );
                self.reset_interpolator();
                self.clock.set_time(sample_time);
            }
            if self.clock.time().is_none() {
                self.clock.set_time(sample_time);
            }
            let accepted = self.interpolator.feed(
                sample_time,
                sample.location,
                sample.altitude,
                sample.baro_altitude,
            );
            if self.interpolator.is_ready() {
                self.warmup.clear();
            } else if accepted {
                self.warmup.push(sample);
            }
        }

        let (Some(time), Some(min_time)) = (self.clock.time(), self.interpolator.min_time())
        else {
            return true;
        };
        let time = time.max(min_time);
        self.clock.set_time(time);

        if let Some(state) = self.interpolated_state(time) {
            self.blackboard.publish(state, self.provenance(true));
        }
        true
    }

    fn interpolated_state(&self, time: f64) -> Option<AircraftState> {
        let InterpolatedFix {
            location,
            altitude,
            baro_altitude,
        } = self.interpolator.interpolate(time)?;
        let ahead = self.interpolator.interpolate(time + TANGENT_INTERVAL)?;
        let (ground_speed, track) = self.interpolator.velocity_at(time)?;
        let track = track.unwrap_or(self.blackboard.snapshot().state.track);

        Some(AircraftState {
            location,
            altitude,
            baro_altitude,
            ground_speed,
            track,
            heading: track,
            vertical_rate: (ahead.altitude - altitude) / TANGENT_INTERVAL,
            flying: true,
            time: Some(time),
            ..Default::default()
        })
    }

    /// Wall-clock delay until the next sample is due
    fn next_delay(&self, raw: bool) -> Duration {
        let timing = &self.config.timing;
        if self.clock.is_paused() || self.clock.is_fast_forwarding() {
            return timing.short_delay();
        }
        let next_time = if raw {
            self.next_sample.and_then(|sample| sample.time)
        } else {
            self.interpolator.max_time()
        };
        match (self.clock.time(), next_time) {
            (Some(time), Some(next_time)) => {
                timing.clamp_delay((next_time - time) / self.clock.speed())
            }
            _ => timing.short_delay(),
        }
    }
}
