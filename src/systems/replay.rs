use bevy::prelude::*;
use std::path::PathBuf;
use std::time::Duration;

use crate::replay::{ReplayEngine, SpeedDirection, TickOutcome};

/// One-shot host timer re-armed by the engine after every tick
#[derive(Resource, Debug)]
pub struct ReplayTimer(pub Timer);

impl Default for ReplayTimer {
    fn default() -> Self {
        let mut timer = Timer::new(Duration::ZERO, TimerMode::Once);
        timer.pause();
        Self(timer)
    }
}

impl ReplayTimer {
    pub fn arm(&mut self, delay: Duration) {
        self.0.set_duration(delay);
        self.0.reset();
        self.0.unpause();
    }

    pub fn disarm(&mut self) {
        self.0.pause();
    }
}

/// Start a replay of the log at `path`, or a synthetic flight without one
#[derive(Event, Debug, Clone, Default)]
pub struct StartReplay {
    pub path: Option<PathBuf>,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct StopReplay;

/// Skip ahead by `seconds` of virtual time
#[derive(Event, Debug, Clone, Copy)]
pub struct FastForwardReplay {
    pub seconds: f64,
}

/// Sent once the running replay has run out of samples
#[derive(Event, Debug, Clone, Copy)]
pub struct ReplayFinished;

/// Applies start, stop and fast-forward requests to the engine.
pub fn handle_replay_requests(
    mut starts: EventReader<StartReplay>,
    mut stops: EventReader<StopReplay>,
    mut fast_forwards: EventReader<FastForwardReplay>,
    mut engine: ResMut<ReplayEngine>,
    mut timer: ResMut<ReplayTimer>,
) {
    for _ in stops.read() {
        engine.stop();
        timer.disarm();
    }

    for request in starts.read() {
        match engine.start(request.path.as_deref()) {
            Ok(()) => {
                if let Some(delay) = engine.armed_delay() {
                    timer.arm(delay);
                }
            }
            Err(e) => {
                warn!("Failed to start replay: {}", e);
                timer.disarm();
            }
        }
    }

    for request in fast_forwards.read() {
        if let Err(e) = engine.fast_forward(request.seconds) {
            warn!("Fast-forward of {}s rejected: {}", request.seconds, e);
        }
    }
}

/// Runs one engine tick each time the host timer fires.
pub fn replay_tick_system(
    time: Res<Time>,
    mut engine: ResMut<ReplayEngine>,
    mut timer: ResMut<ReplayTimer>,
    mut finished: EventWriter<ReplayFinished>,
) {
    if !engine.is_active() {
        return;
    }

    timer.0.tick(time.delta());
    if !timer.0.finished() {
        return;
    }

    match engine.update_at(time.elapsed()) {
        TickOutcome::Continue(delay) => timer.arm(delay),
        TickOutcome::Finished => {
            timer.disarm();
            finished.send(ReplayFinished);
        }
    }
}

/// Arrow keys ramp the playback speed, space pauses.
pub fn replay_keyboard_system(
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    mut engine: ResMut<ReplayEngine>,
) {
    let Some(keyboard) = keyboard else {
        return;
    };

    if keyboard.just_pressed(KeyCode::ArrowUp) {
        let speed = engine.nudge_speed(SpeedDirection::Faster);
        info!("Playback speed {}", speed);
    } else if keyboard.just_pressed(KeyCode::ArrowDown) {
        let speed = engine.nudge_speed(SpeedDirection::Slower);
        info!("Playback speed {}", speed);
    } else if keyboard.just_pressed(KeyCode::Space) {
        let speed = if engine.playback_speed() > 0.0 {
            0.0
        } else {
            engine.config().playback_speed.max(1.0)
        };
        engine.set_playback_speed(speed);
        info!("Playback speed {}", speed);
    }
}
