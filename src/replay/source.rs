use bevy::log::{debug, info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::PoisonError;

use super::{IgcParser, NmeaParser};
use crate::components::{
    AircraftKinematics, AircraftState, AutopilotController, AutopilotParameters, SharedTask,
    WindVector,
};
use crate::utils::{distance_bearing, GeoPoint, ReplayError, RngManager, SYNTHETIC_TIMESTEP};

/// Fix decoded from one log line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogFix {
    pub time: f64,
    pub location: GeoPoint,
    pub altitude: f64,
    pub baro_altitude: Option<f64>,
    /// False for fixes without a 3D position, whose altitude is unusable
    pub altitude_valid: bool,
    pub ground_speed: Option<f64>,
    pub track: Option<f64>,
}

#[derive(Debug, Clone)]
pub enum LogFormat {
    Igc(IgcParser),
    Nmea(NmeaParser),
}

impl LogFormat {
    /// Format for a file suffix, `None` when no parser handles it
    pub fn for_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "igc" => Some(LogFormat::Igc(IgcParser::new())),
            "nmea" | "txt" | "log" => Some(LogFormat::Nmea(NmeaParser::new())),
            _ => None,
        }
    }

    fn parse_line(&mut self, line: &str) -> Option<LogFix> {
        match self {
            LogFormat::Igc(parser) => parser.parse_line(line),
            LogFormat::Nmea(parser) => parser.parse_line(line),
        }
    }
}

/// Recorded flight read line by line.
///
/// Time only advances with the timestamps in the log. Fixes that carry no
/// ground speed, track or vertical rate get them from the previous fix, and
/// fixes without a usable altitude keep the previous one. Once the end of the
/// log or a read error is reached the source stays exhausted.
pub struct LogFileSource {
    reader: Box<dyn BufRead + Send + Sync>,
    format: LogFormat,
    buffer: Vec<u8>,
    last: Option<AircraftState>,
    produced: usize,
    exhausted: bool,
}

impl LogFileSource {
    pub fn new(reader: impl BufRead + Send + Sync + 'static, format: LogFormat) -> Self {
        Self {
            reader: Box::new(reader),
            format,
            buffer: Vec::new(),
            last: None,
            produced: 0,
            exhausted: false,
        }
    }

    pub fn open(path: &Path) -> Result<Self, ReplayError> {
        let format = LogFormat::for_path(path)
            .ok_or_else(|| ReplayError::UnsupportedSource(path.to_path_buf()))?;
        let file = File::open(path)?;
        info!("Replaying log {}", path.display());
        Ok(Self::new(BufReader::new(file), format))
    }

    /// Number of samples returned so far
    pub fn produced(&self) -> usize {
        self.produced
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn next_sample(&mut self) -> Option<AircraftState> {
        if self.exhausted {
            return None;
        }
        loop {
            self.buffer.clear();
            match self.reader.read_until(b'\n', &mut self.buffer) {
                Ok(0) => {
                    debug!("Log exhausted after {} samples", self.produced);
                    self.exhausted = true;
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Log read failed: {}", e);
                    self.exhausted = true;
                    return None;
                }
            }

            let line = String::from_utf8_lossy(&self.buffer);
            if let Some(fix) = self.format.parse_line(&line) {
                let state = self.to_state(fix);
                self.last = Some(state);
                self.produced += 1;
                return Some(state);
            }
        }
    }

    fn to_state(&self, fix: LogFix) -> AircraftState {
        let mut state = AircraftState {
            location: fix.location,
            altitude: fix.altitude,
            baro_altitude: fix.baro_altitude.unwrap_or(fix.altitude),
            altitude_valid: fix.altitude_valid,
            flying: true,
            time: Some(fix.time),
            ..Default::default()
        };

        if let Some(last) = self.last {
            if !fix.altitude_valid {
                state.altitude = last.altitude;
                state.baro_altitude = last.baro_altitude;
            }
            let dt = fix.time - last.time.unwrap_or(fix.time);
            let (flown, track) = distance_bearing(last.location, fix.location);
            state.track = track.unwrap_or(last.track);
            if dt > 0.0 {
                state.ground_speed = flown / dt;
                state.vertical_rate = (state.altitude - last.altitude) / dt;
            } else {
                state.ground_speed = last.ground_speed;
                state.vertical_rate = last.vertical_rate;
            }
        }
        if let Some(ground_speed) = fix.ground_speed {
            state.ground_speed = ground_speed;
        }
        if let Some(track) = fix.track {
            state.track = track;
        }
        state
    }
}

/// Flight flown by the autopilot against a task.
///
/// Every call advances one fixed timestep; the first call starts the flight
/// and returns the state at time zero. Never runs out of samples.
pub struct SyntheticSource {
    autopilot: AutopilotController,
    aircraft: AircraftKinematics,
    task: SharedTask,
    fallback_location: GeoPoint,
    started: bool,
}

impl SyntheticSource {
    pub fn new(
        params: AutopilotParameters,
        task: SharedTask,
        wind: WindVector,
        fallback_location: GeoPoint,
        rng: &RngManager,
    ) -> Self {
        let mut aircraft = AircraftKinematics::new();
        aircraft.set_wind(wind);
        Self {
            autopilot: AutopilotController::new(params, rng.get_rng("autopilot")),
            aircraft,
            task,
            fallback_location,
            started: false,
        }
    }

    pub fn autopilot(&self) -> &AutopilotController {
        &self.autopilot
    }

    pub fn task(&self) -> &SharedTask {
        &self.task
    }

    pub fn next_sample(&mut self) -> Option<AircraftState> {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);

        if !self.started {
            let start = self.autopilot.start(&mut *task, self.fallback_location);
            self.aircraft.start(start.location, start.previous, start.altitude);
            self.started = true;
        } else {
            let command =
                self.autopilot.update_state(&*task, &self.aircraft.state(), SYNTHETIC_TIMESTEP);
            self.aircraft.set_airspeed(command.true_airspeed, command.indicated_airspeed);
            self.aircraft.set_vertical_rate(command.vertical_rate);
            self.aircraft.integrate(command.heading, SYNTHETIC_TIMESTEP);
        }

        let state = self.aircraft.state();
        task.observe(&state);
        self.autopilot.update_autopilot(&mut *task, &state);
        Some(state)
    }
}

/// Producer of aircraft state samples for the replay engine
pub enum ReplaySource {
    LogFile(LogFileSource),
    Synthetic(Box<SyntheticSource>),
}

impl ReplaySource {
    /// Next sample, or `None` once the source is exhausted
    pub fn next_sample(&mut self) -> Option<AircraftState> {
        match self {
            ReplaySource::LogFile(source) => source.next_sample(),
            ReplaySource::Synthetic(source) => source.next_sample(),
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, ReplaySource::Synthetic(_))
    }
}

impl From<LogFileSource> for ReplaySource {
    fn from(source: LogFileSource) -> Self {
        ReplaySource::LogFile(source)
    }
}

impl From<SyntheticSource> for ReplaySource {
    fn from(source: SyntheticSource) -> Self {
        ReplaySource::Synthetic(Box::new(source))
    }
}
