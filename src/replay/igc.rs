use bevy::log::debug;
use chrono::{NaiveDate, NaiveTime, Timelike};

use super::LogFix;
use crate::utils::geo_point;

const SECONDS_PER_DAY: f64 = 86_400.0;
/// A time of day this far behind the previous fix is a midnight rollover
const ROLLOVER_THRESHOLD: f64 = SECONDS_PER_DAY / 2.0;

/// Reader state for IGC flight recorder files.
///
/// Only B records produce fixes. The HFDTE header sets the date so that fix
/// times are seconds since the Unix epoch; without it they are seconds since
/// midnight of the recording day.
#[derive(Debug, Clone, Default)]
pub struct IgcParser {
    epoch: f64,
    last_time_of_day: Option<f64>,
}

impl IgcParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_line(&mut self, line: &str) -> Option<LogFix> {
        let line = line.trim_end();
        if let Some(date) = line.strip_prefix("HFDTE") {
            self.parse_date(date);
            return None;
        }
        if !line.starts_with('B') {
            return None;
        }

        let Some(record) = parse_b_record(line) else {
            debug!("Skipping malformed IGC record: {}", line);
            return None;
        };
        if !record.valid {
            debug!("IGC fix without 3D validity, altitude ignored: {}", line);
        }

        let time_of_day = f64::from(record.time.num_seconds_from_midnight());
        if let Some(last) = self.last_time_of_day {
            if last - time_of_day > ROLLOVER_THRESHOLD {
                self.epoch += SECONDS_PER_DAY;
            }
        }
        self.last_time_of_day = Some(time_of_day);

        let (altitude, baro_altitude) = match record.pressure_altitude {
            0 => (f64::from(record.gnss_altitude), None),
            pressure => (f64::from(pressure), Some(f64::from(pressure))),
        };
        Some(LogFix {
            time: self.epoch + time_of_day,
            location: geo_point(record.latitude, record.longitude),
            altitude,
            baro_altitude,
            altitude_valid: record.valid,
            ground_speed: None,
            track: None,
        })
    }

    /// `HFDTEDDMMYY` or the newer `HFDTEDATE:DDMMYY,NN`
    fn parse_date(&mut self, value: &str) {
        let digits = value.strip_prefix("DATE:").unwrap_or(value);
        let date = digits
            .get(..6)
            .and_then(|d| NaiveDate::parse_from_str(d, "%d%m%y").ok());
        match date.and_then(|d| d.and_hms_opt(0, 0, 0)) {
            Some(midnight) => {
                self.epoch = midnight.and_utc().timestamp() as f64;
                self.last_time_of_day = None;
            }
            None => debug!("Ignoring malformed IGC date header: HFDTE{}", value),
        }
    }
}

/// Fields of a single B record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BRecord {
    pub time: NaiveTime,
    pub latitude: f64,
    pub longitude: f64,
    pub valid: bool,
    pub pressure_altitude: i32,
    pub gnss_altitude: i32,
}

/// Parses `BHHMMSSDDMMmmmNDDDMMmmmEAPPPPPGGGGG`
pub fn parse_b_record(line: &str) -> Option<BRecord> {
    if !line.is_ascii() || line.len() < 35 || !line.starts_with('B') {
        return None;
    }

    let time = NaiveTime::parse_from_str(&line[1..7], "%H%M%S").ok()?;
    let latitude = parse_coordinate(&line[7..9], &line[9..14], &line[14..15], ('N', 'S'))?;
    let longitude = parse_coordinate(&line[15..18], &line[18..23], &line[23..24], ('E', 'W'))?;
    let valid = match &line[24..25] {
        "A" => true,
        "V" => false,
        _ => return None,
    };

    Some(BRecord {
        time,
        latitude,
        longitude,
        valid,
        pressure_altitude: line[25..30].parse().ok()?,
        gnss_altitude: line[30..35].parse().ok()?,
    })
}

/// Degrees plus thousandths of minutes, negated for the given hemisphere
fn parse_coordinate(
    degrees: &str,
    milli_minutes: &str,
    hemisphere: &str,
    (positive, negative): (char, char),
) -> Option<f64> {
    let degrees: u32 = degrees.parse().ok()?;
    let milli_minutes: u32 = milli_minutes.parse().ok()?;
    let value = f64::from(degrees) + f64::from(milli_minutes) / 60_000.0;
    match hemisphere.chars().next()? {
        c if c == positive => Some(value),
        c if c == negative => Some(-value),
        _ => None,
    }
}
