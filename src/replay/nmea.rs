use bevy::log::debug;
use chrono::{NaiveDate, NaiveTime};

use super::LogFix;
use crate::utils::{geo_point, GeoPoint};

const KNOTS_TO_MS: f64 = 0.514_444;

/// Reader state for NMEA 0183 logs.
///
/// `RMC` sentences produce fixes; `GGA` sentences only update the altitude
/// attached to the following fix. Any talker id is accepted.
#[derive(Debug, Clone, Default)]
pub struct NmeaParser {
    altitude: Option<f64>,
}

impl NmeaParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_line(&mut self, line: &str) -> Option<LogFix> {
        let line = line.trim();
        if !line.starts_with('$') {
            return None;
        }
        let Some(body) = checked_body(line) else {
            debug!("Skipping NMEA sentence with bad checksum: {}", line);
            return None;
        };

        let fields: Vec<&str> = body.split(',').collect();
        let kind = fields[0].get(2..).unwrap_or_default();
        match kind {
            "GGA" => {
                match parse_gga(&fields) {
                    Some(altitude) => self.altitude = Some(altitude),
                    None => debug!("Skipping malformed GGA sentence: {}", line),
                }
                None
            }
            "RMC" => {
                let fix = parse_rmc(&fields, self.altitude);
                if fix.is_none() {
                    debug!("Skipping RMC sentence without valid fix: {}", line);
                }
                fix
            }
            _ => None,
        }
    }
}

/// Sentence body between `$` and `*`, if the checksum matches or is absent
fn checked_body(line: &str) -> Option<&str> {
    let line = line.strip_prefix('$')?;
    let Some((body, checksum)) = line.split_once('*') else {
        return Some(line);
    };
    let expected = u8::from_str_radix(checksum.get(..2)?, 16).ok()?;
    let actual = body.bytes().fold(0u8, |acc, b| acc ^ b);
    (actual == expected).then_some(body)
}

/// Altitude above mean sea level, `None` without a fix
fn parse_gga(fields: &[&str]) -> Option<f64> {
    let quality: u8 = fields.get(6)?.parse().ok()?;
    if quality == 0 {
        return None;
    }
    fields.get(9)?.parse().ok()
}

fn parse_rmc(fields: &[&str], altitude: Option<f64>) -> Option<LogFix> {
    if *fields.get(2)? != "A" {
        return None;
    }
    let time = parse_time(fields.get(1)?)?;
    let date = NaiveDate::parse_from_str(fields.get(9)?, "%d%m%y").ok()?;
    let location = parse_location(fields.get(3..7)?)?;
    let speed_knots: f64 = match *fields.get(7)? {
        "" => 0.0,
        s => s.parse().ok()?,
    };
    let track: Option<f64> = fields.get(8).and_then(|s| s.parse().ok());

    let (time_of_day, fraction) = time;
    let timestamp = date.and_time(time_of_day).and_utc().timestamp() as f64 + fraction;

    Some(LogFix {
        time: timestamp,
        location,
        altitude: altitude.unwrap_or(0.0),
        baro_altitude: None,
        altitude_valid: altitude.is_some(),
        ground_speed: Some(speed_knots * KNOTS_TO_MS),
        track,
    })
}

/// `hhmmss` with optional fractional seconds
fn parse_time(field: &str) -> Option<(NaiveTime, f64)> {
    let (whole, fraction) = match field.split_once('.') {
        Some((whole, fraction)) => (whole, format!("0.{}", fraction).parse().ok()?),
        None => (field, 0.0),
    };
    let time = NaiveTime::parse_from_str(whole, "%H%M%S").ok()?;
    Some((time, fraction))
}

/// `ddmm.mmmm,N,dddmm.mmmm,E`
fn parse_location(fields: &[&str]) -> Option<GeoPoint> {
    let latitude = parse_angle(fields[0], fields[1], ('N', 'S'))?;
    let longitude = parse_angle(fields[2], fields[3], ('E', 'W'))?;
    if latitude.abs() > 90.0 || longitude.abs() > 180.0 {
        return None;
    }
    Some(geo_point(latitude, longitude))
}

fn parse_angle(value: &str, hemisphere: &str, (positive, negative): (char, char)) -> Option<f64> {
    let raw: f64 = value.parse().ok()?;
    let degrees = (raw / 100.0).trunc();
    let angle = degrees + (raw - degrees * 100.0) / 60.0;
    match hemisphere.chars().next()? {
        c if c == positive => Some(angle),
        c if c == negative => Some(-angle),
        _ => None,
    }
}
