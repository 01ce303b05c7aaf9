use nalgebra::Vector4;
use std::collections::VecDeque;

use crate::utils::{
    distance, distance_bearing, geo_point, lerp, GeoPoint, CATMULL_ROM_TENSION,
    INTERPOLATION_WINDOW, LOOKAHEAD_MARGIN, TANGENT_INTERVAL,
};

/// Raw sample in the interpolation window
#[derive(Debug, Clone, Copy, PartialEq)]
struct ControlPoint {
    time: f64,
    /// longitude, latitude, altitude, baro altitude
    value: Vector4<f64>,
}

impl ControlPoint {
    fn location(&self) -> GeoPoint {
        geo_point(self.value[1], self.value[0])
    }
}

/// Smoothed position at a point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolatedFix {
    pub location: GeoPoint,
    pub altitude: f64,
    pub baro_altitude: f64,
}

impl From<Vector4<f64>> for InterpolatedFix {
    fn from(value: Vector4<f64>) -> Self {
        Self {
            location: geo_point(value[1], value[0]),
            altitude: value[2],
            baro_altitude: value[3],
        }
    }
}

/// Catmull-Rom spline over the last four raw samples.
///
/// The curve is evaluated on the segment between the second and third
/// points; times outside it clamp to the segment ends.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryInterpolator {
    points: VecDeque<ControlPoint>,
}

impl TrajectoryInterpolator {
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(INTERPOLATION_WINDOW),
        }
    }

    pub fn reset(&mut self) {
        self.points.clear();
    }

    pub fn is_ready(&self) -> bool {
        self.points.len() == INTERPOLATION_WINDOW
    }

    /// True while the window cannot cover `time` with some look-ahead
    pub fn needs_more_data(&self, time: f64) -> bool {
        match self.segment() {
            Some((_, _, p2, _)) => p2.time <= time + LOOKAHEAD_MARGIN,
            None => true,
        }
    }

    /// Appends a sample, dropping the oldest once the window is full.
    ///
    /// Samples not strictly newer than the last one are ignored; returns
    /// whether the sample was taken.
    pub fn feed(
        &mut self,
        time: f64,
        location: GeoPoint,
        altitude: f64,
        baro_altitude: f64,
    ) -> bool {
        if self.points.back().is_some_and(|last| time <= last.time) {
            return false;
        }
        if self.is_ready() {
            self.points.pop_front();
        }
        self.points.push_back(ControlPoint {
            time,
            value: Vector4::new(location.x(), location.y(), altitude, baro_altitude),
        });
        true
    }

    /// Start of the interpolated segment
    pub fn min_time(&self) -> Option<f64> {
        self.segment().map(|(_, p1, _, _)| p1.time)
    }

    /// End of the interpolated segment
    pub fn max_time(&self) -> Option<f64> {
        self.segment().map(|(_, _, p2, _)| p2.time)
    }

    pub fn interpolate(&self, time: f64) -> Option<InterpolatedFix> {
        let (p0, p1, p2, p3) = self.segment()?;
        let u = Self::segment_fraction(p1, p2, time);
        if u <= 0.0 {
            return Some(p1.value.into());
        }
        if u >= 1.0 {
            return Some(p2.value.into());
        }

        let t = CATMULL_ROM_TENSION;
        let u2 = u * u;
        let u3 = u2 * u;
        let c0 = -t * u3 + 2.0 * t * u2 - t * u;
        let c1 = (2.0 - t) * u3 + (t - 3.0) * u2 + 1.0;
        let c2 = (t - 2.0) * u3 + (3.0 - 2.0 * t) * u2 + t * u;
        let c3 = t * u3 - t * u2;

        let value = p0.value * c0 + p1.value * c1 + p2.value * c2 + p3.value * c3;
        Some(value.into())
    }

    /// Ground speed [m/s] and track [deg] at `time`.
    ///
    /// Speed blends the speeds of the segments either side of the second
    /// point; track follows the spline tangent.
    pub fn velocity_at(&self, time: f64) -> Option<(f64, Option<f64>)> {
        let (p0, p1, p2, _) = self.segment()?;
        let u = Self::segment_fraction(p1, p2, time);
        let speed = lerp(Self::segment_speed(p0, p1), Self::segment_speed(p1, p2), u);

        let here = self.interpolate(time)?;
        let ahead = self.interpolate(time + TANGENT_INTERVAL)?;
        let (_, track) = distance_bearing(here.location, ahead.location);
        Some((speed, track))
    }

    fn segment(&self) -> Option<(ControlPoint, ControlPoint, ControlPoint, ControlPoint)> {
        if !self.is_ready() {
            return None;
        }
        Some((self.points[0], self.points[1], self.points[2], self.points[3]))
    }

    fn segment_fraction(p1: ControlPoint, p2: ControlPoint, time: f64) -> f64 {
        (time - p1.time) / (p2.time - p1.time)
    }

    fn segment_speed(from: ControlPoint, to: ControlPoint) -> f64 {
        distance(from.location(), to.location()) / (to.time - from.time)
    }
}
