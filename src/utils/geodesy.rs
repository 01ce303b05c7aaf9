use geo::{Bearing, Destination, Distance, Haversine, Point};

use super::normalize_bearing;

/// Geographic location, x = longitude and y = latitude in degrees
pub type GeoPoint = Point<f64>;

/// Build a point from latitude/longitude degrees
#[inline]
pub fn geo_point(latitude: f64, longitude: f64) -> GeoPoint {
    Point::new(longitude, latitude)
}

/// Great circle distance [m]
#[inline]
pub fn distance(from: GeoPoint, to: GeoPoint) -> f64 {
    Haversine::distance(from, to)
}

/// Initial great circle bearing in [0, 360) degrees
#[inline]
pub fn bearing(from: GeoPoint, to: GeoPoint) -> f64 {
    normalize_bearing(Haversine::bearing(from, to))
}

/// Point reached travelling `distance` metres along `bearing` degrees
#[inline]
pub fn destination(origin: GeoPoint, bearing: f64, distance: f64) -> GeoPoint {
    if distance == 0.0 {
        return origin;
    }
    Haversine::destination(origin, normalize_bearing(bearing), distance)
}

/// Distance and bearing between two points, the bearing is `None` for coincident points
pub fn distance_bearing(from: GeoPoint, to: GeoPoint) -> (f64, Option<f64>) {
    let d = distance(from, to);
    if d > 0.0 {
        (d, Some(bearing(from, to)))
    } else {
        (0.0, None)
    }
}
