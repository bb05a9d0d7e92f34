use serde::{Deserialize, Serialize};

/// Mean Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Meters per statute mile, the divisor for routing-provider distances.
pub const METERS_PER_MILE: f64 = 1609.34;

/// A latitude/longitude pair in degrees.
///
/// Values are rounded to 7 fractional digits on construction, matching the
/// precision the lot and building tables carry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: round7(latitude),
            longitude: round7(longitude),
        }
    }
}

/// Great-circle distance between two coordinates in miles (haversine).
///
/// Total for any two finite coordinates: symmetric, and zero for identical
/// points.
pub fn great_circle_miles(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}

pub fn meters_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}

/// Seconds to minutes, rounded to two decimal places. Re-converting the same
/// input always yields the same value.
pub fn seconds_to_minutes(seconds: f64) -> f64 {
    round2(seconds / 60.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round7(value: f64) -> f64 {
    (value * 1e7).round() / 1e7
}
