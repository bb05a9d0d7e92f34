use crate::geo::Coordinate;
use serde::Deserialize;

/// Provider ceiling on coordinates per matrix request, origin included.
pub const MAX_MATRIX_COORDS: usize = 25;

/// Destinations that fit in one request alongside the single origin slot.
pub const DESTINATIONS_PER_CHUNK: usize = MAX_MATRIX_COORDS - 1;

pub const DEFAULT_MATRIX_BASE_URL: &str = "https://api.mapbox.com/directions-matrix/v1/mapbox";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelProfile {
    Driving,
    Walking,
}

impl TravelProfile {
    pub const fn as_path_segment(self) -> &'static str {
        match self {
            TravelProfile::Driving => "driving",
            TravelProfile::Walking => "walking",
        }
    }
}

/// One origin-to-destination result, already converted to miles and minutes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteLeg {
    pub distance_miles: f64,
    pub duration_minutes: f64,
}

/// Raw matrix response. With a single source the provider returns one row
/// per annotation; entry 0 of each row is the origin-to-origin self
/// distance. Unroutable pairs come back as null.
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixResponse {
    pub code: String,
    #[serde(default)]
    pub distances: Vec<Vec<Option<f64>>>,
    #[serde(default)]
    pub durations: Vec<Vec<Option<f64>>>,
}

/// The `{lon},{lat};{lon},{lat}` path segment, origin first. The provider
/// expects longitude before latitude.
pub fn coordinates_path(origin: Coordinate, destinations: &[Coordinate]) -> String {
    let mut path = format!("{},{}", origin.longitude, origin.latitude);
    for destination in destinations {
        path.push_str(&format!(
            ";{},{}",
            destination.longitude, destination.latitude
        ));
    }
    path
}
