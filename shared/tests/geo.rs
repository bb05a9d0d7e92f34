use shared::geo::{Coordinate, great_circle_miles, meters_to_miles, round2, seconds_to_minutes};

fn westwood() -> Coordinate {
    Coordinate::new(34.0689, -118.4452)
}

fn downtown() -> Coordinate {
    Coordinate::new(34.0224, -118.2851)
}

#[test]
fn great_circle_is_symmetric() {
    assert_eq!(
        great_circle_miles(westwood(), downtown()),
        great_circle_miles(downtown(), westwood())
    );
}

#[test]
fn great_circle_is_zero_for_identical_points() {
    assert_eq!(great_circle_miles(westwood(), westwood()), 0.0);
    assert_eq!(great_circle_miles(downtown(), downtown()), 0.0);
}

#[test]
fn great_circle_matches_known_distance() {
    let miles = great_circle_miles(westwood(), downtown());
    assert!(
        (miles - 9.71).abs() < 0.05,
        "expected about 9.71 miles, got {miles}"
    );
}

#[test]
fn meters_convert_to_miles() {
    assert!((meters_to_miles(1609.34) - 1.0).abs() < 1e-12);
    assert!((meters_to_miles(3218.68) - 2.0).abs() < 1e-12);
}

#[test]
fn seconds_convert_to_rounded_minutes() {
    assert!((seconds_to_minutes(90.0) - 1.5).abs() < 1e-9);
    assert!((seconds_to_minutes(100.0) - 1.67).abs() < 1e-9);
    assert!((seconds_to_minutes(125.0) - 2.08).abs() < 1e-9);
}

#[test]
fn rounding_is_idempotent() {
    let minutes = seconds_to_minutes(100.0);
    assert_eq!(round2(minutes), minutes);
}

#[test]
fn coordinates_round_to_seven_decimals() {
    let coordinate = Coordinate::new(34.12345678, -118.98765432);
    assert_eq!(coordinate.latitude, 34.1234568);
    assert_eq!(coordinate.longitude, -118.9876543);
}
