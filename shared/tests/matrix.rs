use shared::geo::Coordinate;
use shared::mapbox::matrix::{
    DESTINATIONS_PER_CHUNK, MatrixResponse, TravelProfile, coordinates_path,
};
use shared::mapbox::{MatrixError, legs_from_response};

fn grid(count: usize) -> Vec<Coordinate> {
    (0..count)
        .map(|i| Coordinate::new(33.9 + i as f64 * 0.001, -117.3))
        .collect()
}

/// A response row with entry 0 as the origin self distance and the given
/// meter values for the destinations; durations are one minute per entry.
fn response_for(meters: &[f64]) -> MatrixResponse {
    let mut distances = vec![Some(0.0)];
    distances.extend(meters.iter().copied().map(Some));
    let durations = vec![Some(60.0); meters.len() + 1];
    MatrixResponse {
        code: "Ok".to_string(),
        distances: vec![distances],
        durations: vec![durations],
    }
}

#[test]
fn destination_sets_split_into_ceil_n_over_24_chunks() {
    for (count, expected) in [(1, 1), (24, 1), (25, 2), (48, 2), (50, 3), (100, 5)] {
        let destinations = grid(count);
        assert_eq!(destinations.chunks(DESTINATIONS_PER_CHUNK).count(), expected);
    }
}

#[test]
fn coordinates_path_is_origin_first_in_lon_lat_order() {
    let origin = Coordinate::new(34.1, -118.2);
    let destinations = [Coordinate::new(33.9, -117.9)];
    assert_eq!(
        coordinates_path(origin, &destinations),
        "-118.2,34.1;-117.9,33.9"
    );
}

#[test]
fn travel_profiles_map_to_provider_segments() {
    assert_eq!(TravelProfile::Driving.as_path_segment(), "driving");
    assert_eq!(TravelProfile::Walking.as_path_segment(), "walking");
}

#[test]
fn demultiplex_discards_origin_entry_and_converts_units() {
    let legs = legs_from_response(&response_for(&[1609.34, 3218.68]), 2).unwrap();
    assert_eq!(legs.len(), 2);
    assert!((legs[0].distance_miles - 1.0).abs() < 1e-9);
    assert!((legs[1].distance_miles - 2.0).abs() < 1e-9);
    assert!((legs[0].duration_minutes - 1.0).abs() < 1e-9);
}

#[test]
fn chunked_reassembly_preserves_destination_order() {
    // 50 destinations split 24/24/2; each destination i is marked with a
    // distance of i miles so order survives reassembly.
    let meters: Vec<f64> = (0..50).map(|i| i as f64 * 1609.34).collect();
    let mut legs = Vec::new();
    for chunk in meters.chunks(DESTINATIONS_PER_CHUNK) {
        legs.extend(legs_from_response(&response_for(chunk), chunk.len()).unwrap());
    }

    assert_eq!(legs.len(), 50);
    for (i, leg) in legs.iter().enumerate() {
        assert!(
            (leg.distance_miles - i as f64).abs() < 1e-9,
            "destination {i} out of order"
        );
    }
}

#[test]
fn null_matrix_entry_is_a_provider_failure() {
    let mut response = response_for(&[1609.34, 3218.68]);
    response.distances[0][2] = None;
    assert!(matches!(
        legs_from_response(&response, 2),
        Err(MatrixError::IncompleteMatrix { expected: 2 })
    ));
}

#[test]
fn short_row_is_a_provider_failure() {
    let response = response_for(&[1609.34]);
    assert!(matches!(
        legs_from_response(&response, 2),
        Err(MatrixError::IncompleteMatrix { expected: 2 })
    ));
}

#[test]
fn non_ok_code_is_a_provider_failure() {
    let mut response = response_for(&[1609.34]);
    response.code = "NoRoute".to_string();
    assert!(matches!(
        legs_from_response(&response, 1),
        Err(MatrixError::ProviderCode(code)) if code == "NoRoute"
    ));
}
