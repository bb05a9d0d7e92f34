use shared::geo::{Coordinate, great_circle_miles};
use shared::mapbox::matrix::{RouteLeg, TravelProfile};
use shared::proximity::{
    CachedDistance, DistanceSource, LotSite, PointOfInterest, ResolvedDistance, RouteSource, rank,
    rankable_distances,
};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct TestLot {
    id: Uuid,
    coordinate: Option<Coordinate>,
}

impl TestLot {
    fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            id: Uuid::now_v7(),
            coordinate: Some(Coordinate::new(latitude, longitude)),
        }
    }

    fn unplaced() -> Self {
        Self {
            id: Uuid::now_v7(),
            coordinate: None,
        }
    }
}

impl LotSite for TestLot {
    fn id(&self) -> Uuid {
        self.id
    }

    fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }
}

/// Returns a fixed leg (or `None`) per destination and counts invocations.
struct StubRouter {
    leg: Option<RouteLeg>,
    calls: AtomicUsize,
}

impl StubRouter {
    fn answering(leg: Option<RouteLeg>) -> Self {
        Self {
            leg,
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RouteSource for StubRouter {
    fn routes(
        &self,
        _origin: Coordinate,
        destinations: &[Coordinate],
        _profile: TravelProfile,
    ) -> impl Future<Output = Vec<Option<RouteLeg>>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let legs = vec![self.leg; destinations.len()];
        async move { legs }
    }
}

fn origin_building() -> PointOfInterest {
    PointOfInterest::Building {
        id: Uuid::now_v7(),
        location: Coordinate::new(33.9737, -117.3281),
    }
}

fn leg(distance_miles: f64, duration_minutes: f64) -> RouteLeg {
    RouteLeg {
        distance_miles,
        duration_minutes,
    }
}

#[tokio::test]
async fn full_cache_coverage_never_calls_the_router() {
    let lots = vec![TestLot::at(33.97, -117.33), TestLot::at(33.98, -117.32)];
    let cache: HashMap<_, _> = lots
        .iter()
        .enumerate()
        .map(|(i, lot)| {
            (
                lot.id,
                CachedDistance {
                    distance_miles: 0.5 + i as f64,
                    duration_minutes: 10.0,
                },
            )
        })
        .collect();
    let router = StubRouter::answering(Some(leg(99.0, 99.0)));

    let resolved = rankable_distances(
        &origin_building(),
        lots,
        &cache,
        &router,
        TravelProfile::Walking,
    )
    .await;

    assert_eq!(router.call_count(), 0);
    assert_eq!(resolved.len(), 2);
    assert!(
        resolved
            .iter()
            .all(|r| r.source == DistanceSource::Precomputed)
    );
    assert_eq!(resolved[0].distance_miles, 0.5);
    assert_eq!(resolved[0].duration_minutes, Some(10.0));
}

#[tokio::test]
async fn cache_misses_go_to_the_router() {
    let cached_lot = TestLot::at(33.97, -117.33);
    let routed_lot = TestLot::at(33.98, -117.32);
    let cache = HashMap::from([(
        cached_lot.id,
        CachedDistance {
            distance_miles: 0.4,
            duration_minutes: 8.0,
        },
    )]);
    let router = StubRouter::answering(Some(leg(1.2, 5.0)));

    let resolved = rankable_distances(
        &origin_building(),
        vec![cached_lot, routed_lot.clone()],
        &cache,
        &router,
        TravelProfile::Driving,
    )
    .await;

    assert_eq!(router.call_count(), 1);
    let routed = resolved
        .iter()
        .find(|r| r.lot.id == routed_lot.id)
        .unwrap();
    assert_eq!(routed.source, DistanceSource::Routed);
    assert_eq!(routed.distance_miles, 1.2);
    assert_eq!(routed.duration_minutes, Some(5.0));
}

#[tokio::test]
async fn router_failure_falls_back_to_great_circle_with_unknown_duration() {
    let origin = origin_building();
    let lot = TestLot::at(33.9806, -117.3755);
    let expected = great_circle_miles(origin.coordinate(), lot.coordinate.unwrap());
    let router = StubRouter::answering(None);

    let resolved = rankable_distances(
        &origin,
        vec![lot],
        &HashMap::new(),
        &router,
        TravelProfile::Driving,
    )
    .await;

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].source, DistanceSource::GreatCircle);
    assert_eq!(resolved[0].distance_miles, expected);
    assert_eq!(resolved[0].duration_minutes, None);
}

#[tokio::test]
async fn lots_without_coordinates_are_dropped() {
    let placed = TestLot::at(33.97, -117.33);
    let router = StubRouter::answering(Some(leg(1.0, 4.0)));

    let resolved = rankable_distances(
        &origin_building(),
        vec![TestLot::unplaced(), placed.clone(), TestLot::unplaced()],
        &HashMap::new(),
        &router,
        TravelProfile::Driving,
    )
    .await;

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].lot.id, placed.id);
}

#[tokio::test]
async fn point_origins_skip_the_precomputed_cache() {
    let lot = TestLot::at(33.97, -117.33);
    let cache = HashMap::from([(
        lot.id,
        CachedDistance {
            distance_miles: 0.1,
            duration_minutes: 2.0,
        },
    )]);
    let router = StubRouter::answering(Some(leg(3.3, 12.0)));
    let origin = PointOfInterest::Point(Coordinate::new(33.95, -117.39));

    let resolved =
        rankable_distances(&origin, vec![lot], &cache, &router, TravelProfile::Driving).await;

    assert_eq!(router.call_count(), 1);
    assert_eq!(resolved[0].source, DistanceSource::Routed);
    assert_eq!(resolved[0].distance_miles, 3.3);
}

#[test]
fn rank_sorts_ascending_and_keeps_ties_in_input_order() {
    let lots: Vec<TestLot> = (0..4).map(|_| TestLot::at(33.97, -117.33)).collect();
    let ids: Vec<Uuid> = lots.iter().map(|lot| lot.id).collect();
    let resolved: Vec<ResolvedDistance<TestLot>> = lots
        .into_iter()
        .zip([2.0, 1.0, 1.0, 0.5])
        .map(|(lot, distance_miles)| ResolvedDistance {
            lot,
            distance_miles,
            duration_minutes: None,
            source: DistanceSource::GreatCircle,
        })
        .collect();

    let ranked = rank(resolved);

    let distances: Vec<f64> = ranked.iter().map(|r| r.distance_miles).collect();
    assert_eq!(distances, vec![0.5, 1.0, 1.0, 2.0]);
    // The two 1.0-mile lots keep their relative input order.
    assert_eq!(ranked[1].lot.id, ids[1]);
    assert_eq!(ranked[2].lot.id, ids[2]);
    assert_eq!(ranked[0].lot.id, ids[3]);
}
