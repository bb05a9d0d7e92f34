//! Distance resolution and nearest-first ranking of parking lots.
//!
//! Resolution is tiered: precomputed distance rows first (building origins
//! only), then the routing provider, then a great-circle estimate for
//! anything the provider could not answer. Each tier's failure mode can be
//! forced independently in tests.

use crate::geo::{Coordinate, great_circle_miles};
use crate::mapbox::MatrixClient;
use crate::mapbox::matrix::{RouteLeg, TravelProfile};
use std::collections::HashMap;
use std::future::Future;
use uuid::Uuid;

/// Where a proximity query starts: an ad-hoc point, or a building reached
/// through a classroom. Precomputed distances only exist for buildings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointOfInterest {
    Point(Coordinate),
    Building { id: Uuid, location: Coordinate },
}

impl PointOfInterest {
    pub fn coordinate(&self) -> Coordinate {
        match self {
            Self::Point(coordinate) => *coordinate,
            Self::Building { location, .. } => *location,
        }
    }

    pub fn building_id(&self) -> Option<Uuid> {
        match self {
            Self::Point(_) => None,
            Self::Building { id, .. } => Some(*id),
        }
    }
}

/// Read-only view of a lot, implemented by the persistence row types.
pub trait LotSite {
    fn id(&self) -> Uuid;
    fn coordinate(&self) -> Option<Coordinate>;
}

/// A precomputed (distance, duration) pair for one lot and the origin
/// building.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedDistance {
    pub distance_miles: f64,
    pub duration_minutes: f64,
}

/// Source of route legs for lots the precomputed table does not cover.
/// Implemented by [`MatrixClient`] and by test stubs.
pub trait RouteSource {
    fn routes(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
        profile: TravelProfile,
    ) -> impl Future<Output = Vec<Option<RouteLeg>>> + Send;
}

impl RouteSource for MatrixClient {
    fn routes(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
        profile: TravelProfile,
    ) -> impl Future<Output = Vec<Option<RouteLeg>>> + Send {
        self.resolve_routes_lenient(origin, destinations, profile)
    }
}

/// Which tier produced a resolved distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceSource {
    Precomputed,
    Routed,
    GreatCircle,
}

#[derive(Debug, Clone)]
pub struct ResolvedDistance<L> {
    pub lot: L,
    pub distance_miles: f64,
    pub duration_minutes: Option<f64>,
    pub source: DistanceSource,
}

/// Resolves a rankable distance for every lot that has a coordinate.
///
/// `cache` holds the precomputed rows for the origin building, keyed by lot
/// id; it is consulted only for building origins. Lots the cache misses go
/// to `router` in one batched pass, and any destination the router leaves
/// unresolved falls back to a great-circle estimate with an unknown
/// duration. Lots without a coordinate are dropped: they cannot be ranked
/// from any origin.
pub async fn rankable_distances<L, R>(
    origin: &PointOfInterest,
    lots: Vec<L>,
    cache: &HashMap<Uuid, CachedDistance>,
    router: &R,
    profile: TravelProfile,
) -> Vec<ResolvedDistance<L>>
where
    L: LotSite,
    R: RouteSource,
{
    let origin_coordinate = origin.coordinate();
    let use_cache = origin.building_id().is_some();

    let mut resolved = Vec::with_capacity(lots.len());
    let mut unresolved: Vec<(L, Coordinate)> = Vec::new();

    for lot in lots {
        let Some(coordinate) = lot.coordinate() else {
            continue;
        };
        if use_cache && let Some(cached) = cache.get(&lot.id()) {
            resolved.push(ResolvedDistance {
                lot,
                distance_miles: cached.distance_miles,
                duration_minutes: Some(cached.duration_minutes),
                source: DistanceSource::Precomputed,
            });
        } else {
            unresolved.push((lot, coordinate));
        }
    }

    if unresolved.is_empty() {
        return resolved;
    }

    let destinations: Vec<Coordinate> = unresolved
        .iter()
        .map(|(_, coordinate)| *coordinate)
        .collect();
    let legs = router
        .routes(origin_coordinate, &destinations, profile)
        .await;

    for ((lot, coordinate), leg) in unresolved.into_iter().zip(legs) {
        match leg {
            Some(leg) => resolved.push(ResolvedDistance {
                lot,
                distance_miles: leg.distance_miles,
                duration_minutes: Some(leg.duration_minutes),
                source: DistanceSource::Routed,
            }),
            None => resolved.push(ResolvedDistance {
                lot,
                distance_miles: great_circle_miles(origin_coordinate, coordinate),
                // Duration is unknown for a straight-line estimate and is
                // never fabricated.
                duration_minutes: None,
                source: DistanceSource::GreatCircle,
            }),
        }
    }

    resolved
}

/// Nearest-first ordering. The sort is stable: lots at equal distance keep
/// their relative order from the resolved input. Duration is carried through
/// for display and never used as a sort key.
pub fn rank<L>(mut resolved: Vec<ResolvedDistance<L>>) -> Vec<ResolvedDistance<L>> {
    resolved.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
    resolved
}
