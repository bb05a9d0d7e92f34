use crate::v1::AppState;
use crate::v1::api_models::{
    LotAvailabilityResponse, NearestLotsQuery, PageParams, PaginatedSnapshots, RankedLotResponse,
    SnapshotResponse,
};
use crate::v1::db::queries::{
    count_lot_snapshots, get_lot_snapshots, get_lot_with_availability, list_lots,
    list_lots_with_availability, lot_exists,
};
use crate::v1::error::ApiError;
use axum::Json;
use axum::extract::{Path, Query, State};
use shared::geo::Coordinate;
use shared::mapbox::matrix::TravelProfile;
use shared::proximity::{PointOfInterest, rank, rankable_distances};
use std::collections::HashMap;
use uuid::Uuid;

const DEFAULT_PER_PAGE: i64 = 50;
const MAX_PER_PAGE: i64 = 100;

pub async fn get_lots(
    State(state): State<AppState>,
) -> Result<Json<Vec<LotAvailabilityResponse>>, ApiError> {
    let lots = list_lots_with_availability(&state.pool).await?;
    Ok(Json(
        lots.into_iter().map(LotAvailabilityResponse::from).collect(),
    ))
}

pub async fn get_lot(
    State(state): State<AppState>,
    Path(lot_id): Path<Uuid>,
) -> Result<Json<LotAvailabilityResponse>, ApiError> {
    let lot = get_lot_with_availability(&state.pool, lot_id)
        .await?
        .ok_or(ApiError::LotNotFound)?;
    Ok(Json(lot.into()))
}

pub async fn get_lot_history(
    State(state): State<AppState>,
    Path(lot_id): Path<Uuid>,
    Query(params): Query<PageParams>,
) -> Result<Json<PaginatedSnapshots>, ApiError> {
    if !lot_exists(&state.pool, lot_id).await? {
        return Err(ApiError::LotNotFound);
    }

    let page = params.page.unwrap_or(1).max(1);
    let per_page = params
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);

    let total = count_lot_snapshots(&state.pool, lot_id).await?;
    let snapshots =
        get_lot_snapshots(&state.pool, lot_id, per_page, (page - 1) * per_page).await?;
    let pages = if total > 0 {
        (total + per_page - 1) / per_page
    } else {
        1
    };

    Ok(Json(PaginatedSnapshots {
        items: snapshots.into_iter().map(SnapshotResponse::from).collect(),
        total,
        page,
        per_page,
        pages,
    }))
}

/// Ranks every lot from an ad-hoc coordinate. No precomputed distances exist
/// for raw points, so resolution goes straight to the routing provider with
/// the great-circle estimate as the fallback.
pub async fn get_nearest_lots(
    State(state): State<AppState>,
    Query(params): Query<NearestLotsQuery>,
) -> Result<Json<Vec<RankedLotResponse>>, ApiError> {
    let origin = PointOfInterest::Point(Coordinate::new(params.latitude, params.longitude));
    let profile = params
        .profile
        .map_or(TravelProfile::Driving, TravelProfile::from);

    let lots = list_lots(&state.pool).await?;
    let resolved =
        rankable_distances(&origin, lots, &HashMap::new(), &state.matrix, profile).await;

    Ok(Json(
        rank(resolved)
            .into_iter()
            .map(RankedLotResponse::from)
            .collect(),
    ))
}
