use crate::v1::AppState;
use crate::v1::api_models::{ClassroomLotsResponse, ClassroomResponse, RankedLotResponse};
use crate::v1::db::models::{Building, Classroom};
use crate::v1::db::queries::{get_building, get_cached_distances, get_classroom as fetch_classroom, list_lots};
use crate::v1::error::ApiError;
use axum::Json;
use axum::extract::{Path, State};
use shared::mapbox::matrix::TravelProfile;
use shared::proximity::{CachedDistance, PointOfInterest, rank, rankable_distances};
use std::collections::HashMap;
use uuid::Uuid;

async fn load_classroom(
    state: &AppState,
    classroom_id: Uuid,
) -> Result<(Classroom, Option<Building>), ApiError> {
    let classroom = fetch_classroom(&state.pool, classroom_id)
        .await?
        .ok_or(ApiError::ClassroomNotFound)?;
    let building = match classroom.building_id {
        Some(building_id) => get_building(&state.pool, building_id).await?,
        None => None,
    };
    Ok((classroom, building))
}

pub async fn get_classroom(
    State(state): State<AppState>,
    Path(classroom_id): Path<Uuid>,
) -> Result<Json<ClassroomResponse>, ApiError> {
    let (classroom, building) = load_classroom(&state, classroom_id).await?;
    Ok(Json(ClassroomResponse::new(classroom, building)))
}

/// Ranks every lot from the classroom's building, nearest first.
///
/// Precomputed rows cover most lots; the routing provider fills the misses
/// and a great-circle estimate covers provider failures. A classroom without
/// a linked building has no origin coordinate and is rejected.
pub async fn get_classroom_lots(
    State(state): State<AppState>,
    Path(classroom_id): Path<Uuid>,
) -> Result<Json<ClassroomLotsResponse>, ApiError> {
    let (classroom, building) = load_classroom(&state, classroom_id).await?;
    let building = building.ok_or(ApiError::UnresolvableOrigin)?;

    let origin = PointOfInterest::Building {
        id: building.id,
        location: building.coordinate(),
    };

    let lots = list_lots(&state.pool).await?;
    let lot_ids: Vec<Uuid> = lots.iter().map(|lot| lot.id).collect();
    let cache: HashMap<Uuid, CachedDistance> =
        get_cached_distances(&state.pool, building.id, &lot_ids)
            .await?
            .into_iter()
            .map(|row| {
                (
                    row.lot_id,
                    CachedDistance {
                        distance_miles: row.distance_miles,
                        duration_minutes: row.duration_minutes,
                    },
                )
            })
            .collect();

    let resolved =
        rankable_distances(&origin, lots, &cache, &state.matrix, TravelProfile::Driving).await;

    Ok(Json(ClassroomLotsResponse {
        classroom: ClassroomResponse::new(classroom, Some(building)),
        lots: rank(resolved)
            .into_iter()
            .map(RankedLotResponse::from)
            .collect(),
    }))
}
