use crate::v1::AppState;
use crate::v1::api_models::{AccessQuery, LotResponse, PermitResponse};
use crate::v1::db::queries::{get_access_rules, get_lots_by_ids, get_permit as fetch_permit, list_permits};
use crate::v1::error::ApiError;
use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::Local;
use shared::access::{AccessRule, accessible_lot_ids};
use uuid::Uuid;

pub async fn get_permits(
    State(state): State<AppState>,
) -> Result<Json<Vec<PermitResponse>>, ApiError> {
    let permits = list_permits(&state.pool).await?;
    Ok(Json(permits.into_iter().map(PermitResponse::from).collect()))
}

pub async fn get_permit(
    State(state): State<AppState>,
    Path(permit_id): Path<Uuid>,
) -> Result<Json<PermitResponse>, ApiError> {
    let permit = fetch_permit(&state.pool, permit_id)
        .await?
        .ok_or(ApiError::PermitNotFound)?;
    Ok(Json(permit.into()))
}

/// Lots the permit may use at the evaluation instant (`at` query parameter,
/// defaulting to now). A lot is included if any of its rules matches; lots
/// with no rules for the permit are denied by default.
pub async fn get_permit_lots(
    State(state): State<AppState>,
    Path(permit_id): Path<Uuid>,
    Query(params): Query<AccessQuery>,
) -> Result<Json<Vec<LotResponse>>, ApiError> {
    if fetch_permit(&state.pool, permit_id).await?.is_none() {
        return Err(ApiError::PermitNotFound);
    }

    let at = params.at.unwrap_or_else(|| Local::now().naive_local());
    let rules: Vec<(Uuid, AccessRule)> = get_access_rules(&state.pool, permit_id)
        .await?
        .iter()
        .map(|row| (row.lot_id, row.rule()))
        .collect();

    let accessible = accessible_lot_ids(&rules, at);
    if accessible.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let ids: Vec<Uuid> = accessible.into_iter().collect();
    let lots = get_lots_by_ids(&state.pool, &ids).await?;
    Ok(Json(lots.into_iter().map(LotResponse::from).collect()))
}
