use crate::v1::AppState;
use crate::v1::api_models::{ScheduleResponse, ScheduleUpload};
use crate::v1::db::queries::{
    QueryError, delete_schedule_by_user, find_building_id_by_name, get_classroom_by_location,
    get_schedule_by_user, get_schedule_events, insert_classroom, insert_schedule,
    insert_schedule_event,
};
use crate::v1::error::ApiError;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, response::IntoResponse};
use shared::schedule::{extract_building_name, normalize_events};
use sqlx::{Postgres, Transaction};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

pub async fn get_user_schedule(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let schedule = get_schedule_by_user(&state.pool, user_id)
        .await?
        .ok_or(ApiError::ScheduleNotFound)?;
    let events = get_schedule_events(&state.pool, schedule.id).await?;
    Ok(Json(ScheduleResponse::new(schedule, events)))
}

/// Replaces the user's schedule with the uploaded events.
///
/// Events arrive already parsed by the external calendar producer and are
/// normalized here. A location that cannot be matched to a building keeps
/// its event with an unresolved building; nothing in the upload fails for
/// that.
pub async fn put_user_schedule(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(upload): Json<ScheduleUpload>,
) -> Result<impl IntoResponse, ApiError> {
    let normalized = normalize_events(upload.events);

    let mut tx = state.pool.begin().await.map_err(QueryError::from)?;

    // Full replace: the cascade removes the previous schedule's events.
    delete_schedule_by_user(tx.as_mut(), user_id).await?;
    let schedule_id = insert_schedule(tx.as_mut(), user_id, upload.name.as_deref()).await?;

    // Classrooms repeat across events within one upload; resolve each
    // location string once.
    let mut classrooms: HashMap<String, Uuid> = HashMap::new();
    for event in &normalized {
        let classroom_id = match &event.location {
            Some(location) => Some(ensure_classroom(&mut tx, &mut classrooms, location).await?),
            None => None,
        };
        insert_schedule_event(tx.as_mut(), schedule_id, event, classroom_id).await?;
    }

    tx.commit().await.map_err(QueryError::from)?;

    let schedule = get_schedule_by_user(&state.pool, user_id)
        .await?
        .ok_or(ApiError::ScheduleNotFound)?;
    let events = get_schedule_events(&state.pool, schedule.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ScheduleResponse::new(schedule, events)),
    ))
}

pub async fn delete_user_schedule(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = delete_schedule_by_user(&state.pool, user_id).await?;
    if deleted == 0 {
        return Err(ApiError::ScheduleNotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the classroom for a location string, creating it if needed. A
/// location that does not match a known building still gets a classroom; the
/// miss is logged and the building reference stays null.
async fn ensure_classroom(
    tx: &mut Transaction<'_, Postgres>,
    classrooms: &mut HashMap<String, Uuid>,
    location: &str,
) -> Result<Uuid, QueryError> {
    if let Some(id) = classrooms.get(location) {
        return Ok(*id);
    }

    let id = match get_classroom_by_location(tx.as_mut(), location).await? {
        Some(classroom) => classroom.id,
        None => {
            let building_id = match extract_building_name(location) {
                Some(name) => {
                    let found = find_building_id_by_name(tx.as_mut(), name).await?;
                    if found.is_none() {
                        info!(building = name, location, "no building matches this location");
                    }
                    found
                }
                None => {
                    info!(location, "could not extract a building name from location");
                    None
                }
            };
            insert_classroom(tx.as_mut(), location, building_id).await?
        }
    };

    classrooms.insert(location.to_string(), id);
    Ok(id)
}
