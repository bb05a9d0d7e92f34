mod api_models;
mod db;
mod error;
mod handlers;

use axum::{Router, routing::get};
use shared::mapbox::MatrixClient;
use sqlx::{Pool, Postgres};

use crate::v1::handlers::classrooms::{get_classroom, get_classroom_lots};
use crate::v1::handlers::lots::{get_lot, get_lot_history, get_lots, get_nearest_lots};
use crate::v1::handlers::permits::{get_permit, get_permit_lots, get_permits};
use crate::v1::handlers::schedules::{delete_user_schedule, get_user_schedule, put_user_schedule};

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool<Postgres>,
    pub matrix: MatrixClient,
}

pub fn router(pool: Pool<Postgres>, matrix: MatrixClient) -> Router {
    Router::new()
        .route("/lots", get(get_lots))
        .route("/lots/nearest", get(get_nearest_lots))
        .route("/lots/{lot_id}", get(get_lot))
        .route("/lots/{lot_id}/history", get(get_lot_history))
        .route("/permits", get(get_permits))
        .route("/permits/{permit_id}", get(get_permit))
        .route("/permits/{permit_id}/lots", get(get_permit_lots))
        .route("/classrooms/{classroom_id}", get(get_classroom))
        .route("/classrooms/{classroom_id}/lots", get(get_classroom_lots))
        .route(
            "/users/{user_id}/schedule",
            get(get_user_schedule)
                .put(put_user_schedule)
                .delete(delete_user_schedule),
        )
        .with_state(AppState { pool, matrix })
}
