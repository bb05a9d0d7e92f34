use crate::v1::db::queries::QueryError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::warn;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    #[serde(serialize_with = "serialize_status")]
    pub status_code: StatusCode,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("lot not found")]
    LotNotFound,
    #[error("permit not found")]
    PermitNotFound,
    #[error("classroom not found")]
    ClassroomNotFound,
    #[error("schedule not found")]
    ScheduleNotFound,
    #[error("classroom has no linked building")]
    UnresolvableOrigin,
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::LotNotFound
            | ApiError::PermitNotFound
            | ApiError::ClassroomNotFound
            | ApiError::ScheduleNotFound => {
                ErrorMessage::from((StatusCode::NOT_FOUND, self.to_string())).into_response()
            }
            ApiError::UnresolvableOrigin => ErrorMessage::from((
                StatusCode::UNPROCESSABLE_ENTITY,
                "classroom has no linked building, so no origin can be resolved",
            ))
            .into_response(),
            ApiError::Query(e) => {
                warn!(error = ?e, "query error");
                ErrorMessage::from((StatusCode::INTERNAL_SERVER_ERROR, "")).into_response()
            }
        }
    }
}

fn serialize_status<S>(value: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(value.as_u16())
}

impl From<(StatusCode, String)> for ErrorMessage {
    fn from((status_code, message): (StatusCode, String)) -> Self {
        Self {
            status_code,
            message,
        }
    }
}

impl From<(StatusCode, &str)> for ErrorMessage {
    fn from((status_code, message): (StatusCode, &str)) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }
}

impl IntoResponse for ErrorMessage {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}
