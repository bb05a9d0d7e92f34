use shared::error::InitializationError;
use shared::mapbox::MatrixError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpdaterError {
    #[error(transparent)]
    Init(#[from] InitializationError),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}
