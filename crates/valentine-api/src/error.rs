use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use valentine_db::StorageError;
use valentine_types::api::ErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid slug or passcode")]
    Unauthorized,

    #[error("That link name is already taken")]
    Conflict,

    #[error("{0}")]
    Unprocessable(String),

    #[error("Storage is unavailable")]
    Unavailable,

    #[error("Internal Server Error")]
    Internal,
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict { .. } => ApiError::Conflict,
            StorageError::UnknownCreator(id) => ApiError::Unprocessable(format!("Creator {} does not exist", id)),
            StorageError::Unavailable(reason) => {
                error!("Storage unavailable: {}", reason);
                ApiError::Unavailable
            }
            other => {
                error!("Storage failure: {}", other);
                ApiError::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse { message: self.to_string() })).into_response()
    }
}
