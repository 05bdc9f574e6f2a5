use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use valentine_types::api::{CreateConfessionRequest, UpdateStatusRequest};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;
use crate::validate;

pub async fn create_confession(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateConfessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = validate::confession(req)?;

    let confession = state.run(move |s| s.create_confession(&input)).await?;

    Ok((StatusCode::CREATED, Json(confession)))
}

pub async fn get_confession(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let confession = state
        .run(move |s| s.get_confession(&id))
        .await?
        .ok_or(ApiError::NotFound("Confession"))?;

    Ok(Json(confession))
}

/// The recipient's answer. Only `yes`, `no` and `maybe` get through.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate::response(&req.response)?;
    debug!("Confession {} answered via API", id);

    let confession = state
        .run(move |s| s.update_confession_status(&id, &req.response))
        .await?
        .ok_or(ApiError::NotFound("Confession"))?;

    Ok(Json(confession))
}
