use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use valentine_types::api::SendMessageRequest;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;
use crate::validate;

/// Deliver a confession or bouquet to a creator's inbox.
pub async fn send_message(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = validate::message(req)?;

    let message = state.run(move |s| s.create_message(&input)).await?;

    Ok((StatusCode::CREATED, Json(message)))
}
