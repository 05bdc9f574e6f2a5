use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use valentine_db::Creator;
use valentine_types::api::{CreateLinkRequest, PublicCreator};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;
use crate::validate;

/// Claim a slug and get a personal inbox link.
pub async fn create_link(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateLinkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = validate::creator(req)?;

    let creator = state.run(move |s| s.create_creator(&input)).await?;

    Ok((StatusCode::CREATED, Json(creator)))
}

/// Public lookup for the send page. Never exposes the passcode.
pub async fn get_creator(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let creator = state
        .run(move |s| s.get_creator_by_slug(&slug))
        .await?
        .ok_or(ApiError::NotFound("Creator"))?;

    Ok(Json(public(creator)))
}

pub(crate) fn public(creator: Creator) -> PublicCreator {
    PublicCreator {
        id: creator.id,
        display_name: creator.display_name,
        slug: creator.slug,
    }
}
