//! Creator-facing inbox. Access is by slug plus the passcode chosen at
//! link creation, compared verbatim.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::warn;

use valentine_db::{Creator, Storage};
use valentine_types::api::{LoginRequest, LoginResponse, UpdateInboxMessageRequest};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let creator = state
        .run(move |s| authenticate(s, &req.slug, &req.passcode))
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(LoginResponse { success: true, creator }))
}

pub async fn list_messages(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let messages = state
        .run(move |s| match authenticate(s, &req.slug, &req.passcode)? {
            Some(creator) => s.get_messages_for_creator(creator.id).map(Some),
            None => Ok(None),
        })
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(messages))
}

/// Flip the read and/or archived flag on one message in the caller's inbox.
pub async fn update_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
    ApiJson(req): ApiJson<UpdateInboxMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.is_read.is_none() && req.is_archived.is_none() {
        return Err(ApiError::BadRequest("Nothing to update".into()));
    }

    let outcome = state
        .run(move |s| {
            let Some(creator) = authenticate(s, &req.slug, &req.passcode)? else {
                return Ok(Err(ApiError::Unauthorized));
            };

            let updated = s.update_message_flags(creator.id, message_id, req.is_read, req.is_archived)?;
            Ok(updated.ok_or(ApiError::NotFound("Message")))
        })
        .await?;

    Ok(Json(outcome?))
}

fn authenticate(storage: &dyn Storage, slug: &str, passcode: &str) -> valentine_db::Result<Option<Creator>> {
    let creator = storage.get_creator_by_slug(slug)?;
    match creator {
        Some(c) if c.passcode == passcode => Ok(Some(c)),
        Some(_) => {
            warn!("Wrong passcode for inbox '{}'", slug);
            Ok(None)
        }
        None => Ok(None),
    }
}
