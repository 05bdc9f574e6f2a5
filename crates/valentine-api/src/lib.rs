pub mod confessions;
pub mod creators;
pub mod error;
pub mod extract;
pub mod inbox;
pub mod messages;
pub mod state;
pub mod validate;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, patch, post},
};

use valentine_types::api::HealthResponse;

pub use error::ApiError;
pub use extract::ApiJson;
pub use state::{AppState, AppStateInner};

/// Every `/api` route, bound to `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/confessions", post(confessions::create_confession))
        .route("/api/confessions/{id}", get(confessions::get_confession))
        .route("/api/confessions/{id}/status", patch(confessions::update_status))
        .route("/api/creators", post(creators::create_link))
        .route("/api/creators/{slug}", get(creators::get_creator))
        .route("/api/messages", post(messages::send_message))
        .route("/api/inbox/login", post(inbox::login))
        .route("/api/inbox/messages", post(inbox::list_messages))
        .route("/api/inbox/messages/{id}", patch(inbox::update_message))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        storage: state.storage.backend_name().into(),
    })
}
