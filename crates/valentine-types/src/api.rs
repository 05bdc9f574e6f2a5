use serde::{Deserialize, Serialize};

// -- Confessions --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateConfessionRequest {
    pub sender_name: String,
    pub intent_option: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateStatusRequest {
    pub response: String,
}

// -- Creators --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateLinkRequest {
    pub display_name: String,
    pub slug: String,
    pub passcode: String,
}

/// What anyone holding the link may see about a creator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCreator {
    pub id: i64,
    pub display_name: String,
    pub slug: String,
}

// -- Messages --

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SendMessageRequest {
    pub creator_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub vibe: Option<String>,
    pub content: Option<String>,
    pub bouquet_id: Option<String>,
    pub note: Option<String>,
    pub sender_device: Option<String>,
    pub sender_location: Option<String>,
}

// -- Inbox --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub slug: String,
    pub passcode: String,
}

/// `creator` is the full record, generic over the storage type so this
/// crate stays independent of the database layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse<C> {
    pub success: bool,
    pub creator: C,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateInboxMessageRequest {
    pub slug: String,
    pub passcode: String,
    pub is_read: Option<bool>,
    pub is_archived: Option<bool>,
}

// -- Misc --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub storage: String,
}
