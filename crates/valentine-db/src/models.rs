//! Records owned by the storage layer, and the validated inputs that create them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person with a vanity inbox reachable at their slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub id: i64,
    pub display_name: String,
    pub slug: String,
    /// Stored verbatim. Not a verified credential.
    pub passcode: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertCreator {
    pub display_name: String,
    pub slug: String,
    pub passcode: String,
}

/// An item delivered to a creator's inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub creator_id: i64,
    /// `confession` or `bouquet`.
    #[serde(rename = "type")]
    pub kind: String,
    pub vibe: Option<String>,
    pub content: Option<String>,
    pub bouquet_id: Option<String>,
    pub note: Option<String>,
    pub sender_device: Option<String>,
    pub sender_location: Option<String>,
    pub sender_timestamp: DateTime<Utc>,
    pub is_read: bool,
    pub is_archived: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertMessage {
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

/// An anonymous note addressed by a short shareable id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confession {
    pub id: String,
    pub sender_name: String,
    pub intent_option: String,
    pub message: String,
    /// Unset until the recipient answers.
    pub response: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertConfession {
    pub sender_name: String,
    pub intent_option: String,
    pub message: String,
}

impl Confession {
    pub(crate) fn new(id: String, input: &InsertConfession, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            sender_name: input.sender_name.clone(),
            intent_option: input.intent_option.clone(),
            message: input.message.clone(),
            response: None,
            created_at,
        }
    }
}
