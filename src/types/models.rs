use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{RequestStatus, ServerStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerRequest {
    pub id: i64,
    pub server_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Comma-separated free text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub owner_name: String,
    pub owner_discord: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Listing fields carried by a request, as submitted or as replaced by an edit.
#[derive(Debug, Clone, Default)]
pub struct RequestFields {
    pub server_name: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub logo_url: Option<String>,
    pub owner_name: String,
    pub owner_discord: String,
}

/// Replacement field values for a pending request.
#[derive(Debug, Clone, Default)]
pub struct RequestEdit {
    pub server_name: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub logo_url: Option<String>,
    pub owner_name: String,
    pub owner_discord: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub id: i64,
    pub server_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub status: ServerStatus,
    pub online: i64,
    pub registered: i64,
    pub votes: i64,
    pub added: DateTime<Utc>,
}

/// A server as shown on the leaderboard, with its owner's display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerListing {
    #[serde(flatten)]
    pub server: Server,
    pub owner: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub id: i64,
    pub username: String,
    pub discord_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub server_id: i64,
    pub ip: String,
    pub user_name: String,
    pub last_vote: DateTime<Utc>,
}

/// Result of materializing an approved request.
#[derive(Debug, Clone)]
pub struct Approval {
    pub request: ServerRequest,
    pub server_id: i64,
    pub owner: Owner,
}
