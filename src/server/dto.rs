use serde::{Deserialize, Serialize};

use crate::auth::SessionIdentity;
use crate::types::{RequestEdit, RequestFields};

/// Public listing submission form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmitForm {
    pub server_name: String,
    pub url: String,
    pub description: String,
    pub tags: String,
    pub owner_name: String,
    pub owner_discord: String,
    pub logo_url: String,
    pub tos_accept: String,
    #[serde(rename = "cf-turnstile-response")]
    pub captcha_token: String,
}

impl SubmitForm {
    pub fn tos_accepted(&self) -> bool {
        !self.tos_accept.trim().is_empty()
    }

    pub fn into_fields(self) -> RequestFields {
        RequestFields {
            server_name: self.server_name,
            url: Some(self.url),
            description: Some(self.description),
            tags: Some(self.tags),
            logo_url: Some(self.logo_url),
            owner_name: self.owner_name,
            owner_discord: self.owner_discord,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct VoteForm {
    #[serde(default)]
    pub name: String,
}

/// Admin edit of a pending request. Tags arrive as a list.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EditRequestBody {
    pub server_name: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub logo_url: Option<String>,
    pub owner_name: String,
    pub owner_discord: String,
}

impl From<EditRequestBody> for RequestEdit {
    fn from(body: EditRequestBody) -> Self {
        RequestEdit {
            server_name: body.server_name,
            url: body.url,
            description: body.description,
            tags: body.tags,
            logo_url: body.logo_url,
            owner_name: body.owner_name,
            owner_discord: body.owner_discord,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub const fn new() -> Self {
        Self { ok: true }
    }
}

#[derive(Debug, Serialize)]
pub struct ApproveResponse {
    pub ok: bool,
    pub server_id: i64,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

impl MeResponse {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            discord_id: None,
            username: None,
            avatar_url: None,
            is_admin: None,
        }
    }

    pub fn signed_in(identity: SessionIdentity, is_admin: bool) -> Self {
        Self {
            authenticated: true,
            discord_id: Some(identity.discord_id),
            username: Some(identity.username),
            avatar_url: identity.avatar_url,
            is_admin: Some(is_admin),
        }
    }
}
