//! Listing request workflow and vote acceptance.
//!
//! [`Moderation`] sits between the HTTP handlers and the [`Store`]: it
//! normalizes and validates input, applies the request lifecycle, and fires
//! admin notifications once a change is committed.

mod validate;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use tracing::info;

pub use validate::MAX_DESCRIPTION_LENGTH;

use crate::captcha::CaptchaVerifier;
use crate::error::{Error, Result};
use crate::notify::Notifier;
use crate::store::Store;
use crate::types::{RequestEdit, RequestFields, RequestStatus, ServerListing, ServerRequest, Vote};

/// Window in which a second vote from the same address is refused.
pub const VOTE_COOLDOWN_HOURS: i64 = 12;

pub struct Moderation<'a> {
    store: &'a dyn Store,
    notifier: &'a Notifier,
    captcha: &'a CaptchaVerifier,
}

impl<'a> Moderation<'a> {
    pub fn new(store: &'a dyn Store, notifier: &'a Notifier, captcha: &'a CaptchaVerifier) -> Self {
        Self {
            store,
            notifier,
            captcha,
        }
    }

    /// Queues a public listing request. Returns the new request id.
    pub async fn submit(
        &self,
        fields: RequestFields,
        tos_accepted: bool,
        captcha_token: &str,
        remote_ip: Option<&str>,
    ) -> Result<i64> {
        let fields = validate::normalize(fields);
        validate::listing(&fields)?;

        if !tos_accepted {
            return Err(Error::Validation(
                "You must accept the Terms of Service to submit.".to_string(),
            ));
        }

        if !self.captcha.verify(captcha_token, remote_ip).await {
            return Err(Error::CaptchaFailed);
        }

        let created_at = Utc::now().trunc_subsecs(0);
        let id = self.store.create_request(&fields, created_at)?;
        info!("Queued listing request {id} for '{}'", fields.server_name);

        self.notifier
            .request_submitted(&pending_request(id, fields, created_at));

        Ok(id)
    }

    /// Replaces the fields of a pending request.
    pub fn edit(&self, id: i64, edit: RequestEdit) -> Result<()> {
        let fields = validate::normalize(RequestFields {
            server_name: edit.server_name,
            url: edit.url,
            description: edit.description,
            tags: validate::join_tags(&edit.tags),
            logo_url: edit.logo_url,
            owner_name: edit.owner_name,
            owner_discord: edit.owner_discord,
        });
        validate::listing(&fields)?;

        self.store.update_pending_request(id, &fields)?;
        info!("Edited listing request {id}");
        Ok(())
    }

    /// Publishes a pending request as a server. Returns the new server id.
    pub fn approve(&self, id: i64) -> Result<i64> {
        let approval = self.store.approve_request(id, Utc::now())?;
        info!(
            "Approved listing request {id} as server {} owned by '{}'",
            approval.server_id, approval.owner.username
        );

        self.notifier
            .request_approved(&approval.request, approval.server_id);
        Ok(approval.server_id)
    }

    pub fn reject(&self, id: i64) -> Result<()> {
        let request = self.store.reject_request(id)?;
        info!("Rejected listing request {id}");

        self.notifier.request_rejected(&request);
        Ok(())
    }

    /// Deletes a listed server. Its owner and vote rows are kept.
    pub fn remove_server(&self, id: i64) -> Result<()> {
        if !self.store.delete_server(id)? {
            return Err(Error::NotFound);
        }
        info!("Removed server {id}");
        Ok(())
    }

    pub fn list_pending(&self) -> Result<Vec<ServerRequest>> {
        self.store.list_pending_requests()
    }

    pub fn list_servers(&self) -> Result<Vec<ServerListing>> {
        self.store.list_servers()
    }

    pub fn get_server(&self, id: i64) -> Result<ServerListing> {
        self.store.get_server(id)?.ok_or(Error::NotFound)
    }

    pub fn vote(&self, server_id: i64, ip: &str, name: &str) -> Result<()> {
        self.vote_at(server_id, ip, name, Utc::now())
    }

    /// Counts a vote unless `ip` already voted for the server within the
    /// cooldown window ending at `now`.
    pub fn vote_at(&self, server_id: i64, ip: &str, name: &str, now: DateTime<Utc>) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::NameRequired);
        }

        let vote = Vote {
            server_id,
            ip: ip.to_string(),
            user_name: name.to_string(),
            last_vote: now,
        };
        self.store
            .record_vote(&vote, now - Duration::hours(VOTE_COOLDOWN_HOURS))
    }
}

fn pending_request(id: i64, fields: RequestFields, created_at: DateTime<Utc>) -> ServerRequest {
    ServerRequest {
        id,
        server_name: fields.server_name,
        url: fields.url,
        description: fields.description,
        tags: fields.tags,
        logo_url: fields.logo_url,
        owner_name: fields.owner_name,
        owner_discord: fields.owner_discord,
        status: RequestStatus::Pending,
        created_at,
    }
}
