//! Admin notifications over a Discord webhook.
//!
//! Delivery is best effort: each message is sent from a spawned task, failures
//! are logged, and callers never wait on the webhook.

pub mod embed;

use tracing::{debug, warn};

use self::embed::{Embed, WebhookPayload};
use crate::config::WebhookConfig;
use crate::types::ServerRequest;

#[derive(Clone)]
pub struct Notifier {
    url: Option<String>,
    mention: Option<String>,
    env_label: String,
    base_url: String,
    client: reqwest::Client,
}

impl Notifier {
    pub fn new(config: &WebhookConfig, base_url: &str, client: reqwest::Client) -> Self {
        Self {
            url: config.url.clone(),
            mention: config.mention.clone(),
            env_label: config.env_label.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// A notifier that drops every message.
    pub fn disabled() -> Self {
        Self::new(
            &WebhookConfig::default(),
            crate::config::DEFAULT_BASE_URL,
            reqwest::Client::new(),
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    /// Public page of a listed server.
    pub fn server_url(&self, server_id: i64) -> String {
        format!("{}/servers/{server_id}", self.base_url)
    }

    pub fn request_submitted(&self, request: &ServerRequest) {
        self.dispatch(embed::new_request(request, &self.env_label));
    }

    pub fn request_approved(&self, request: &ServerRequest, server_id: i64) {
        let url = self.server_url(server_id);
        self.dispatch(embed::approved(request, server_id, &url, &self.env_label));
    }

    pub fn request_rejected(&self, request: &ServerRequest) {
        self.dispatch(embed::rejected(request, &self.env_label));
    }

    fn payload(&self, embed: Embed) -> WebhookPayload {
        WebhookPayload {
            content: self.mention.clone(),
            embeds: vec![embed],
        }
    }

    fn dispatch(&self, embed: Embed) {
        let Some(url) = self.url.clone() else {
            debug!("Admin webhook not configured, dropping '{}'", embed.title);
            return;
        };

        let payload = self.payload(embed);
        let client = self.client.clone();

        tokio::spawn(async move {
            match client.post(&url).json(&payload).send().await {
                Ok(response) if !response.status().is_success() => {
                    warn!("Admin webhook returned {}", response.status());
                }
                Ok(_) => {}
                Err(e) => warn!("Admin webhook post failed: {e}"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_url_uses_base() {
        let config = WebhookConfig::default();
        let notifier = Notifier::new(&config, "https://mossai.example/", reqwest::Client::new());
        assert_eq!(notifier.server_url(5), "https://mossai.example/servers/5");
    }

    #[test]
    fn test_mention_goes_into_content() {
        let config = WebhookConfig {
            url: Some("http://127.0.0.1:1/hook".to_string()),
            mention: Some("@here".to_string()),
            env_label: "test".to_string(),
        };
        let notifier = Notifier::new(&config, "http://localhost:8080", reqwest::Client::new());
        assert!(notifier.is_enabled());

        let payload = notifier.payload(embed::Embed {
            title: "t".to_string(),
            description: String::new(),
            url: None,
            color: 0,
            author: None,
            fields: Vec::new(),
            timestamp: String::new(),
            footer: embed::footer("test", "ctx"),
            thumbnail: None,
        });
        assert_eq!(payload.content.as_deref(), Some("@here"));
        assert_eq!(payload.embeds.len(), 1);
    }

    #[test]
    fn test_disabled_notifier_is_noop() {
        let notifier = Notifier::disabled();
        assert!(!notifier.is_enabled());
        // No runtime is needed because nothing is spawned.
        notifier.request_rejected(&crate::types::ServerRequest {
            id: 1,
            server_name: "Foo".to_string(),
            url: None,
            description: None,
            tags: None,
            logo_url: None,
            owner_name: "Bar".to_string(),
            owner_discord: "123".to_string(),
            status: crate::types::RequestStatus::Pending,
            created_at: chrono::Utc::now(),
        });
    }
}
