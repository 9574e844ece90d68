//! Process configuration read from the environment.
//!
//! Everything is read once at startup by [`AppConfig::from_env`]; nothing
//! else in the crate touches the environment.

use crate::auth::{AdminList, DEV_SESSION_SECRET};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_DISCORD_API_BASE: &str = "https://discord.com/api";
pub const DEFAULT_ENV_LABEL: &str = "local";

#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub api_base: String,
}

/// Admin webhook settings. `url` unset disables notifications.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: Option<String>,
    pub mention: Option<String>,
    /// Deployment label shown in embed footers.
    pub env_label: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            mention: None,
            env_label: DEFAULT_ENV_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub session_secret: String,
    pub cookie_secure: bool,
    pub admins: AdminList,
    /// `None` when any of the client id, secret or redirect URI is missing.
    pub discord: Option<DiscordConfig>,
    pub turnstile_secret: Option<String>,
    pub webhook: WebhookConfig,
    /// Public URL without a trailing slash.
    pub base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            session_secret: DEV_SESSION_SECRET.to_string(),
            cookie_secure: false,
            admins: AdminList::default(),
            discord: None,
            turnstile_secret: None,
            webhook: WebhookConfig::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let first = |keys: &[&str]| keys.iter().find_map(|&key| get(key));

        let discord = match (
            get("DISCORD_CLIENT_ID"),
            get("DISCORD_CLIENT_SECRET"),
            get("DISCORD_REDIRECT_URI"),
        ) {
            (Some(client_id), Some(client_secret), Some(redirect_uri)) => Some(DiscordConfig {
                client_id,
                client_secret,
                redirect_uri,
                scopes: get("DISCORD_OAUTH_SCOPES")
                    .map(|s| s.split_whitespace().map(str::to_string).collect())
                    .unwrap_or_else(|| vec!["identify".to_string()]),
                api_base: get("DISCORD_API_BASE")
                    .unwrap_or_else(|| DEFAULT_DISCORD_API_BASE.to_string()),
            }),
            _ => None,
        };

        Self {
            session_secret: get("SESSION_SECRET")
                .unwrap_or_else(|| DEV_SESSION_SECRET.to_string()),
            cookie_secure: get("SESSION_COOKIE_SECURE")
                .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes")),
            admins: AdminList::parse(&get("MOSS_ADMIN_IDS").unwrap_or_default()),
            discord,
            turnstile_secret: get("TURNSTILE_SECRET"),
            webhook: WebhookConfig {
                url: get("DISCORD_ADMIN_WEBHOOK_URL"),
                mention: first(&["DISCORD_ADMIN_PING", "DISCORD_ADMIN_MENTION"]),
                env_label: first(&["MOSSAI_ENV", "APP_ENV", "ENV"])
                    .unwrap_or_else(|| DEFAULT_ENV_LABEL.to_string()),
            },
            base_url: first(&["MOSSAI_BASE_URL", "PUBLIC_BASE_URL"])
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}
