mod app;
mod server;

pub use app::{AppConfig, DEFAULT_BASE_URL, DiscordConfig, WebhookConfig};
pub use server::ServerConfig;
