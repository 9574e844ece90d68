//! Discord OAuth2 authorization-code login.
//!
//! The callback exchanges the code for an access token, fetches the user's
//! identity with it, and turns that identity into a [`SessionIdentity`].
//! Every upstream failure is a hard failure of the login.

use chrono::{Duration, Utc};
use oauth2::basic::BasicClient;
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet,
    EndpointSet, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use rand::Rng;
use serde::Deserialize;

use super::session::{SESSION_TTL_DAYS, SessionIdentity};
use crate::config::DiscordConfig;
use crate::error::{Error, Result};

const STATE_BYTES: usize = 16;
const AVATAR_CDN: &str = "https://cdn.discordapp.com/avatars";

/// OAuth2 client with the authorize and token endpoints set.
type DiscordClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// The subset of Discord's `/users/@me` response we use.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl DiscordUser {
    /// Builds the session identity for this user, expiring `SESSION_TTL_DAYS` from now.
    pub fn into_identity(self) -> SessionIdentity {
        let username = match self.global_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.username,
        };
        let avatar_url = self
            .avatar
            .filter(|hash| !hash.is_empty())
            .map(|hash| format!("{AVATAR_CDN}/{}/{hash}.png", self.id));

        SessionIdentity {
            discord_id: self.id,
            username,
            avatar_url,
            expires_at: Some(Utc::now() + Duration::days(SESSION_TTL_DAYS)),
        }
    }
}

pub struct DiscordOAuth {
    client: DiscordClient,
    http: reqwest::Client,
    user_url: String,
    scopes: Vec<String>,
}

impl DiscordOAuth {
    /// `http` must not follow redirects.
    pub fn new(config: &DiscordConfig, http: reqwest::Client) -> Result<Self> {
        let api_base = config.api_base.trim_end_matches('/');

        let auth_url = AuthUrl::new(format!("{api_base}/oauth2/authorize"))
            .map_err(|e| Error::Config(format!("invalid Discord authorize URL: {e}")))?;
        let token_url = TokenUrl::new(format!("{api_base}/oauth2/token"))
            .map_err(|e| Error::Config(format!("invalid Discord token URL: {e}")))?;
        let redirect_url = RedirectUrl::new(config.redirect_uri.clone())
            .map_err(|e| Error::Config(format!("invalid DISCORD_REDIRECT_URI: {e}")))?;

        let client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_client_secret(ClientSecret::new(config.client_secret.clone()))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url)
            .set_redirect_uri(redirect_url)
            .set_auth_type(AuthType::RequestBody);

        Ok(Self {
            client,
            http,
            user_url: format!("{api_base}/users/@me"),
            scopes: config.scopes.clone(),
        })
    }

    /// Returns the provider authorize URL and the CSRF state it embeds.
    pub fn authorize_url(&self) -> (String, String) {
        let mut request = self
            .client
            .authorize_url(|| CsrfToken::new(generate_state()));
        for scope in &self.scopes {
            request = request.add_scope(Scope::new(scope.clone()));
        }
        let (url, state) = request.url();
        (url.to_string(), state.secret().clone())
    }

    /// Exchanges an authorization code and resolves the Discord identity.
    pub async fn login(&self, code: String) -> Result<SessionIdentity> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .request_async(&self.http)
            .await
            .map_err(|e| Error::Upstream(format!("token exchange failed: {e}")))?;

        let access_token = token.access_token().secret();
        if access_token.is_empty() {
            return Err(Error::Upstream("empty access token".to_string()));
        }

        let user = self.fetch_user(access_token).await?;
        if user.id.is_empty() {
            return Err(Error::Upstream("Discord user without id".to_string()));
        }

        Ok(user.into_identity())
    }

    async fn fetch_user(&self, access_token: &str) -> Result<DiscordUser> {
        self.http
            .get(&self.user_url)
            .bearer_auth(access_token)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Error::Upstream(format!("user fetch failed: {e}")))?
            .json::<DiscordUser>()
            .await
            .map_err(|e| Error::Upstream(format!("failed to decode Discord user: {e}")))
    }
}

/// Random hex CSRF state for the authorize redirect.
fn generate_state() -> String {
    let mut bytes = [0u8; STATE_BYTES];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(bytes)
}
