//! Cloudflare Turnstile verification.

use serde::Deserialize;
use tracing::warn;

pub const TURNSTILE_VERIFY_URL: &str = "https://challenges.cloudflare.com/turnstile/v0/siteverify";

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    success: bool,
    #[serde(rename = "error-codes", default)]
    error_codes: Vec<String>,
}

#[derive(Clone)]
pub struct CaptchaVerifier {
    secret: Option<String>,
    endpoint: String,
    client: reqwest::Client,
}

impl CaptchaVerifier {
    pub fn new(secret: Option<String>, client: reqwest::Client) -> Self {
        Self {
            secret: secret.filter(|s| !s.trim().is_empty()),
            endpoint: TURNSTILE_VERIFY_URL.to_string(),
            client,
        }
    }

    /// A verifier that accepts every token.
    pub fn disabled() -> Self {
        Self::new(None, reqwest::Client::new())
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Returns whether the token passed the challenge.
    ///
    /// Without a configured secret every token passes. With one, an empty
    /// token and any transport or decode failure count as a failed challenge.
    pub async fn verify(&self, token: &str, remote_ip: Option<&str>) -> bool {
        let Some(secret) = &self.secret else {
            return true;
        };

        let token = token.trim();
        if token.is_empty() {
            return false;
        }

        let mut form = vec![("secret", secret.as_str()), ("response", token)];
        if let Some(ip) = remote_ip.filter(|ip| !ip.is_empty()) {
            form.push(("remoteip", ip));
        }

        let response = match self.client.post(&self.endpoint).form(&form).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Turnstile verify request failed: {e}");
                return false;
            }
        };

        match response.json::<VerifyResponse>().await {
            Ok(parsed) => {
                if !parsed.success {
                    warn!("Turnstile rejected token: {:?}", parsed.error_codes);
                }
                parsed.success
            }
            Err(e) => {
                warn!("Failed to decode Turnstile response: {e}");
                false
            }
        }
    }
}
