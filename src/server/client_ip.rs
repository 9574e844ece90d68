use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

use crate::server::AppState;

const UNKNOWN: &str = "unknown";

/// Address the request came from, used as the vote identity.
///
/// With `trust_proxy` the first `X-Forwarded-For` entry wins. Otherwise the
/// socket peer is used, or `"unknown"` when the server runs without
/// connect info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub fn is_known(&self) -> bool {
        self.0 != UNKNOWN
    }
}

impl FromRequestParts<Arc<AppState>> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(ClientIp(resolve(parts, state.trust_proxy)))
    }
}

fn resolve(parts: &Parts, trust_proxy: bool) -> String {
    if trust_proxy {
        if let Some(ip) = forwarded_for(&parts.headers) {
            return ip;
        }
    }

    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .map(str::trim)
        .find(|ip| !ip.is_empty())
        .map(str::to_string)
}
