use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde_json::json;

use super::session::SessionIdentity;
use crate::server::AppState;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "mossai_session";

/// The caller's session, if a valid one was presented
pub struct MaybeSession(pub Option<SessionIdentity>);

/// Extractor that requires a session belonging to a configured admin
pub struct RequireAdmin(pub SessionIdentity);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    Unauthenticated,
    Forbidden,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
        };

        let body = json!({ "data": null, "error": message });
        (status, Json(body)).into_response()
    }
}

/// Decodes the session cookie. Any decode failure counts as "no session".
pub(crate) fn session_from_parts(parts: &Parts, state: &AppState) -> Option<SessionIdentity> {
    let jar = CookieJar::from_headers(&parts.headers);
    let token = jar.get(SESSION_COOKIE)?.value();
    if token.is_empty() {
        return None;
    }

    match state.sessions.decode(token) {
        Ok(identity) => Some(identity),
        Err(e) => {
            tracing::debug!("Ignoring session cookie: {e}");
            None
        }
    }
}

impl FromRequestParts<Arc<AppState>> for MaybeSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(session_from_parts(parts, state)))
    }
}

impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts, state);
        let identity = state.admins.require_admin(session.as_ref())?;
        Ok(RequireAdmin(identity.clone()))
    }
}
