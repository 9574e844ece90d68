use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use tracing::{error, info, warn};

use crate::auth::{MaybeSession, SESSION_COOKIE, SESSION_TTL_DAYS};
use crate::server::AppState;
use crate::server::dto::{CallbackParams, MeResponse};
use crate::server::response::{ApiError, ApiResponse};

/// Cookie holding the CSRF state between login and callback.
pub const OAUTH_STATE_COOKIE: &str = "mossai_oauth_state";

const OAUTH_STATE_MAX_AGE_SECS: i64 = 600;
const NOT_CONFIGURED: &str = "Discord login is not configured.";

pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/discord/login", get(login))
        .route("/auth/discord/callback", get(callback))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
}

fn cookie(
    state: &AppState,
    name: &'static str,
    value: String,
    max_age: time::Duration,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(state.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}

fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let oauth = state
        .oauth
        .as_ref()
        .ok_or_else(|| ApiError::internal(NOT_CONFIGURED))?;

    let (url, csrf_state) = oauth.authorize_url();
    let jar = jar.add(cookie(
        &state,
        OAUTH_STATE_COOKIE,
        csrf_state,
        time::Duration::seconds(OAUTH_STATE_MAX_AGE_SECS),
    ));

    Ok((jar, found(&url)))
}

async fn callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(err) = params.error.filter(|e| !e.is_empty()) {
        return Err(ApiError::bad_request(format!("Discord auth error: {err}")));
    }

    let (Some(code), Some(returned_state)) = (
        params.code.filter(|c| !c.is_empty()),
        params.state.filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::bad_request("Missing code or state."));
    };

    let stored_state = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    if stored_state.as_deref() != Some(returned_state.as_str()) {
        warn!("OAuth callback with mismatched state");
        return Err(ApiError::bad_request("Invalid state."));
    }
    let jar = jar.remove(removal(OAUTH_STATE_COOKIE));

    let oauth = state
        .oauth
        .as_ref()
        .ok_or_else(|| ApiError::internal(NOT_CONFIGURED))?;

    let identity = oauth.login(code).await.map_err(|e| {
        error!("Discord login failed: {e}");
        ApiError::internal("Failed to complete Discord login.")
    })?;

    let token = state.sessions.encode(&identity).map_err(|e| {
        error!("Failed to issue session: {e}");
        ApiError::internal("Internal error.")
    })?;

    info!("Discord user {} signed in", identity.discord_id);

    let jar = jar.add(cookie(
        &state,
        SESSION_COOKIE,
        token,
        time::Duration::days(SESSION_TTL_DAYS),
    ));

    Ok((jar, found("/")))
}

async fn me(
    State(state): State<Arc<AppState>>,
    MaybeSession(session): MaybeSession,
) -> impl IntoResponse {
    let body = match session {
        Some(identity) => {
            let is_admin = state.admins.is_admin(&identity.discord_id);
            MeResponse::signed_in(identity, is_admin)
        }
        None => MeResponse::anonymous(),
    };
    Json(ApiResponse::success(body))
}

async fn logout(jar: CookieJar) -> impl IntoResponse {
    (StatusCode::NO_CONTENT, jar.remove(removal(SESSION_COOKIE)))
}
