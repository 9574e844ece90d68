//! HTML pages and static assets.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::auth::MaybeSession;
use crate::server::AppState;

pub const INDEX_PAGE: &str = "index.html";
pub const LIST_PAGE: &str = "list.html";
pub const SERVER_PAGE: &str = "server.html";
pub const ADMIN_PAGE: &str = "admin_requests.html";

pub fn page(static_dir: &Path, name: &str) -> ServeFile {
    ServeFile::new(static_dir.join(name))
}

/// Serves the moderation page to admins and sends everyone else home.
pub async fn admin_page(
    MaybeSession(session): MaybeSession,
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Response {
    let is_admin = session
        .as_ref()
        .is_some_and(|identity| state.admins.is_admin(&identity.discord_id));
    if !is_admin {
        return (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response();
    }

    match page(&state.static_dir, ADMIN_PAGE).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
