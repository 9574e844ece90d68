mod requests;
mod servers;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::server::AppState;

pub fn admin_router() -> Router<Arc<AppState>> {
    Router::new()
        // Request queue routes
        .route("/admin/requests/data", get(requests::list_requests))
        .route("/admin/requests/{id}/update", post(requests::update_request))
        .route("/admin/requests/{id}/approve", post(requests::approve_request))
        .route("/admin/requests/{id}/reject", post(requests::reject_request))
        // Server routes
        .route("/api/admin/servers/{id}/remove", post(servers::remove_server))
}
