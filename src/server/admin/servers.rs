use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
    response::IntoResponse,
};

use crate::auth::RequireAdmin;
use crate::server::AppState;
use crate::server::dto::OkResponse;
use crate::server::response::{ApiError, ApiResponse};

pub async fn remove_server(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::not_found("server not found"))?;
    state.moderation().remove_server(id)?;
    tracing::debug!("Server {id} removed by {}", admin.discord_id);

    Ok(Json(ApiResponse::success(OkResponse::new())))
}
