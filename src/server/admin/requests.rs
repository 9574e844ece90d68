use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::IntoResponse,
};

use crate::auth::RequireAdmin;
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::{ApproveResponse, EditRequestBody, OkResponse};
use crate::server::response::{ApiError, ApiResponse};

pub async fn list_requests(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let requests = state.moderation().list_pending()?;
    Ok(Json(ApiResponse::success(requests)))
}

pub async fn update_request(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<EditRequestBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::from(Error::NotFoundOrNotPending))?;
    let Json(body) = body.map_err(|_| ApiError::bad_request("invalid json body"))?;

    state.moderation().edit(id, body.into())?;
    tracing::debug!("Request {id} edited by {}", admin.discord_id);

    Ok(Json(ApiResponse::success(OkResponse::new())))
}

pub async fn approve_request(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::from(Error::NotFoundOrAlreadyProcessed))?;
    let server_id = state.moderation().approve(id)?;
    tracing::debug!("Request {id} approved by {}", admin.discord_id);

    Ok(Json(ApiResponse::success(ApproveResponse {
        ok: true,
        server_id,
    })))
}

pub async fn reject_request(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::from(Error::NotFoundOrAlreadyProcessed))?;
    state.moderation().reject(id)?;
    tracing::debug!("Request {id} rejected by {}", admin.discord_id);

    Ok(Json(ApiResponse::success(OkResponse::new())))
}
