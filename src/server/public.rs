use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{Path, State, rejection::PathRejection},
    response::{IntoResponse, Redirect},
    routing::{get, post},
};

use crate::server::dto::{OkResponse, SubmitForm, VoteForm};
use crate::server::response::{ApiError, ApiResponse};
use crate::server::{AppState, ClientIp};

pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/leaderboard", get(leaderboard))
        .route("/server/{id}", get(get_server))
        .route("/server/{id}/vote", post(vote))
}

async fn leaderboard(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let servers = state.moderation().list_servers()?;
    Ok(Json(ApiResponse::success(servers)))
}

async fn get_server(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = server_id(id)?;
    let server = state.moderation().get_server(id)?;
    Ok(Json(ApiResponse::success(server)))
}

async fn vote(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    ClientIp(ip): ClientIp,
    Form(form): Form<VoteForm>,
) -> Result<impl IntoResponse, ApiError> {
    let id = server_id(id)?;
    state.moderation().vote(id, &ip, &form.name)?;
    Ok(Json(ApiResponse::success(OkResponse::new())))
}

/// A non-numeric id cannot name a server.
fn server_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::not_found("server not found"))
}

/// Handles `POST /list`. Mounted next to the `/list` page in the router.
pub(super) async fn submit(
    State(state): State<Arc<AppState>>,
    ip: ClientIp,
    Form(form): Form<SubmitForm>,
) -> Result<impl IntoResponse, ApiError> {
    let tos_accepted = form.tos_accepted();
    let captcha_token = form.captcha_token.clone();
    let remote_ip = ip.is_known().then_some(ip.0.as_str());

    state
        .moderation()
        .submit(form.into_fields(), tos_accepted, &captcha_token, remote_ip)
        .await?;

    Ok(Redirect::to("/list?submitted=1"))
}
