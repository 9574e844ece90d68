use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::Error;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            data: None,
            error: Some(message.into()),
        }
    }
}

/// API error that converts to a proper HTTP response
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.message))).into_response()
    }
}

/// Maps domain errors to client responses. Server-side failures are logged
/// here and reported with a generic message.
impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(message) => ApiError::bad_request(message),
            Error::CaptchaFailed => ApiError::bad_request("Captcha verification failed."),
            Error::NameRequired => ApiError::bad_request("name is required"),
            Error::NotFound => ApiError::not_found("server not found"),
            Error::NotFoundOrAlreadyProcessed | Error::NotFoundOrNotPending => {
                ApiError::not_found(err.to_string())
            }
            Error::TooSoon => {
                ApiError::too_many_requests("You can vote for this server again in 12 hours.")
            }
            Error::Database(_) | Error::Upstream(_) | Error::Config(_) => {
                tracing::error!("Request failed: {err}");
                ApiError::internal("internal error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_error_mapping() {
        let cases = [
            (Error::Validation("bad".to_string()), StatusCode::BAD_REQUEST, "bad"),
            (Error::CaptchaFailed, StatusCode::BAD_REQUEST, "Captcha verification failed."),
            (Error::NameRequired, StatusCode::BAD_REQUEST, "name is required"),
            (
                Error::NotFoundOrAlreadyProcessed,
                StatusCode::NOT_FOUND,
                "request not found or already processed",
            ),
            (
                Error::NotFoundOrNotPending,
                StatusCode::NOT_FOUND,
                "request not found or not pending",
            ),
            (
                Error::TooSoon,
                StatusCode::TOO_MANY_REQUESTS,
                "You can vote for this server again in 12 hours.",
            ),
            (
                Error::Upstream("token endpoint said no".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error",
            ),
        ];

        for (err, status, message) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status, status);
            assert_eq!(api.message, message);
        }
    }

    #[test]
    fn test_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(json, json!({ "data": [1, 2], "error": null }));

        let json = serde_json::to_value(ApiResponse::<()>::error("nope")).unwrap();
        assert_eq!(json, json!({ "data": null, "error": "nope" }));
    }
}
