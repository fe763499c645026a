//! API errors and their JSON shape: `{"ok": false, "error": "..."}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use watt_core::error::ValidationError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("empty message")]
    EmptyMessage,

    #[error("no session '{0}'")]
    SessionNotFound(String),

    #[error("session '{0}' has stopped")]
    SessionClosed(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::EmptyMessage | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::SessionClosed(_) => StatusCode::GONE,
        };
        tracing::warn!(status = %status, error = %self, "API error");
        (status, Json(json!({"ok": false, "error": self.to_string()}))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
