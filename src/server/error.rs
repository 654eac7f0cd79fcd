//! JSON error responses for the API.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::actions::ActionError;
use crate::store::StoreError;

/// Errors returned by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Invalid(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Action(ActionError::Invalid { message }) => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            ApiError::Action(ActionError::AnalysisFailed { message, .. }) => {
                (StatusCode::BAD_GATEWAY, message.to_string())
            }
            ApiError::Store(StoreError::EmptyContent) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Store(e) => {
                tracing::error!("Store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to save documents".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Invalid(rejection.body_text())
    }
}
