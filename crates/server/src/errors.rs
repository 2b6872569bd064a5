use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use models::errors::ModelError;

/// Handler-level error taxonomy. Malformed ids and database failures both
/// surface through the generic 500 path; there is no structured 400/503
/// mapping for them (known gap, kept as-is).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized Access")]
    Unauthorized,
    #[error("Forbidden Access")]
    Forbidden,
    #[error("You have already registered")]
    DuplicateUser,
    #[error("invalid id: {0}")]
    InvalidId(#[from] mongodb::bson::oid::Error),
    #[error("{0}")]
    Internal(String),
}

impl From<ModelError> for ApiError {
    fn from(e: ModelError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"message": "Unauthorized Access"})),
            )
                .into_response(),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(serde_json::json!({"message": "Forbidden Access"})),
            )
                .into_response(),
            // Plain text body, matching the original registration flow.
            ApiError::DuplicateUser => {
                (StatusCode::BAD_REQUEST, "You have already registered").into_response()
            }
            ApiError::InvalidId(_) | ApiError::Internal(_) => {
                let msg = self.to_string();
                error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(serde_json::json!({"error": msg})))
                    .into_response()
            }
        }
    }
}
