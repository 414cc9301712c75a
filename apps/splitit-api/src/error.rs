//! Error types for the SplitIt API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use splitit_core::NormalizeError;
use splitit_recognizer::RecognizerError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No file part found in upload")]
    MissingFile,

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Job not found: {0}")]
    JobNotFound(Uuid),

    #[error(transparent)]
    Recognizer(#[from] RecognizerError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingFile | ApiError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            ApiError::JobNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Recognizer(RecognizerError::PollBudgetExhausted { .. }) => {
                StatusCode::GATEWAY_TIMEOUT
            }
            ApiError::Recognizer(e) => {
                tracing::error!("recognizer error: {}", e);
                StatusCode::BAD_GATEWAY
            }
            ApiError::Normalize(e) => {
                tracing::error!("normalization error: {}", e);
                StatusCode::BAD_GATEWAY
            }
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
