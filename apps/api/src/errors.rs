use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Publishing error: {0}")]
    Publish(String),

    #[error("Publishing is not configured")]
    PublishingDisabled,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Image(msg) => {
                tracing::error!("Image error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IMAGE_ERROR",
                    "An image generation error occurred".to_string(),
                )
            }
            AppError::Publish(msg) => {
                tracing::error!("Publishing error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PUBLISH_ERROR",
                    "A publishing error occurred".to_string(),
                )
            }
            AppError::PublishingDisabled => (
                StatusCode::SERVICE_UNAVAILABLE,
                "PUBLISHING_DISABLED",
                "No X access token is configured".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
