use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),

    #[error("webhook error: {0}")]
    Webhook(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "success": false, "errors": errors }),
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "success": false, "error": msg }),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({ "success": false, "error": "unauthorized" }),
            ),
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "success": false, "error": format!("{what} not found") }),
            ),
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                serde_json::json!({ "success": false, "error": msg }),
            ),
            AppError::Persistence(_) => {
                tracing::error!(error = %self, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "success": false, "error": "Internal server error" }),
                )
            }
            AppError::Provider(_) => {
                tracing::error!(error = %self, "booking failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({
                        "success": false,
                        "error": "Failed to process booking. Please try again later.",
                    }),
                )
            }
            AppError::Webhook(_) => {
                tracing::error!(error = %self, "webhook failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "success": false, "error": "Webhook processing failed" }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
