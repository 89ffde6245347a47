pub mod admin;
pub mod booking;
pub mod health;
pub mod webhook;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

// OPTIONS on any API route; CORS headers are added by the router layer.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(serde_json::json!({"success": false, "error": "Method not allowed"})),
    )
        .into_response()
}

pub async fn api_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"success": false, "error": "API endpoint not found"})),
    )
        .into_response()
}
