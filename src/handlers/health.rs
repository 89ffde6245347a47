use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    message: String,
    sms: &'static str,
}

// GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let email = state.email.health_check().await;

    Json(HealthResponse {
        status: if email.healthy { "operational" } else { "error" },
        message: email.message,
        sms: if state.sms.is_some() { "enabled" } else { "disabled" },
    })
}
