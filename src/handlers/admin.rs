use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::errors::AppError;
use crate::models::{AppointmentPatch, BookingRecord, BookingRequest};
use crate::services::{booking, validation};
use crate::state::AppState;
use crate::store::StoreError;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if expected_token.is_empty() || token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

// GET /api/appointments
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let appointments = state.appointments.list().await?;
    Ok(Json(json!({
        "success": true,
        "count": appointments.len(),
        "appointments": appointments,
    })))
}

// POST /api/appointments
// Manual entry from the dashboard: validated like a site booking, no notifications.
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let request = json_body(payload)?;

    let details = validation::into_details(&request).map_err(AppError::Validation)?;
    let record = BookingRecord::new(&booking::generate_reference(), &details, Utc::now());
    let saved = state.appointments.append(record).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Appointment saved successfully",
            "appointment": saved,
        })),
    ))
}

// PATCH /api/appointments/:id
pub async fn update_appointment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<AppointmentPatch>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let patch = json_body(payload)?;

    let updated = state
        .appointments
        .update(&id, patch)
        .await
        .map_err(|e| match e {
            StoreError::NotFound(_) => AppError::NotFound("Appointment".to_string()),
            other => AppError::Persistence(other),
        })?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment updated successfully",
        "appointment": updated,
    })))
}

// DELETE /api/appointments/:id
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    if !state.appointments.remove(&id).await? {
        return Err(AppError::NotFound("Appointment".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Appointment deleted successfully",
    })))
}

// GET /api/sms/messages
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let messages = state.inbound.list().await?;
    let unread = messages.iter().filter(|m| !m.read).count();

    Ok(Json(json!({
        "success": true,
        "count": messages.len(),
        "unread": unread,
        "messages": messages,
    })))
}

// PUT /api/sms/messages/:id/read
pub async fn mark_message_read(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let found = state.inbound.mark_read(&id).await?;
    Ok(Json(json!({
        "success": found,
        "message": if found { "Message marked as read" } else { "Message not found" },
    })))
}

// DELETE /api/sms/messages/:id
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let removed = state.inbound.remove(&id).await?;
    Ok(Json(json!({
        "success": removed,
        "message": if removed { "Message deleted" } else { "Message not found" },
    })))
}
