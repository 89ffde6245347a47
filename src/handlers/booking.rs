use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::BookingRequest;
use crate::services::booking::{self, SUCCESS_MESSAGE};
use crate::state::AppState;

#[derive(Serialize)]
pub struct BookingResponse {
    success: bool,
    message: &'static str,
    reference: String,
}

// POST /api/booking
pub async fn submit_booking(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<BookingResponse>, AppError> {
    let Json(request) = payload.map_err(|e| {
        tracing::warn!(error = %e, "rejected booking body");
        AppError::BadRequest("Request body must be a JSON booking form".to_string())
    })?;

    let result = booking::submit_booking(&state, &request).await?;

    Ok(Json(BookingResponse {
        success: result.success,
        message: SUCCESS_MESSAGE,
        reference: result.reference,
    }))
}
