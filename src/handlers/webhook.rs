use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{InboundSms, TelnyxWebhook, WebhookLogEntry};
use crate::services::signature::{self, SignatureCheck};
use crate::state::AppState;

#[derive(Serialize)]
pub struct WebhookResponse {
    success: bool,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    event: Option<String>,
    /// False whenever the payload was processed without a valid signature.
    signature_verified: bool,
}

fn signature_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("telnyx-signature-mac")
        .or_else(|| headers.get("x-telnyx-signature-mac"))
        .and_then(|v| v.to_str().ok())
}

// POST /api/sms-webhook
pub async fn sms_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, AppError> {
    let check = signature::verify(
        &state.config.telnyx_public_key,
        &body,
        signature_header(&headers),
    );

    if check != SignatureCheck::Verified {
        if state.config.enforce_webhook_signature {
            tracing::warn!(?check, "rejecting webhook without a valid signature");
            return Err(AppError::Unauthorized);
        }
        // Unverified payloads are still processed; the response says so.
        tracing::warn!(?check, "webhook signature not verified, processing anyway");
    }

    let raw: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::Webhook(format!("invalid JSON payload: {e}")))?;
    let event: TelnyxWebhook = serde_json::from_value(raw.clone())
        .map_err(|e| AppError::Webhook(format!("unexpected payload shape: {e}")))?;

    let event_type = event.event_type().unwrap_or("unknown").to_string();
    let message_id = event.message_id().map(str::to_string);
    let now = Utc::now();

    tracing::info!(
        event = %event_type,
        message_id = message_id.as_deref().unwrap_or(""),
        from = event.from_number().unwrap_or(""),
        "received Telnyx webhook"
    );

    if let Err(e) = state
        .webhook_log
        .record(WebhookLogEntry::from_webhook(&event, now))
        .await
    {
        tracing::error!(error = %e, "failed to log webhook activity");
    }

    let (message, event_field) = match event_type.as_str() {
        "message.received" => {
            let sms = InboundSms::from_webhook(&event, raw, now);
            if let Err(e) = state.inbound.append(sms).await {
                tracing::error!(error = %e, "failed to save inbound SMS");
            }
            ("Inbound SMS received", None)
        }
        "message.dlr" => {
            let status = event.data.as_ref().and_then(|d| d.status.as_deref());
            tracing::info!(status = status.unwrap_or(""), "delivery receipt");
            ("Delivery receipt recorded", None)
        }
        "message.sent" => ("Message sent", None),
        _ => {
            tracing::info!(event = %event_type, "unhandled webhook event type");
            ("Webhook received", Some(event_type.clone()))
        }
    };

    Ok(Json(WebhookResponse {
        success: true,
        message,
        message_id,
        event: event_field,
        signature_verified: check.is_verified(),
    }))
}
