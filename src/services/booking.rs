use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;

use crate::config::ResponseMode;
use crate::errors::AppError;
use crate::models::{BookingDetails, BookingRecord, BookingRequest, NotificationResult};
use crate::services::validation;
use crate::state::AppState;

pub const SUCCESS_MESSAGE: &str =
    "Booking submitted successfully! Check your email for confirmation.";

/// `GBB-` + last three digits of the epoch millis + one random digit.
///
/// Two calls inside the same millisecond have a one in ten chance of colliding.
pub fn generate_reference() -> String {
    let millis = Utc::now().timestamp_millis().rem_euclid(1000);
    let digit: u8 = rand::rng().random_range(0..10);
    format!("GBB-{millis:03}{digit}")
}

/// Validates a booking and runs the notification pipeline.
///
/// In [`ResponseMode::Sync`] the pipeline finishes before this returns and an
/// email failure fails the booking. In [`ResponseMode::Background`] the
/// pipeline is spawned and the result only means "accepted".
pub async fn submit_booking(
    state: &Arc<AppState>,
    request: &BookingRequest,
) -> Result<NotificationResult, AppError> {
    let details = validation::into_details(request).map_err(AppError::Validation)?;

    if !state.email.is_ready() {
        return Err(AppError::ServiceUnavailable(
            "Email service is not ready. Please try again in a moment.".to_string(),
        ));
    }

    let reference = generate_reference();
    tracing::info!(
        reference = %reference,
        service = %details.service_name,
        location = details.location.as_str(),
        mode = ?state.config.response_mode,
        "booking accepted"
    );

    match state.config.response_mode {
        ResponseMode::Sync => dispatch(state, &details, &reference).await?,
        ResponseMode::Background => {
            let task_state = Arc::clone(state);
            let reference = reference.clone();
            state.background.spawn(async move {
                if let Err(e) = dispatch(&task_state, &details, &reference).await {
                    tracing::error!(error = %e, reference = %reference, "background booking processing failed");
                }
            });
        }
    }

    Ok(NotificationResult {
        success: true,
        reference,
        errors: None,
    })
}

/// Waits up to `timeout` for background pipelines to finish and returns how
/// many were still running when it gave up.
pub async fn drain_background(state: &AppState, timeout: Duration) -> usize {
    state.background.close();
    if tokio::time::timeout(timeout, state.background.wait()).await.is_ok() {
        return 0;
    }
    let abandoned = state.background.len();
    tracing::warn!(abandoned, "background booking notifications abandoned at shutdown");
    abandoned
}

/// Emails, then SMS, then persistence. Only the email step can fail the call.
pub async fn dispatch(
    state: &AppState,
    details: &BookingDetails,
    reference: &str,
) -> Result<(), AppError> {
    state
        .email
        .send_booking_emails(details, reference)
        .await
        .map_err(|e| AppError::Provider(format!("{e:#}")))?;

    if let Some(sms) = &state.sms {
        let summary = sms.send_booking_sms(details, reference).await;
        if !summary.failures.is_empty() {
            tracing::warn!(
                reference = %reference,
                failures = ?summary.failures,
                "some booking SMS were not delivered"
            );
        }
    }

    if state.config.persist_bookings {
        let record = BookingRecord::new(reference, details, Utc::now());
        if let Err(e) = state.appointments.append(record).await {
            tracing::error!(error = %e, reference = %reference, "failed to persist booking");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::*;

    #[test]
    fn test_reference_format() {
        let re = Regex::new(r"^GBB-\d{4}$").unwrap();
        for _ in 0..50 {
            let r = generate_reference();
            assert!(re.is_match(&r), "bad reference {r}");
        }
    }
}
