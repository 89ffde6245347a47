use std::sync::Arc;

use axum::http::Method;
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, admin, booking, health, webhook};
use crate::state::AppState;

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

/// Every API route with CORS and request tracing. Shared by the server and the tests.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/booking",
            post(booking::submit_booking)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/health",
            get(health::health)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/sms-webhook",
            post(webhook::sms_webhook)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/appointments",
            get(admin::list_appointments)
                .post(admin::create_appointment)
                .options(handlers::preflight),
        )
        .route(
            "/api/appointments/:id",
            patch(admin::update_appointment)
                .delete(admin::delete_appointment)
                .options(handlers::preflight),
        )
        .route(
            "/api/sms/messages",
            get(admin::list_messages).options(handlers::preflight),
        )
        .route(
            "/api/sms/messages/:id",
            delete(admin::delete_message).options(handlers::preflight),
        )
        .route(
            "/api/sms/messages/:id/read",
            put(admin::mark_message_read).options(handlers::preflight),
        )
        .fallback(handlers::api_not_found)
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
