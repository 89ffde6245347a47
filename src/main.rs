use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use glamorbybee::config::AppConfig;
use glamorbybee::routes;
use glamorbybee::services::booking;
use glamorbybee::services::email::smtp::SmtpMailer;
use glamorbybee::services::messaging;
use glamorbybee::state::AppState;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env.local wins over .env; neither overrides the real environment
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    if config.admin_token == "changeme" {
        tracing::warn!("ADMIN_TOKEN is not set, admin API is using the default token");
    }

    let mailer = SmtpMailer::new(&config.email)?;
    let sms = messaging::provider_from_config(&config.sms);

    let state = Arc::new(AppState::new(config.clone(), Box::new(mailer), sms));

    // Bookings answer 503 until the SMTP check passes.
    tokio::spawn({
        let state = Arc::clone(&state);
        async move {
            if let Err(e) = state.email.init().await {
                tracing::error!(error = %format!("{e:#}"), "email service unavailable, bookings will be refused");
            }
        }
    });

    let app = routes::app(Arc::clone(&state));

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(
        mode = ?config.response_mode,
        data_dir = %config.data_dir.display(),
        "starting server on {addr}"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let abandoned = booking::drain_background(&state, SHUTDOWN_GRACE).await;
    if abandoned == 0 {
        tracing::info!("background notifications drained");
    }
    state.email.close();
    tracing::info!("server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutting down gracefully");
}
