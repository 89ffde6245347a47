use std::env;
use std::path::PathBuf;

/// Whether `/api/booking` waits for notifications before answering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseMode {
    Sync,
    Background,
}

impl ResponseMode {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "background" => ResponseMode::Background,
            _ => ResponseMode::Sync,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub user: String,
    pub password: String,
    pub admin_email: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SmsProviderKind {
    Telnyx,
    Twilio,
    Plivo,
}

impl SmsProviderKind {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "twilio" => SmsProviderKind::Twilio,
            "plivo" => SmsProviderKind::Plivo,
            _ => SmsProviderKind::Telnyx,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SmsConfig {
    pub enabled: bool,
    pub provider: SmsProviderKind,
    pub admin_phone: String,
    pub telnyx_api_key: String,
    pub telnyx_from_number: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_phone_number: String,
    pub plivo_auth_id: String,
    pub plivo_auth_token: String,
    pub plivo_from_number: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub admin_token: String,
    pub data_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub persist_bookings: bool,
    pub response_mode: ResponseMode,
    pub telnyx_public_key: String,
    pub enforce_webhook_signature: bool,
    pub email: EmailConfig,
    pub sms: SmsConfig,
}

fn flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> Self {
        let email_user = env::var("EMAIL_USER").unwrap_or_default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            data_dir: env::var("DATA_DIR")
                .unwrap_or_else(|_| "json".to_string())
                .into(),
            templates_dir: env::var("TEMPLATES_DIR")
                .unwrap_or_else(|_| "templates".to_string())
                .into(),
            persist_bookings: flag("PERSIST_BOOKINGS", true),
            response_mode: ResponseMode::parse(
                &env::var("BOOKING_RESPONSE_MODE").unwrap_or_default(),
            ),
            telnyx_public_key: env::var("TELNYX_PUBLIC_KEY").unwrap_or_default(),
            enforce_webhook_signature: flag("TELNYX_ENFORCE_SIGNATURE", false),
            email: EmailConfig {
                host: env::var("EMAIL_HOST").unwrap_or_default(),
                port: env::var("EMAIL_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(465),
                secure: flag("EMAIL_SECURE", false),
                admin_email: env::var("ADMIN_EMAIL")
                    .ok()
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| email_user.clone()),
                user: email_user,
                password: env::var("EMAIL_PASSWORD").unwrap_or_default(),
            },
            sms: SmsConfig {
                enabled: flag("SMS_ENABLED", false),
                provider: SmsProviderKind::parse(&env::var("SMS_PROVIDER").unwrap_or_default()),
                admin_phone: env::var("ADMIN_PHONE").unwrap_or_default(),
                telnyx_api_key: env::var("TELNYX_API_KEY").unwrap_or_default(),
                telnyx_from_number: env::var("TELNYX_FROM_NUMBER").unwrap_or_default(),
                twilio_account_sid: env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
                twilio_auth_token: env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
                twilio_phone_number: env::var("TWILIO_PHONE_NUMBER").unwrap_or_default(),
                plivo_auth_id: env::var("PLIVO_AUTH_ID").unwrap_or_default(),
                plivo_auth_token: env::var("PLIVO_AUTH_TOKEN").unwrap_or_default(),
                plivo_from_number: env::var("PLIVO_FROM_NUMBER").unwrap_or_default(),
            },
        }
    }
}
