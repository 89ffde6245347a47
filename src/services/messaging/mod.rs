pub mod plivo;
pub mod telnyx;
pub mod twilio;

use std::time::Duration;

use async_trait::async_trait;

use crate::config::{SmsConfig, SmsProviderKind};
use crate::models::BookingDetails;

pub(crate) const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub id: String,
}

#[async_trait]
pub trait MessagingProvider: Send + Sync {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<SentMessage>;
}

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Picks the provider named by `SMS_PROVIDER`. Returns `None` when SMS is
/// disabled or the chosen provider is missing credentials.
pub fn provider_from_config(config: &SmsConfig) -> Option<Box<dyn MessagingProvider>> {
    if !config.enabled {
        tracing::info!("SMS service disabled (SMS_ENABLED=false)");
        return None;
    }

    let provider: Box<dyn MessagingProvider> = match config.provider {
        SmsProviderKind::Telnyx => {
            if config.telnyx_api_key.is_empty() || config.telnyx_from_number.is_empty() {
                tracing::warn!("SMS service disabled: missing Telnyx credentials");
                return None;
            }
            Box::new(telnyx::TelnyxSmsProvider::new(
                config.telnyx_api_key.clone(),
                config.telnyx_from_number.clone(),
            ))
        }
        SmsProviderKind::Twilio => {
            if config.twilio_account_sid.is_empty()
                || config.twilio_auth_token.is_empty()
                || config.twilio_phone_number.is_empty()
            {
                tracing::warn!("SMS service disabled: missing Twilio credentials");
                return None;
            }
            Box::new(twilio::TwilioSmsProvider::new(
                config.twilio_account_sid.clone(),
                config.twilio_auth_token.clone(),
                config.twilio_phone_number.clone(),
            ))
        }
        SmsProviderKind::Plivo => {
            if config.plivo_auth_id.is_empty()
                || config.plivo_auth_token.is_empty()
                || config.plivo_from_number.is_empty()
            {
                tracing::warn!("SMS service disabled: missing Plivo credentials");
                return None;
            }
            Box::new(plivo::PlivoSmsProvider::new(
                config.plivo_auth_id.clone(),
                config.plivo_auth_token.clone(),
                config.plivo_from_number.clone(),
            ))
        }
    };

    tracing::info!(provider = ?config.provider, "SMS service initialized");
    Some(provider)
}

pub fn customer_message(details: &BookingDetails) -> String {
    format!(
        "Hi {}! Your GlamorByBee booking is confirmed for {} at {}. Service: {}. We'll see you soon!",
        details.name, details.date, details.time, details.service_name
    )
}

pub fn admin_message(details: &BookingDetails, reference: &str) -> String {
    format!(
        "NEW BOOKING {reference}: {} | {} | {} {} | {} | Phone: {}",
        details.name,
        details.service_name,
        details.date,
        details.time,
        details.location.label(),
        details.phone
    )
}

#[derive(Debug, Default)]
pub struct SmsSummary {
    pub sent: Vec<SentMessage>,
    pub failures: Vec<String>,
}

/// Best-effort booking SMS. Failures are collected and logged, never returned as errors.
pub struct SmsNotifier {
    provider: Box<dyn MessagingProvider>,
    admin_phone: Option<String>,
}

impl SmsNotifier {
    pub fn new(provider: Box<dyn MessagingProvider>, admin_phone: Option<String>) -> Self {
        Self {
            provider,
            admin_phone: admin_phone.filter(|p| !p.trim().is_empty()),
        }
    }

    pub async fn send_booking_sms(&self, details: &BookingDetails, reference: &str) -> SmsSummary {
        let customer_text = customer_message(details);
        let customer = self.provider.send_message(&details.phone, &customer_text);

        let admin = async {
            match &self.admin_phone {
                Some(phone) => {
                    let text = admin_message(details, reference);
                    Some(self.provider.send_message(phone, &text).await)
                }
                None => None,
            }
        };

        let (customer, admin) = tokio::join!(customer, admin);

        let mut summary = SmsSummary::default();
        for (who, result) in [("customer", Some(customer)), ("admin", admin)] {
            match result {
                Some(Ok(msg)) => {
                    tracing::info!(recipient = who, id = %msg.id, "booking SMS sent");
                    summary.sent.push(msg);
                }
                Some(Err(e)) => {
                    tracing::warn!(recipient = who, error = %e, "booking SMS failed (non-critical)");
                    summary.failures.push(format!("{who}: {e}"));
                }
                None => {}
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::models::Location;

    struct FakeProvider {
        sent: Arc<Mutex<Vec<String>>>,
        fail_to: Option<String>,
    }

    #[async_trait]
    impl MessagingProvider for FakeProvider {
        async fn send_message(&self, to: &str, _body: &str) -> anyhow::Result<SentMessage> {
            if self.fail_to.as_deref() == Some(to) {
                anyhow::bail!("carrier rejected");
            }
            self.sent.lock().unwrap().push(to.to_string());
            Ok(SentMessage {
                id: format!("msg-{to}"),
            })
        }
    }

    fn details() -> BookingDetails {
        BookingDetails {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            phone: "+15551112222".to_string(),
            service_name: "Soft Glam".to_string(),
            date: "2099-05-01".to_string(),
            time: "10:00".to_string(),
            location: Location::Studio,
            service_address: None,
            notes: None,
        }
    }

    fn notifier(admin: Option<&str>, fail_to: Option<&str>) -> (SmsNotifier, Arc<Mutex<Vec<String>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let provider = FakeProvider {
            sent: sent.clone(),
            fail_to: fail_to.map(str::to_string),
        };
        (SmsNotifier::new(Box::new(provider), admin.map(str::to_string)), sent)
    }

    #[tokio::test]
    async fn test_sends_to_customer_and_admin() {
        let (n, sent) = notifier(Some("+15559990000"), None);
        let summary = n.send_booking_sms(&details(), "GBB-1234").await;
        assert_eq!(summary.sent.len(), 2);
        assert!(summary.failures.is_empty());
        assert_eq!(sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_no_admin_phone_only_customer() {
        let (n, sent) = notifier(Some("  "), None);
        let summary = n.send_booking_sms(&details(), "GBB-1234").await;
        assert_eq!(summary.sent.len(), 1);
        assert_eq!(sent.lock().unwrap().as_slice(), ["+15551112222".to_string()]);
    }

    #[tokio::test]
    async fn test_failure_is_collected_not_raised() {
        let (n, _) = notifier(Some("+15559990000"), Some("+15551112222"));
        let summary = n.send_booking_sms(&details(), "GBB-1234").await;
        assert_eq!(summary.sent.len(), 1);
        assert_eq!(summary.failures.len(), 1);
        assert!(summary.failures[0].starts_with("customer"));
    }

    #[test]
    fn test_disabled_config_builds_no_provider() {
        let config = SmsConfig {
            enabled: false,
            provider: SmsProviderKind::Telnyx,
            admin_phone: String::new(),
            telnyx_api_key: "key".to_string(),
            telnyx_from_number: "+15550000000".to_string(),
            twilio_account_sid: String::new(),
            twilio_auth_token: String::new(),
            twilio_phone_number: String::new(),
            plivo_auth_id: String::new(),
            plivo_auth_token: String::new(),
            plivo_from_number: String::new(),
        };
        assert!(provider_from_config(&config).is_none());

        let missing_creds = SmsConfig {
            enabled: true,
            provider: SmsProviderKind::Plivo,
            ..config.clone()
        };
        assert!(provider_from_config(&missing_creds).is_none());

        let telnyx = SmsConfig {
            enabled: true,
            ..config
        };
        assert!(provider_from_config(&telnyx).is_some());
    }

    #[test]
    fn test_message_text() {
        let text = admin_message(&details(), "GBB-1234");
        assert!(text.contains("GBB-1234"));
        assert!(text.contains("Studio Visit"));
        assert!(customer_message(&details()).starts_with("Hi Jane!"));
    }
}
