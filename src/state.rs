use tokio_util::task::TaskTracker;

use crate::config::AppConfig;
use crate::services::email::templates::TemplateCache;
use crate::services::email::{EmailService, MailTransport};
use crate::services::messaging::{MessagingProvider, SmsNotifier};
use crate::store::{AppointmentStore, InboundSmsStore, WebhookLog};

pub struct AppState {
    pub config: AppConfig,
    pub email: EmailService,
    pub sms: Option<SmsNotifier>,
    pub appointments: AppointmentStore,
    pub inbound: InboundSmsStore,
    pub webhook_log: WebhookLog,
    /// Background-mode booking pipelines, drained on shutdown.
    pub background: TaskTracker,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        mailer: Box<dyn MailTransport>,
        sms_provider: Option<Box<dyn MessagingProvider>>,
    ) -> Self {
        let data_dir = config.data_dir.clone();
        let admin_phone = Some(config.sms.admin_phone.clone());

        Self {
            email: EmailService::new(
                mailer,
                TemplateCache::new(config.templates_dir.clone()),
                config.email.admin_email.clone(),
            ),
            sms: sms_provider.map(|p| SmsNotifier::new(p, admin_phone)),
            appointments: AppointmentStore::new(data_dir.join("appointments.json")),
            inbound: InboundSmsStore::new(data_dir.join("inbound_sms.json")),
            webhook_log: WebhookLog::new(data_dir.join("webhook_log.json")),
            background: TaskTracker::new(),
            config,
        }
    }
}
