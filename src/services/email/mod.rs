pub mod smtp;
pub mod templates;

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use async_trait::async_trait;
use chrono::{Datelike, Local};

use crate::models::BookingDetails;
use templates::{render, TemplateCache};

pub const CUSTOMER_TEMPLATE: &str = "customer-email";
pub const ADMIN_TEMPLATE: &str = "admin-email";

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Checks that the server accepts our connection and credentials.
    async fn verify(&self) -> anyhow::Result<()>;

    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub healthy: bool,
    pub message: String,
}

/// Booking confirmation mail. Unusable until [`EmailService::init`] succeeds.
pub struct EmailService {
    transport: Box<dyn MailTransport>,
    templates: TemplateCache,
    admin_email: String,
    ready: AtomicBool,
}

impl EmailService {
    pub fn new(transport: Box<dyn MailTransport>, templates: TemplateCache, admin_email: String) -> Self {
        Self {
            transport,
            templates,
            admin_email,
            ready: AtomicBool::new(false),
        }
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        self.transport
            .verify()
            .await
            .context("email transport verification failed")?;
        self.ready.store(true, Ordering::SeqCst);
        tracing::info!("email service initialized");
        Ok(())
    }

    pub fn close(&self) {
        if self.ready.swap(false, Ordering::SeqCst) {
            tracing::info!("email service closed");
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    pub async fn health_check(&self) -> HealthStatus {
        if !self.is_ready() {
            return HealthStatus {
                healthy: false,
                message: "Email service not initialized".to_string(),
            };
        }
        match self.transport.verify().await {
            Ok(()) => HealthStatus {
                healthy: true,
                message: "Email service is operational".to_string(),
            },
            Err(e) => HealthStatus {
                healthy: false,
                message: e.to_string(),
            },
        }
    }

    pub async fn customer_email(
        &self,
        details: &BookingDetails,
        reference: &str,
    ) -> anyhow::Result<OutgoingEmail> {
        let template = self.templates.get(CUSTOMER_TEMPLATE).await?;
        let vars = [
            ("name", details.name.clone()),
            ("email", details.email.clone()),
            ("service", details.service_name.clone()),
            ("date", details.date.clone()),
            ("time", details.time.clone()),
            ("visitType", details.location.label().to_string()),
            (
                "address",
                details.service_address.clone().unwrap_or_else(|| "N/A".to_string()),
            ),
            (
                "specialRequests",
                details.notes.clone().unwrap_or_else(|| "None".to_string()),
            ),
            ("reference", reference.to_string()),
            ("year", Local::now().year().to_string()),
        ];

        Ok(OutgoingEmail {
            to: details.email.clone(),
            reply_to: Some(self.admin_email.clone()).filter(|a| !a.is_empty()),
            subject: format!("Your Glam Session is Booked! - {}", details.service_name),
            html: render(&template, &vars),
        })
    }

    pub async fn admin_email(
        &self,
        details: &BookingDetails,
        reference: &str,
    ) -> anyhow::Result<OutgoingEmail> {
        let template = self.templates.get(ADMIN_TEMPLATE).await?;
        let now = Local::now();
        let vars = [
            ("name", details.name.clone()),
            ("email", details.email.clone()),
            ("phone", details.phone.clone()),
            ("service", details.service_name.clone()),
            ("date", details.date.clone()),
            ("time", details.time.clone()),
            ("visitType", details.location.label().to_string()),
            (
                "location",
                details
                    .service_address
                    .clone()
                    .unwrap_or_else(|| details.location.label().to_string()),
            ),
            (
                "specialRequests",
                details.notes.clone().unwrap_or_else(|| "None".to_string()),
            ),
            ("reference", reference.to_string()),
            ("submissionTime", now.format("%Y-%m-%d %H:%M:%S").to_string()),
            ("year", now.year().to_string()),
        ];

        Ok(OutgoingEmail {
            to: self.admin_email.clone(),
            reply_to: Some(details.email.clone()),
            subject: format!("New Booking: {} - {}", details.name, details.service_name),
            html: render(&template, &vars),
        })
    }

    async fn deliver(&self, email: anyhow::Result<OutgoingEmail>, kind: &str) -> anyhow::Result<()> {
        let email = email?;
        self.transport
            .send(&email)
            .await
            .with_context(|| format!("failed to send {kind} email"))?;
        tracing::info!(to = %email.to, kind, "email sent");
        Ok(())
    }

    /// Sends the customer confirmation and the admin notification concurrently.
    /// Fails if either one fails.
    pub async fn send_booking_emails(
        &self,
        details: &BookingDetails,
        reference: &str,
    ) -> anyhow::Result<()> {
        if !self.is_ready() {
            anyhow::bail!("email service not initialized");
        }

        let customer = async {
            let email = self.customer_email(details, reference).await;
            self.deliver(email, "customer").await
        };
        let admin = async {
            let email = self.admin_email(details, reference).await;
            self.deliver(email, "admin").await
        };

        tokio::try_join!(customer, admin)?;
        Ok(())
    }
}
