use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{MailTransport, OutgoingEmail};
use crate::config::EmailConfig;

const SENDER_NAME: &str = "GlamorByBee LLC";
const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

pub struct SmtpMailer {
    from: String,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpMailer {
    /// Builds the SMTP client. Missing host or credentials leave the mailer
    /// unconfigured; `verify` then reports why.
    pub fn new(config: &EmailConfig) -> anyhow::Result<Self> {
        if config.host.is_empty() || config.user.is_empty() || config.password.is_empty() {
            tracing::warn!(
                host = %config.host,
                user_set = !config.user.is_empty(),
                password_set = !config.password.is_empty(),
                "email credentials not configured"
            );
            return Ok(Self {
                from: config.user.clone(),
                transport: None,
            });
        }

        // Implicit TLS when EMAIL_SECURE=true (port 465), STARTTLS otherwise.
        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .with_context(|| format!("invalid SMTP host {}", config.host))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(config.user.clone(), config.password.clone()))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Ok(Self {
            from: config.user.clone(),
            transport: Some(transport),
        })
    }

    fn transport(&self) -> anyhow::Result<&AsyncSmtpTransport<Tokio1Executor>> {
        self.transport
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("email credentials not configured in environment variables"))
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn verify(&self) -> anyhow::Result<()> {
        let ok = self
            .transport()?
            .test_connection()
            .await
            .context("SMTP connection failed")?;
        anyhow::ensure!(ok, "SMTP server rejected the connection test");
        Ok(())
    }

    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()> {
        let transport = self.transport()?;

        let from: Mailbox = format!("{SENDER_NAME} <{}>", self.from)
            .parse()
            .context("invalid sender address")?;
        let to: Mailbox = email.to.parse().context("invalid recipient address")?;

        let mut builder = Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML);
        if let Some(reply_to) = &email.reply_to {
            builder = builder.reply_to(reply_to.parse().context("invalid reply-to address")?);
        }
        let message = builder
            .body(email.html.clone())
            .context("failed to build email")?;

        let response = transport
            .send(message)
            .await
            .context("SMTP send failed")?;
        tracing::debug!(code = %response.code(), "SMTP accepted message");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EmailConfig {
        EmailConfig {
            host: String::new(),
            port: 465,
            secure: true,
            user: String::new(),
            password: String::new(),
            admin_email: String::new(),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_mailer_fails_verify() {
        let mailer = SmtpMailer::new(&config()).unwrap();
        let err = mailer.verify().await.unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }

    #[tokio::test]
    async fn test_configured_mailer_builds() {
        let cfg = EmailConfig {
            host: "smtp.example.com".to_string(),
            user: "bookings@example.com".to_string(),
            password: "secret".to_string(),
            ..config()
        };
        let mailer = SmtpMailer::new(&cfg).unwrap();
        assert!(mailer.transport.is_some());
    }
}
