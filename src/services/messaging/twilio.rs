use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use super::{http_client, MessagingProvider, SentMessage};

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

pub struct TwilioSmsProvider {
    account_sid: String,
    auth_token: String,
    from_number: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct TwilioMessage {
    sid: String,
}

impl TwilioSmsProvider {
    pub fn new(account_sid: String, auth_token: String, from_number: String) -> Self {
        Self {
            account_sid,
            auth_token,
            from_number,
            client: http_client(),
        }
    }

    fn messages_url(&self) -> String {
        format!("{TWILIO_API_BASE}/Accounts/{}/Messages.json", self.account_sid)
    }
}

#[async_trait]
impl MessagingProvider for TwilioSmsProvider {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<SentMessage> {
        // Twilio only takes form-encoded message bodies.
        let resp = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", self.from_number.as_str()), ("Body", body)])
            .send()
            .await
            .context("failed to call Twilio API")?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            anyhow::bail!("Twilio API error ({status}): {detail}");
        }

        let message: TwilioMessage = resp
            .json()
            .await
            .context("failed to parse Twilio response")?;

        Ok(SentMessage { id: message.sid })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_url_includes_account() {
        let provider = TwilioSmsProvider::new(
            "AC123".to_string(),
            "token".to_string(),
            "+15550000000".to_string(),
        );
        assert_eq!(
            provider.messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }
}
