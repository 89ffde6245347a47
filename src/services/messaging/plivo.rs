use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{http_client, MessagingProvider, SentMessage};

pub struct PlivoSmsProvider {
    auth_id: String,
    auth_token: String,
    from_number: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct PlivoResponse {
    #[serde(default)]
    message_uuid: Vec<String>,
}

impl PlivoSmsProvider {
    pub fn new(auth_id: String, auth_token: String, from_number: String) -> Self {
        Self {
            auth_id,
            auth_token,
            from_number,
            client: http_client(),
        }
    }
}

#[async_trait]
impl MessagingProvider for PlivoSmsProvider {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<SentMessage> {
        let url = format!("https://api.plivo.com/v1/Account/{}/Message/", self.auth_id);

        let parsed: PlivoResponse = self
            .client
            .post(&url)
            .basic_auth(&self.auth_id, Some(&self.auth_token))
            .json(&json!({
                "src": self.from_number,
                "dst": to,
                "text": body,
            }))
            .send()
            .await
            .context("failed to send Plivo SMS")?
            .error_for_status()
            .context("Plivo API returned error")?
            .json()
            .await
            .context("failed to parse Plivo response")?;

        let id = parsed
            .message_uuid
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("missing message_uuid in Plivo response"))?;

        Ok(SentMessage { id })
    }
}
