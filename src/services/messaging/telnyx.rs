use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{http_client, MessagingProvider, SentMessage};

const TELNYX_MESSAGES_URL: &str = "https://api.telnyx.com/v2/messages";

pub struct TelnyxSmsProvider {
    api_key: String,
    from_number: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct TelnyxResponse {
    data: TelnyxMessage,
}

#[derive(Deserialize)]
struct TelnyxMessage {
    id: String,
}

impl TelnyxSmsProvider {
    pub fn new(api_key: String, from_number: String) -> Self {
        Self {
            api_key,
            from_number,
            client: http_client(),
        }
    }
}

#[async_trait]
impl MessagingProvider for TelnyxSmsProvider {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<SentMessage> {
        let resp = self
            .client
            .post(TELNYX_MESSAGES_URL)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": self.from_number,
                "to": to,
                "text": body,
            }))
            .send()
            .await
            .context("failed to call Telnyx API")?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            anyhow::bail!("Telnyx API error ({status}): {detail}");
        }

        let parsed: TelnyxResponse = resp
            .json()
            .await
            .context("failed to parse Telnyx response")?;

        Ok(SentMessage { id: parsed.data.id })
    }
}
