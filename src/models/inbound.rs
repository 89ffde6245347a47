use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Telnyx messaging webhook envelope. Only the fields we act on are typed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TelnyxWebhook {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub data: Option<TelnyxEvent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TelnyxEvent {
    #[serde(rename = "type", alias = "event_type")]
    pub event_type: Option<String>,
    pub id: Option<String>,
    pub from: Option<PhoneRef>,
    pub to: Option<serde_json::Value>,
    pub text: Option<String>,
    pub status: Option<String>,
    pub received_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PhoneRef {
    pub phone_number: Option<String>,
}

impl TelnyxWebhook {
    pub fn event_type(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.event_type.as_deref())
            .or(self.event_type.as_deref())
    }

    pub fn message_id(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.id.as_deref())
    }

    pub fn from_number(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.from.as_ref())
            .and_then(|f| f.phone_number.as_deref())
    }

    /// `to` is an object on some events and an array of objects on others.
    pub fn to_number(&self) -> Option<&str> {
        let to = self.data.as_ref()?.to.as_ref()?;
        let entry = match to {
            serde_json::Value::Array(items) => items.first()?,
            other => other,
        };
        entry.get("phone_number")?.as_str()
    }
}

/// One entry of `inbound_sms.json`. The file is shared with the dashboard,
/// so every field tolerates absence and both key spellings load.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InboundSms {
    pub id: String,
    pub from: String,
    pub to: String,
    pub text: String,
    #[serde(rename = "receivedAt", alias = "received_at")]
    pub received_at: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    pub raw: serde_json::Value,
}

impl InboundSms {
    pub fn from_webhook(event: &TelnyxWebhook, raw: serde_json::Value, now: DateTime<Utc>) -> Self {
        let data = event.data.as_ref();
        Self {
            id: event.message_id().unwrap_or("unknown").to_string(),
            from: event.from_number().unwrap_or("unknown").to_string(),
            to: event.to_number().unwrap_or("unknown").to_string(),
            text: data.and_then(|d| d.text.clone()).unwrap_or_default(),
            received_at: data
                .and_then(|d| d.received_at.clone())
                .unwrap_or_else(|| now.to_rfc3339()),
            timestamp: now,
            read: false,
            raw,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WebhookLogEntry {
    pub timestamp: DateTime<Utc>,
    pub event: Option<String>,
    #[serde(rename = "messageId", alias = "message_id")]
    pub message_id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl WebhookLogEntry {
    pub fn from_webhook(event: &TelnyxWebhook, now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now,
            event: event.event_type().map(str::to_string),
            message_id: event.message_id().map(str::to_string),
            from: event.from_number().map(str::to_string),
            to: event.to_number().map(str::to_string),
        }
    }
}
