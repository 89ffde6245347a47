use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use super::{read_json, write_json, StoreError};
use crate::models::{InboundSms, WebhookLogEntry};

pub const WEBHOOK_LOG_LIMIT: usize = 100;

/// `inbound_sms.json`, a bare array of received messages.
pub struct InboundSmsStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl InboundSmsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn list(&self) -> Result<Vec<InboundSms>, StoreError> {
        read_json(&self.path).await
    }

    pub async fn unread_count(&self) -> Result<usize, StoreError> {
        Ok(self.list().await?.iter().filter(|m| !m.read).count())
    }

    pub async fn append(&self, message: InboundSms) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut messages: Vec<InboundSms> = read_json(&self.path).await?;
        let id = message.id.clone();
        messages.push(message);
        write_json(&self.path, &messages).await?;

        tracing::info!(id = %id, "inbound SMS saved");
        Ok(())
    }

    pub async fn mark_read(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut messages: Vec<InboundSms> = read_json(&self.path).await?;

        let Some(message) = messages.iter_mut().find(|m| m.id == id) else {
            return Ok(false);
        };
        message.read = true;

        write_json(&self.path, &messages).await?;
        Ok(true)
    }

    pub async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut messages: Vec<InboundSms> = read_json(&self.path).await?;

        let before = messages.len();
        messages.retain(|m| m.id != id);
        if messages.len() == before {
            return Ok(false);
        }

        write_json(&self.path, &messages).await?;
        Ok(true)
    }
}

/// `webhook_log.json`, keeps only the most recent [`WEBHOOK_LOG_LIMIT`] events.
pub struct WebhookLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl WebhookLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub async fn entries(&self) -> Result<Vec<WebhookLogEntry>, StoreError> {
        read_json(&self.path).await
    }

    pub async fn record(&self, entry: WebhookLogEntry) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries: Vec<WebhookLogEntry> = read_json(&self.path).await?;
        entries.push(entry);
        if entries.len() > WEBHOOK_LOG_LIMIT {
            let excess = entries.len() - WEBHOOK_LOG_LIMIT;
            entries.drain(..excess);
        }
        write_json(&self.path, &entries).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn sms(id: &str) -> InboundSms {
        InboundSms {
            id: id.to_string(),
            from: "+15550001111".to_string(),
            to: "+15550002222".to_string(),
            text: "Can I move to 3pm?".to_string(),
            received_at: Utc::now().to_rfc3339(),
            timestamp: Utc::now(),
            read: false,
            raw: serde_json::Value::Null,
        }
    }

    #[tokio::test]
    async fn test_mark_read_and_unread_count() {
        let dir = tempfile::tempdir().unwrap();
        let store = InboundSmsStore::new(dir.path().join("inbound_sms.json"));
        store.append(sms("a")).await.unwrap();
        store.append(sms("b")).await.unwrap();

        assert_eq!(store.unread_count().await.unwrap(), 2);
        assert!(store.mark_read("a").await.unwrap());
        assert!(!store.mark_read("zzz").await.unwrap());
        assert_eq!(store.unread_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_remove_message() {
        let dir = tempfile::tempdir().unwrap();
        let store = InboundSmsStore::new(dir.path().join("inbound_sms.json"));
        store.append(sms("a")).await.unwrap();

        assert!(store.remove("a").await.unwrap());
        assert!(!store.remove("a").await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_log_truncates_to_limit() {
        let dir = tempfile::tempdir().unwrap();
        let log = WebhookLog::new(dir.path().join("webhook_log.json"));

        for i in 0..(WEBHOOK_LOG_LIMIT + 5) {
            log.record(WebhookLogEntry {
                timestamp: Utc::now(),
                event: Some("message.sent".to_string()),
                message_id: Some(format!("m{i}")),
                from: None,
                to: None,
            })
            .await
            .unwrap();
        }

        let entries = log.entries().await.unwrap();
        assert_eq!(entries.len(), WEBHOOK_LOG_LIMIT);
        assert_eq!(entries[0].message_id.as_deref(), Some("m5"));
    }
}
