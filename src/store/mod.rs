//! Flat JSON file storage.
//!
//! Every operation reads the whole file, mutates it in memory and writes the
//! whole file back. Writers inside this process are serialized by a mutex
//! owned by each store; separate processes sharing a file still race
//! (last write wins).

pub mod appointments;
pub mod inbound;

use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use appointments::AppointmentStore;
pub use inbound::{InboundSmsStore, WebhookLog, WEBHOOK_LOG_LIMIT};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid json in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("{0} not found")]
    NotFound(String),
}

/// Reads `path`, returning `T::default()` when the file does not exist or is blank.
pub(crate) async fn read_json<T>(path: &Path) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    let content = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.display().to_string(),
                source,
            })
        }
    };

    if content.trim().is_empty() {
        return Ok(T::default());
    }

    serde_json::from_str(&content).map_err(|source| StoreError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Writes pretty JSON through a sibling temp file and a rename.
pub(crate) async fn write_json<T>(path: &Path, value: &T) -> Result<(), StoreError>
where
    T: Serialize,
{
    let io_err = |source| StoreError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let body = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
        path: path.display().to_string(),
        source,
    })?;

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, body).await.map_err(io_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err)?;

    Ok(())
}
