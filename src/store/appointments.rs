use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{read_json, write_json, StoreError};
use crate::models::{AppointmentPatch, BookingRecord};

#[derive(Debug, Default, Serialize, Deserialize)]
struct AppointmentsFile {
    #[serde(default)]
    appointments: Vec<BookingRecord>,
}

/// `appointments.json`, shaped `{"appointments": [...]}`.
pub struct AppointmentStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl AppointmentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn list(&self) -> Result<Vec<BookingRecord>, StoreError> {
        let file: AppointmentsFile = read_json(&self.path).await?;
        Ok(file.appointments)
    }

    pub async fn get(&self, id: &str) -> Result<Option<BookingRecord>, StoreError> {
        Ok(self.list().await?.into_iter().find(|r| r.id == id))
    }

    pub async fn append(&self, record: BookingRecord) -> Result<BookingRecord, StoreError> {
        let _guard = self.lock.lock().await;
        let mut file: AppointmentsFile = read_json(&self.path).await?;
        file.appointments.push(record.clone());
        write_json(&self.path, &file).await?;

        tracing::info!(id = %record.id, "appointment saved");
        Ok(record)
    }

    pub async fn update(
        &self,
        id: &str,
        patch: AppointmentPatch,
    ) -> Result<BookingRecord, StoreError> {
        let _guard = self.lock.lock().await;
        let mut file: AppointmentsFile = read_json(&self.path).await?;

        let record = file
            .appointments
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("appointment {id}")))?;
        patch.apply(record, Utc::now());
        let updated = record.clone();

        write_json(&self.path, &file).await?;

        tracing::info!(id = %id, status = updated.status.as_str(), "appointment updated");
        Ok(updated)
    }

    /// Returns `false` when no record had that id.
    pub async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut file: AppointmentsFile = read_json(&self.path).await?;

        let before = file.appointments.len();
        file.appointments.retain(|r| r.id != id);
        if file.appointments.len() == before {
            return Ok(false);
        }

        write_json(&self.path, &file).await?;

        tracing::info!(id = %id, "appointment deleted");
        Ok(true)
    }
}
