use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Booking form as posted by the site. Absent fields decode as empty so the
/// validator can report them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service_name: String,
    pub date: String,
    pub time: String,
    pub location: String,
    #[serde(rename = "serviceAddress", alias = "service_address")]
    pub service_address: Option<String>,
    #[serde(alias = "specialRequests")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    #[default]
    Studio,
    Home,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Studio => "studio",
            Location::Home => "home",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "studio" => Some(Location::Studio),
            "home" => Some(Location::Home),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Location::Studio => "Studio Visit",
            Location::Home => "Home Service",
        }
    }
}

/// A booking that passed validation. Strings are trimmed; blank optionals are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service_name: String,
    pub date: String,
    pub time: String,
    pub location: Location,
    pub service_address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

/// One entry of `appointments.json`. Keys this crate does not know about are
/// kept in `extra` so dashboard edits survive a rewrite.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BookingRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service_name: String,
    pub date: String,
    pub time: String,
    pub location: Location,
    pub service_address: Option<String>,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub total_amount: f64,
    pub deposit_paid: f64,
    pub balance_due: f64,
    pub payment_method: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BookingRecord {
    pub fn new(reference: &str, details: &BookingDetails, created_at: DateTime<Utc>) -> Self {
        Self {
            id: reference.to_string(),
            name: details.name.clone(),
            email: details.email.clone(),
            phone: details.phone.clone(),
            service_name: details.service_name.clone(),
            date: details.date.clone(),
            time: details.time.clone(),
            location: details.location,
            service_address: details.service_address.clone(),
            notes: details.notes.clone(),
            status: BookingStatus::Pending,
            created_at,
            updated_at: None,
            total_amount: 0.0,
            deposit_paid: 0.0,
            balance_due: 0.0,
            payment_method: String::new(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Partial update applied from the dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppointmentPatch {
    pub status: Option<BookingStatus>,
    pub total_amount: Option<f64>,
    pub deposit_paid: Option<f64>,
    pub balance_due: Option<f64>,
    pub payment_method: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub notes: Option<String>,
}

impl AppointmentPatch {
    pub fn apply(self, record: &mut BookingRecord, now: DateTime<Utc>) {
        let amounts_changed = self.total_amount.is_some() || self.deposit_paid.is_some();

        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(total) = self.total_amount {
            record.total_amount = total;
        }
        if let Some(deposit) = self.deposit_paid {
            record.deposit_paid = deposit;
        }
        match self.balance_due {
            Some(balance) => record.balance_due = balance,
            None if amounts_changed => {
                record.balance_due = record.total_amount - record.deposit_paid;
            }
            None => {}
        }
        if let Some(method) = self.payment_method {
            record.payment_method = method;
        }
        if let Some(date) = self.date {
            record.date = date;
        }
        if let Some(time) = self.time {
            record.time = time;
        }
        if let Some(notes) = self.notes {
            record.notes = Some(notes).filter(|n| !n.trim().is_empty());
        }
        record.updated_at = Some(now);
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NotificationResult {
    pub success: bool,
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> BookingDetails {
        BookingDetails {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "5551234567".to_string(),
            service_name: "Bridal Glam".to_string(),
            date: "2099-05-01".to_string(),
            time: "10:00".to_string(),
            location: Location::Home,
            service_address: Some("12 Peach St".to_string()),
            notes: None,
        }
    }

    #[test]
    fn test_request_accepts_site_field_names() {
        let json = r#"{"name":"Jane","serviceAddress":"12 Peach St","specialRequests":"lashes"}"#;
        let req: BookingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.name, "Jane");
        assert_eq!(req.service_address.as_deref(), Some("12 Peach St"));
        assert_eq!(req.notes.as_deref(), Some("lashes"));
        assert!(req.email.is_empty());
    }

    #[test]
    fn test_new_record_is_pending_with_zero_balance() {
        let record = BookingRecord::new("GBB-1234", &details(), Utc::now());
        assert_eq!(record.status, BookingStatus::Pending);
        assert_eq!(record.balance_due, 0.0);
        assert_eq!(record.location, Location::Home);
    }

    #[test]
    fn test_record_keeps_unknown_keys() {
        let json = r#"{"id":"GBB-0001","name":"Jane","status":"confirmed","customer_id":"C-7"}"#;
        let record: BookingRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, BookingStatus::Confirmed);
        assert_eq!(record.extra.get("customer_id").unwrap(), "C-7");

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["customer_id"], "C-7");
    }

    #[test]
    fn test_patch_recomputes_balance() {
        let mut record = BookingRecord::new("GBB-1234", &details(), Utc::now());
        AppointmentPatch {
            total_amount: Some(150.0),
            deposit_paid: Some(50.0),
            status: Some(BookingStatus::Confirmed),
            ..Default::default()
        }
        .apply(&mut record, Utc::now());

        assert_eq!(record.balance_due, 100.0);
        assert_eq!(record.status, BookingStatus::Confirmed);
        assert!(record.updated_at.is_some());
    }

    #[test]
    fn test_patch_explicit_balance_wins() {
        let mut record = BookingRecord::new("GBB-1234", &details(), Utc::now());
        AppointmentPatch {
            total_amount: Some(150.0),
            balance_due: Some(0.0),
            ..Default::default()
        }
        .apply(&mut record, Utc::now());

        assert_eq!(record.balance_due, 0.0);
    }
}
