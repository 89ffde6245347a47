use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;
use serde::Serialize;

use crate::models::{BookingDetails, BookingRequest, Location};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

const MIN_PHONE_LEN: usize = 7;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

pub fn is_valid_phone(phone: &str) -> bool {
    phone.trim().chars().count() >= MIN_PHONE_LEN
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Checks every field against today's local date.
pub fn validate(req: &BookingRequest) -> ValidationReport {
    validate_on(req, Local::now().date_naive())
}

/// Collects every failing rule; at most one message per field.
pub fn validate_on(req: &BookingRequest, today: NaiveDate) -> ValidationReport {
    let mut errors = Vec::new();

    if blank(&req.name) {
        errors.push("Name is required".to_string());
    }

    if blank(&req.email) {
        errors.push("Email is required".to_string());
    } else if !is_valid_email(&req.email) {
        errors.push("Invalid email format".to_string());
    }

    if blank(&req.phone) {
        errors.push("Phone number is required".to_string());
    } else if !is_valid_phone(&req.phone) {
        errors.push("Invalid phone number".to_string());
    }

    if blank(&req.service_name) {
        errors.push("Service is required".to_string());
    }

    if blank(&req.date) {
        errors.push("Date is required".to_string());
    } else if let Ok(date) = NaiveDate::parse_from_str(req.date.trim(), "%Y-%m-%d") {
        if date < today {
            errors.push("Date cannot be in the past".to_string());
        }
    }

    if blank(&req.time) {
        errors.push("Time is required".to_string());
    }

    if blank(&req.location) {
        errors.push("Location/Visit type is required".to_string());
    } else {
        match Location::parse(&req.location) {
            None => errors.push("Invalid location: must be studio or home".to_string()),
            Some(Location::Home)
                if req.service_address.as_deref().map_or(true, blank) =>
            {
                errors.push("Service address is required for home visits".to_string());
            }
            Some(_) => {}
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

fn trimmed(opt: &Option<String>) -> Option<String> {
    opt.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Validates and converts a request into trimmed, typed details.
pub fn into_details(req: &BookingRequest) -> Result<BookingDetails, Vec<String>> {
    let report = validate(req);
    if !report.valid {
        return Err(report.errors);
    }

    // validate() guarantees the location parses
    let location = Location::parse(&req.location).unwrap_or_default();

    Ok(BookingDetails {
        name: req.name.trim().to_string(),
        email: req.email.trim().to_string(),
        phone: req.phone.trim().to_string(),
        service_name: req.service_name.trim().to_string(),
        date: req.date.trim().to_string(),
        time: req.time.trim().to_string(),
        location,
        service_address: match location {
            Location::Home => trimmed(&req.service_address),
            Location::Studio => None,
        },
        notes: trimmed(&req.notes),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn valid_request() -> BookingRequest {
        BookingRequest {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "555-123-4567".to_string(),
            service_name: "Bridal Glam".to_string(),
            date: "2025-06-15".to_string(),
            time: "14:00".to_string(),
            location: "studio".to_string(),
            service_address: None,
            notes: None,
        }
    }

    fn error_set(report: &ValidationReport) -> HashSet<&str> {
        report.errors.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_valid_request_passes() {
        let report = validate_on(&valid_request(), today());
        assert!(report.valid, "unexpected errors: {:?}", report.errors);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_empty_request_reports_every_field() {
        let report = validate_on(&BookingRequest::default(), today());
        assert!(!report.valid);

        let expected: HashSet<&str> = [
            "Name is required",
            "Email is required",
            "Phone number is required",
            "Service is required",
            "Date is required",
            "Time is required",
            "Location/Visit type is required",
        ]
        .into_iter()
        .collect();
        assert_eq!(error_set(&report), expected);
    }

    #[test]
    fn test_whitespace_only_counts_as_missing() {
        let req = BookingRequest {
            name: "   ".to_string(),
            ..valid_request()
        };
        let report = validate_on(&req, today());
        assert_eq!(report.errors, vec!["Name is required".to_string()]);
    }

    #[test]
    fn test_bad_email() {
        let req = BookingRequest {
            email: "not-an-email".to_string(),
            ..valid_request()
        };
        let report = validate_on(&req, today());
        assert_eq!(report.errors, vec!["Invalid email format".to_string()]);
    }

    #[test]
    fn test_short_email_passes() {
        let req = BookingRequest {
            email: "a@b.co".to_string(),
            ..valid_request()
        };
        assert!(validate_on(&req, today()).valid);
    }

    #[test]
    fn test_short_phone() {
        let req = BookingRequest {
            phone: " 12345 ".to_string(),
            ..valid_request()
        };
        let report = validate_on(&req, today());
        assert_eq!(report.errors, vec!["Invalid phone number".to_string()]);
    }

    #[test]
    fn test_home_without_address() {
        let req = BookingRequest {
            location: "home".to_string(),
            service_address: Some("".to_string()),
            ..valid_request()
        };
        let report = validate_on(&req, today());
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("address")));
    }

    #[test]
    fn test_home_with_address() {
        let req = BookingRequest {
            location: "home".to_string(),
            service_address: Some("12 Peach St, Atlanta".to_string()),
            ..valid_request()
        };
        assert!(validate_on(&req, today()).valid);
    }

    #[test]
    fn test_unknown_location() {
        let req = BookingRequest {
            location: "salon".to_string(),
            ..valid_request()
        };
        let report = validate_on(&req, today());
        assert_eq!(
            report.errors,
            vec!["Invalid location: must be studio or home".to_string()]
        );
    }

    #[test]
    fn test_past_date_rejected() {
        let req = BookingRequest {
            date: "2025-05-31".to_string(),
            ..valid_request()
        };
        let report = validate_on(&req, today());
        assert_eq!(report.errors, vec!["Date cannot be in the past".to_string()]);
    }

    #[test]
    fn test_today_and_free_text_dates_allowed() {
        let same_day = BookingRequest {
            date: "2025-06-01".to_string(),
            ..valid_request()
        };
        let free_text = BookingRequest {
            date: "next Friday".to_string(),
            ..valid_request()
        };
        assert!(validate_on(&same_day, today()).valid);
        assert!(validate_on(&free_text, today()).valid);
    }

    #[test]
    fn test_into_details_trims_and_drops_studio_address() {
        let req = BookingRequest {
            name: "  Jane Doe ".to_string(),
            date: "2999-01-01".to_string(),
            service_address: Some("ignored".to_string()),
            notes: Some("   ".to_string()),
            ..valid_request()
        };
        let details = into_details(&req).unwrap();
        assert_eq!(details.name, "Jane Doe");
        assert_eq!(details.location, Location::Studio);
        assert_eq!(details.service_address, None);
        assert_eq!(details.notes, None);
    }
}
