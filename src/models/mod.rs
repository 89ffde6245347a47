pub mod booking;
pub mod inbound;

pub use booking::{
    AppointmentPatch, BookingDetails, BookingRecord, BookingRequest, BookingStatus, Location,
    NotificationResult,
};
pub use inbound::{InboundSms, TelnyxWebhook, WebhookLogEntry};
