//! Notification facts published on the event bus once persistence succeeded.

use chrono::{DateTime, Utc};
use phub_domain::booking::{BookingId, PaymentStatus};
use phub_domain::tracking::BookingStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingCreated {
    pub booking_id: BookingId,
    pub status: BookingStatus,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChanged {
    pub booking_id: BookingId,
    pub from: BookingStatus,
    pub status: BookingStatus,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentUpdated {
    pub booking_id: BookingId,
    pub payment_status: PaymentStatus,
    pub timestamp: DateTime<Utc>,
}
