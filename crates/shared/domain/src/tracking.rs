use crate::booking::BookingId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fulfillment status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Picked,
    InTransit,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [Self; 7] = [
        Self::Pending,
        Self::Confirmed,
        Self::Picked,
        Self::InTransit,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Cancelled,
    ];

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Picked => "picked",
            Self::InTransit => "in-transit",
            Self::OutForDelivery => "out-for-delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == tag)
            .ok_or_else(|| format!("unknown booking status '{s}'"))
    }
}

/// One immutable record of a status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEntry {
    pub status: BookingStatus,
    pub location: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// Latest known status of a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub current_status: BookingStatus,
    pub location: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&TrackingEntry> for StatusSnapshot {
    fn from(entry: &TrackingEntry) -> Self {
        Self {
            current_status: entry.status,
            location: entry.location.clone(),
            description: entry.description.clone(),
            timestamp: entry.timestamp,
        }
    }
}

/// Full tracking history of a booking, oldest entry first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingView {
    pub booking_id: BookingId,
    pub current_status: BookingStatus,
    pub estimated_delivery: NaiveDate,
    pub history: Vec<TrackingEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tags_round_trip_through_from_str() {
        for status in BookingStatus::ALL {
            assert_eq!(status.as_str().parse::<BookingStatus>(), Ok(status));
        }
        assert_eq!("IN_TRANSIT".parse::<BookingStatus>(), Ok(BookingStatus::InTransit));
        assert!("lost".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&BookingStatus::OutForDelivery).unwrap();
        assert_eq!(json, "\"out-for-delivery\"");
    }

    #[test]
    fn only_delivered_and_cancelled_are_terminal() {
        let terminal: Vec<_> = BookingStatus::ALL.into_iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(terminal, vec![BookingStatus::Delivered, BookingStatus::Cancelled]);
    }
}
