use crate::error::BookingError;
use chrono::{DateTime, NaiveDate, Utc};
use phub_domain::booking::{BookingId, ContactDetails, PaymentStatus};
use phub_domain::constants::INITIAL_TRACKING_DESCRIPTION;
use phub_domain::coupon::AppliedCoupon;
use phub_domain::money::Money;
use phub_domain::package::{PackageSpec, PaymentMethod};
use phub_domain::quote::QuoteBreakdown;
use phub_domain::tier::ServiceTier;
use phub_domain::tracking::{BookingStatus, StatusSnapshot, TrackingEntry, TrackingView};
use serde::{Deserialize, Serialize, Serializer};

use BookingStatus::{
    Cancelled, Confirmed, Delivered, InTransit, OutForDelivery, Pending, Picked,
};

/// Statuses reachable in one step from `from`.
///
/// The forward chain may not skip steps; `cancelled` is reachable from every
/// non-terminal status; terminal statuses have no successors.
#[must_use]
pub const fn next_statuses(from: BookingStatus) -> &'static [BookingStatus] {
    match from {
        Pending => &[Confirmed, Cancelled],
        Confirmed => &[Picked, Cancelled],
        Picked => &[InTransit, Cancelled],
        InTransit => &[OutForDelivery, Cancelled],
        OutForDelivery => &[Delivered, Cancelled],
        Delivered | Cancelled => &[],
    }
}

#[must_use]
pub fn can_transition(from: BookingStatus, to: BookingStatus) -> bool {
    next_statuses(from).contains(&to)
}

/// Payment statuses reachable from `from` through the payment mutation point.
#[must_use]
pub const fn next_payment_statuses(from: PaymentStatus) -> &'static [PaymentStatus] {
    match from {
        PaymentStatus::Pending | PaymentStatus::Failed => &[PaymentStatus::Paid, PaymentStatus::Failed],
        PaymentStatus::Paid => &[PaymentStatus::Refunded],
        PaymentStatus::Refunded => &[],
    }
}

/// What the customer asked to ship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentDetails {
    pub service_tier: ServiceTier,
    pub sender: ContactDetails,
    pub receiver: ContactDetails,
    pub package: PackageSpec,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_slot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Promotional code to redeem against the quote total.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

impl ShipmentDetails {
    /// Rejects blank contact fields.
    ///
    /// # Errors
    /// Returns [`BookingError::InvalidDetails`] naming the first blank field.
    pub fn validate(&self) -> Result<(), BookingError> {
        for (party, contact) in [("sender", &self.sender), ("receiver", &self.receiver)] {
            for (field, value) in
                [("name", &contact.name), ("phone", &contact.phone), ("address", &contact.address)]
            {
                if value.trim().is_empty() {
                    return Err(BookingError::InvalidDetails {
                        message: format!("{party} {field} is required").into(),
                        context: None,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Append-only, never empty sequence of tracking entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingHistory {
    first: TrackingEntry,
    rest: Vec<TrackingEntry>,
}

impl TrackingHistory {
    const fn new(first: TrackingEntry) -> Self {
        Self { first, rest: Vec::new() }
    }

    #[must_use]
    pub fn latest(&self) -> &TrackingEntry {
        self.rest.last().unwrap_or(&self.first)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackingEntry> {
        std::iter::once(&self.first).chain(&self.rest)
    }

    fn push(&mut self, entry: TrackingEntry) {
        self.rest.push(entry);
    }
}

impl Serialize for TrackingHistory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// A booking and its fulfillment state.
///
/// Status and history only change through [`Booking::transition`]; payment
/// status only through [`Booking::update_payment`]. Every mutation bumps
/// `version`, which persistence uses for compare-and-swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    booking_id: BookingId,
    #[serde(flatten)]
    details: ShipmentDetails,
    quote: QuoteBreakdown,
    coupon_discount: Money,
    estimated_delivery: NaiveDate,
    payment_status: PaymentStatus,
    #[serde(rename = "status")]
    current_status: BookingStatus,
    tracking_history: TrackingHistory,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Booking {
    /// A new booking in `pending` with a single "Booking created" entry.
    ///
    /// A redeemed coupon replaces the requested code with its normalized form.
    pub(crate) fn create_initial(
        booking_id: BookingId,
        mut details: ShipmentDetails,
        quote: QuoteBreakdown,
        coupon: Option<AppliedCoupon>,
        estimated_delivery: NaiveDate,
        location: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let first = TrackingEntry {
            status: Pending,
            location: location.into(),
            description: INITIAL_TRACKING_DESCRIPTION.to_owned(),
            timestamp: now,
        };
        let coupon_discount = match coupon {
            Some(applied) => {
                details.coupon_code = Some(applied.code);
                applied.discount
            },
            None => {
                details.coupon_code = None;
                Money::ZERO
            },
        };
        Self {
            booking_id,
            details,
            quote,
            coupon_discount,
            estimated_delivery,
            payment_status: PaymentStatus::Pending,
            current_status: Pending,
            tracking_history: TrackingHistory::new(first),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the booking to `to` and appends the matching tracking entry.
    ///
    /// The entry timestamp never goes backwards: a clock behind the last entry
    /// is clamped to that entry's timestamp.
    ///
    /// # Errors
    /// Returns [`BookingError::InvalidTransition`] if `to` is not reachable in
    /// one step. Nothing is modified in that case.
    pub fn transition(
        &mut self,
        to: BookingStatus,
        location: impl Into<String>,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<&TrackingEntry, BookingError> {
        let from = self.current_status;
        if !can_transition(from, to) {
            return Err(BookingError::InvalidTransition {
                message: format!("{from} -> {to} is not allowed").into(),
                context: Some(self.booking_id.to_string().into()),
            });
        }

        let timestamp = now.max(self.tracking_history.latest().timestamp);
        self.tracking_history.push(TrackingEntry {
            status: to,
            location: location.into(),
            description: description.into(),
            timestamp,
        });
        self.current_status = to;
        self.touch(timestamp);
        Ok(self.tracking_history.latest())
    }

    /// The single mutation point for payment status.
    ///
    /// # Errors
    /// Returns [`BookingError::InvalidPaymentUpdate`] unless `to` is allowed
    /// from the current payment status.
    pub fn update_payment(&mut self, to: PaymentStatus, now: DateTime<Utc>) -> Result<(), BookingError> {
        let from = self.payment_status;
        if !next_payment_statuses(from).contains(&to) {
            return Err(BookingError::InvalidPaymentUpdate {
                message: format!("payment {from} -> {to} is not allowed").into(),
                context: Some(self.booking_id.to_string().into()),
            });
        }
        self.payment_status = to;
        self.touch(now.max(self.updated_at));
        Ok(())
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.version += 1;
        self.updated_at = at;
    }

    #[must_use]
    pub const fn id(&self) -> &BookingId {
        &self.booking_id
    }

    #[must_use]
    pub const fn details(&self) -> &ShipmentDetails {
        &self.details
    }

    #[must_use]
    pub const fn quote(&self) -> &QuoteBreakdown {
        &self.quote
    }

    /// Coupon discount taken off the quote total; zero without a coupon.
    #[must_use]
    pub const fn coupon_discount(&self) -> Money {
        self.coupon_discount
    }

    /// What the customer pays: the quote total less any coupon discount.
    #[must_use]
    pub fn amount_due(&self) -> Money {
        self.quote.total_amount - self.coupon_discount
    }

    #[must_use]
    pub const fn estimated_delivery(&self) -> NaiveDate {
        self.estimated_delivery
    }

    #[must_use]
    pub const fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    #[must_use]
    pub const fn current_status(&self) -> BookingStatus {
        self.current_status
    }

    #[must_use]
    pub const fn tracking_history(&self) -> &TrackingHistory {
        &self.tracking_history
    }

    #[must_use]
    pub fn latest_entry(&self) -> &TrackingEntry {
        self.tracking_history.latest()
    }

    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    #[must_use]
    pub fn status_snapshot(&self) -> StatusSnapshot {
        StatusSnapshot::from(self.latest_entry())
    }

    #[must_use]
    pub fn tracking_view(&self) -> TrackingView {
        TrackingView {
            booking_id: self.booking_id.clone(),
            current_status: self.current_status,
            estimated_delivery: self.estimated_delivery,
            history: self.tracking_history.iter().cloned().collect(),
        }
    }
}
