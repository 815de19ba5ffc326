//! Booking slice: identifier issuance, the fulfillment state machine, the
//! persistence boundary and the service tying them to routing and pricing.
//!
//! ```text
//! pending ─▶ confirmed ─▶ picked ─▶ in-transit ─▶ out-for-delivery ─▶ delivered
//!    └──────────┴────────────┴──────────┴─────────────────┴──▶ cancelled
//! ```

mod error;
mod events;
mod issuer;
mod machine;
mod repository;
mod service;

pub use crate::error::{BookingError, BookingErrorExt};
pub use crate::events::{BookingCreated, PaymentUpdated, StatusChanged};
pub use crate::issuer::IdIssuer;
pub use crate::machine::{
    Booking, ShipmentDetails, TrackingHistory, can_transition, next_payment_statuses, next_statuses,
};
pub use crate::repository::{BookingRepository, InMemoryBookingRepository};
pub use crate::service::BookingService;

use phub_domain::config::BookingConfig;
use phub_event_bus::EventBus;
use phub_kernel::clock::Clock;
use phub_pricing::QuoteCalculator;
use phub_serviceability::{LocationCatalog, Resolver};
use std::sync::Arc;

/// Initialize the booking slice.
pub fn init<C: LocationCatalog, R: BookingRepository>(
    config: &BookingConfig,
    resolver: Resolver<C>,
    calculator: QuoteCalculator,
    repository: R,
    events: EventBus,
    clock: Arc<dyn Clock>,
) -> BookingService<C, R> {
    let issuer = IdIssuer::from_config(config, Arc::clone(&clock));
    tracing::info!(prefix = %config.id_prefix, retry_limit = config.id_retry_limit, "Booking slice initialized");
    BookingService::build(resolver, calculator, issuer, repository, events, clock, config.id_retry_limit)
}
