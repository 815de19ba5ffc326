use crate::error::BookingError;
use crate::events::{BookingCreated, PaymentUpdated, StatusChanged};
use crate::issuer::IdIssuer;
use crate::machine::{Booking, ShipmentDetails};
use crate::repository::BookingRepository;
use chrono::{DateTime, Days, NaiveDate, Utc};
use fxhash::FxHashMap;
use parking_lot::Mutex;
use phub_domain::booking::{BookingId, PaymentStatus};
use phub_domain::constants::PAYMENT_CONFIRMED_DESCRIPTION;
use phub_domain::coupon::AppliedCoupon;
use phub_domain::quote::QuoteBreakdown;
use phub_domain::tracking::{BookingStatus, StatusSnapshot, TrackingView};
use phub_event_bus::{Event, EventBus};
use phub_kernel::clock::Clock;
use phub_kernel::validation::InputGuard;
use phub_pricing::QuoteCalculator;
use phub_serviceability::{LocationCatalog, Resolver};
use std::sync::Arc;
use tracing::{debug, info, warn};

const CANCELLED_DESCRIPTION: &str = "Booking cancelled";

/// Orchestrates booking creation and every later mutation.
///
/// Mutations of one booking run under a per-booking async lock and are
/// persisted with a version compare-and-swap, so the current status and the
/// last tracking entry always move together. Different bookings never share
/// a lock.
#[phub_derive::phub_slice]
pub struct BookingService<C: LocationCatalog, R: BookingRepository> {
    resolver: Resolver<C>,
    calculator: QuoteCalculator,
    issuer: IdIssuer,
    repository: R,
    events: EventBus,
    clock: Arc<dyn Clock>,
    locks: LockMap,
    retry_limit: u32,
}

impl<C: LocationCatalog, R: BookingRepository> BookingService<C, R> {
    pub fn build(
        resolver: Resolver<C>,
        calculator: QuoteCalculator,
        issuer: IdIssuer,
        repository: R,
        events: EventBus,
        clock: Arc<dyn Clock>,
        retry_limit: u32,
    ) -> Self {
        Self::new(BookingServiceInner {
            resolver,
            calculator,
            issuer,
            repository,
            events,
            clock,
            locks: Mutex::default(),
            retry_limit: retry_limit.max(1),
        })
    }

    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repository
    }

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Parses a free-text booking id against the configured prefix.
    ///
    /// # Errors
    /// Returns [`BookingError::Kernel`] wrapping a malformed-id error.
    pub fn parse_id(&self, raw: impl AsRef<str>) -> Result<BookingId, BookingError> {
        Ok(InputGuard::booking_id(raw, self.issuer.prefix())?)
    }

    /// Validates, routes, prices and stores a new booking in `pending`.
    ///
    /// Nothing is stored unless every step succeeds; a pricing failure aborts
    /// creation rather than booking at a zero price.
    ///
    /// # Errors
    /// * [`BookingError::InvalidDetails`] for blank contact fields.
    /// * [`BookingError::Serviceability`] when the route is rejected.
    /// * [`BookingError::Pricing`] for an invalid package or a coupon that
    ///   cannot be redeemed.
    /// * [`BookingError::IdAllocationExhausted`] when every candidate id collided.
    pub async fn create(&self, details: ShipmentDetails) -> Result<Booking, BookingError> {
        details.validate()?;
        let route = self.resolver.resolve(
            &details.sender.postal_code,
            &details.receiver.postal_code,
            &details.service_tier,
        )?;
        let quote = self.calculator.quote(
            &details.service_tier,
            &details.package,
            &route,
            details.payment_method,
        )?;

        let now = self.clock.now();
        let coupon = match details.coupon_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => {
                Some(self.calculator.redeem(code, quote.total_amount, now)?)
            },
            _ => None,
        };
        let estimated_delivery = add_transit_days(now.date_naive(), route.transit_days)?;
        let location = details.sender.address.trim().to_owned();

        let draft = Draft { details, quote, coupon, estimated_delivery };
        let booking = self.insert_with_retry(draft, &location, now).await?;
        info!(
            booking_id = %booking.id(),
            tier = %booking.details().service_tier,
            total = %booking.quote().total_amount,
            due = %booking.amount_due(),
            "Booking created"
        );
        self.notify(BookingCreated {
            booking_id: booking.id().clone(),
            status: booking.current_status(),
            timestamp: now,
        });
        Ok(booking)
    }

    /// Moves a booking one step along the fulfillment graph.
    ///
    /// # Errors
    /// * [`BookingError::NotFound`] for an unknown id.
    /// * [`BookingError::InvalidTransition`] when `to` is not reachable; the
    ///   stored booking is left as it was.
    pub async fn transition(
        &self,
        id: &BookingId,
        to: BookingStatus,
        location: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Booking, BookingError> {
        let (location, description) = (location.into(), description.into());
        let (booking, from) = self
            .mutate(id, "transition", move |booking, now| {
                let from = booking.current_status();
                booking.transition(to, location, description, now)?;
                Ok(from)
            })
            .await?;

        info!(booking_id = %id, %from, status = %to, "Booking status changed");
        self.notify(StatusChanged {
            booking_id: id.clone(),
            from,
            status: to,
            timestamp: booking.latest_entry().timestamp,
        });
        Ok(booking)
    }

    /// Cancels a booking that has not reached a terminal status.
    ///
    /// # Errors
    /// See [`BookingService::transition`].
    pub async fn cancel(
        &self,
        id: &BookingId,
        location: impl Into<String>,
        reason: Option<String>,
    ) -> Result<Booking, BookingError> {
        let description = reason.unwrap_or_else(|| CANCELLED_DESCRIPTION.to_owned());
        self.transition(id, BookingStatus::Cancelled, location, description).await
    }

    /// Records a payment outcome. Fulfillment status is not touched.
    ///
    /// # Errors
    /// * [`BookingError::NotFound`] for an unknown id.
    /// * [`BookingError::InvalidPaymentUpdate`] for a disallowed payment change.
    pub async fn update_payment(&self, id: &BookingId, to: PaymentStatus) -> Result<Booking, BookingError> {
        let (booking, ()) = self
            .mutate(id, "payment update", move |booking, now| booking.update_payment(to, now))
            .await?;

        info!(booking_id = %id, payment_status = %to, "Payment status updated");
        self.notify(PaymentUpdated {
            booking_id: id.clone(),
            payment_status: to,
            timestamp: booking.updated_at(),
        });
        Ok(booking)
    }

    /// Marks the booking paid and confirms it if it is still `pending`.
    ///
    /// Both changes are applied and stored together.
    ///
    /// # Errors
    /// See [`BookingService::update_payment`].
    pub async fn confirm_payment(
        &self,
        id: &BookingId,
        location: impl Into<String>,
    ) -> Result<Booking, BookingError> {
        let location = location.into();
        let (booking, confirmed) = self
            .mutate(id, "payment confirmation", move |booking, now| {
                booking.update_payment(PaymentStatus::Paid, now)?;
                if booking.current_status() != BookingStatus::Pending {
                    return Ok(false);
                }
                booking.transition(BookingStatus::Confirmed, location, PAYMENT_CONFIRMED_DESCRIPTION, now)?;
                Ok(true)
            })
            .await?;

        info!(booking_id = %id, confirmed, "Payment confirmed");
        self.notify(PaymentUpdated {
            booking_id: id.clone(),
            payment_status: PaymentStatus::Paid,
            timestamp: booking.updated_at(),
        });
        if confirmed {
            self.notify(StatusChanged {
                booking_id: id.clone(),
                from: BookingStatus::Pending,
                status: BookingStatus::Confirmed,
                timestamp: booking.latest_entry().timestamp,
            });
        }
        Ok(booking)
    }

    /// # Errors
    /// Returns [`BookingError::NotFound`] for an unknown id.
    pub async fn get(&self, id: &BookingId) -> Result<Booking, BookingError> {
        self.repository.load(id).await?.ok_or_else(|| not_found(id))
    }

    /// Full tracking history of a booking.
    ///
    /// # Errors
    /// Returns [`BookingError::NotFound`] for an unknown id.
    pub async fn tracking(&self, id: &BookingId) -> Result<TrackingView, BookingError> {
        Ok(self.get(id).await?.tracking_view())
    }

    /// Current status with the details of the entry that set it.
    ///
    /// # Errors
    /// Returns [`BookingError::NotFound`] for an unknown id.
    pub async fn latest_status(&self, id: &BookingId) -> Result<StatusSnapshot, BookingError> {
        Ok(self.get(id).await?.status_snapshot())
    }

    async fn insert_with_retry(
        &self,
        draft: Draft,
        location: &str,
        now: DateTime<Utc>,
    ) -> Result<Booking, BookingError> {
        for attempt in 1..=self.retry_limit {
            let booking = Booking::create_initial(
                self.issuer.issue(),
                draft.details.clone(),
                draft.quote.clone(),
                draft.coupon.clone(),
                draft.estimated_delivery,
                location,
                now,
            );
            match self.repository.save(booking.clone()).await {
                Ok(()) => return Ok(booking),
                Err(err @ BookingError::UniquenessConflict { .. }) => {
                    warn!(attempt, booking_id = %booking.id(), error = %err, "Booking id collision, retrying");
                },
                Err(err) => return Err(err),
            }
        }
        Err(BookingError::IdAllocationExhausted {
            message: format!("no free id after {} attempts", self.retry_limit).into(),
            context: None,
        })
    }

    async fn mutate<T, F>(&self, id: &BookingId, what: &'static str, apply: F) -> Result<(Booking, T), BookingError>
    where
        F: FnOnce(&mut Booking, DateTime<Utc>) -> Result<T, BookingError> + Send,
    {
        let lease = LockLease::acquire(&self.locks, id);
        let _guard = lease.lock().lock().await;
        self.apply_locked(id, what, apply).await
    }

    async fn apply_locked<T, F>(&self, id: &BookingId, what: &'static str, apply: F) -> Result<(Booking, T), BookingError>
    where
        F: FnOnce(&mut Booking, DateTime<Utc>) -> Result<T, BookingError> + Send,
    {
        let mut booking = self.get(id).await?;
        let expected = booking.version();
        let outcome = apply(&mut booking, self.clock.now()).inspect_err(|err| {
            debug!(booking_id = %id, operation = what, error = %err, "Booking update rejected");
        })?;
        self.repository.update(booking.clone(), expected).await?;
        Ok((booking, outcome))
    }

    /// Booking ids with a mutation in flight or waiting for its lock.
    #[must_use]
    pub fn pending_locks(&self) -> usize {
        self.locks.lock().len()
    }

    fn notify<E: Event>(&self, event: E) {
        if let Err(err) = self.events.publish(event) {
            warn!(event = std::any::type_name::<E>(), error = %err, "Failed to publish booking event");
        }
    }
}

type LockMap = Mutex<FxHashMap<BookingId, Arc<tokio::sync::Mutex<()>>>>;

/// Shared handle on one booking's async lock.
///
/// Dropping the lease removes the map entry once no other lease holds it,
/// including when the owning future is dropped mid-await.
struct LockLease<'a> {
    locks: &'a LockMap,
    id: &'a BookingId,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl<'a> LockLease<'a> {
    fn acquire(locks: &'a LockMap, id: &'a BookingId) -> Self {
        let lock = Arc::clone(locks.lock().entry(id.clone()).or_default());
        Self { locks, id, lock }
    }

    fn lock(&self) -> &tokio::sync::Mutex<()> {
        &self.lock
    }
}

impl Drop for LockLease<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock();
        // The map and this lease are the only holders left.
        if locks.get(self.id).is_some_and(|held| Arc::strong_count(held) == 2) {
            locks.remove(self.id);
        }
    }
}

/// Everything a new booking needs except its id.
struct Draft {
    details: ShipmentDetails,
    quote: QuoteBreakdown,
    coupon: Option<AppliedCoupon>,
    estimated_delivery: NaiveDate,
}

fn add_transit_days(today: NaiveDate, transit_days: u32) -> Result<NaiveDate, BookingError> {
    today.checked_add_days(Days::new(u64::from(transit_days))).ok_or_else(|| BookingError::Internal {
        message: format!("{today} + {transit_days} days is out of range").into(),
        context: Some("Estimated delivery".into()),
    })
}

fn not_found(id: &BookingId) -> BookingError {
    BookingError::NotFound { message: id.to_string().into(), context: None }
}
