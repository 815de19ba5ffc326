use chrono::{NaiveDate, TimeDelta, TimeZone, Utc};
use phub_booking::{
    Booking, BookingCreated, BookingError, BookingRepository, BookingService, InMemoryBookingRepository,
    PaymentUpdated, ShipmentDetails, StatusChanged, init,
};
use phub_domain::booking::{BookingId, ContactDetails, PaymentStatus};
use phub_domain::config::{BookingConfig, PricingConfig, ServiceabilityConfig};
use phub_domain::error::ErrorClass;
use phub_domain::location::PostalCode;
use phub_domain::package::{PackageSpec, PaymentMethod, WeightUnit};
use phub_domain::tier::ServiceTier;
use phub_domain::tracking::BookingStatus;
use phub_event_bus::{EventBus, EventReceiverExt};
use phub_kernel::clock::{Clock, ManualClock};
use phub_serviceability::InMemoryCatalog;
use rust_decimal_macros::dec;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

const CATALOG: &str = r#"[
    { "postalCode": "110001", "city": "New Delhi", "state": "Delhi", "isServiceable": true,
      "deliveryDays": 2, "surcharge": 0, "supportedServiceTiers": ["surface", "air", "express"] },
    { "postalCode": "400001", "city": "Mumbai", "state": "Maharashtra", "isServiceable": true,
      "deliveryDays": 3, "surcharge": "15", "supportedServiceTiers": ["surface", "air"] },
    { "postalCode": "194101", "city": "Leh", "state": "Ladakh", "isServiceable": false,
      "deliveryDays": 10, "surcharge": "120", "supportedServiceTiers": [] }
]"#;

struct Fixture<R: BookingRepository> {
    service: BookingService<InMemoryCatalog, R>,
    clock: Arc<ManualClock>,
    bus: EventBus,
}

fn fixture_with<R: BookingRepository>(repository: R, retry_limit: u32) -> Fixture<R> {
    fixture_priced(repository, retry_limit, &PricingConfig::default())
}

fn fixture_priced<R: BookingRepository>(
    repository: R,
    retry_limit: u32,
    pricing: &PricingConfig,
) -> Fixture<R> {
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()));
    let bus = EventBus::new();
    let resolver = phub_serviceability::init(
        &ServiceabilityConfig::default(),
        InMemoryCatalog::from_json_str(CATALOG).unwrap(),
    );
    let calculator = phub_pricing::init(pricing).unwrap();
    let config = BookingConfig { id_retry_limit: retry_limit, ..BookingConfig::default() };
    let service = init(&config, resolver, calculator, repository, bus.clone(), clock.clone());
    Fixture { service, clock, bus }
}

fn fixture() -> Fixture<InMemoryBookingRepository> {
    fixture_with(InMemoryBookingRepository::new(), 5)
}

fn contact(name: &str, code: &str, city: Option<&str>) -> ContactDetails {
    ContactDetails {
        name: name.to_owned(),
        phone: "9876543210".to_owned(),
        email: Some(format!("{}@example.com", name.to_lowercase())),
        address: "12 MG Road".to_owned(),
        postal_code: PostalCode::try_from(code).unwrap(),
        city: city.map(str::to_owned),
        state: None,
        landmark: None,
    }
}

fn details(to: &str) -> ShipmentDetails {
    ShipmentDetails {
        service_tier: ServiceTier::new("surface"),
        sender: contact("Asha", "110001", Some("New Delhi")),
        receiver: contact("Ravi", to, Some("Mumbai")),
        package: PackageSpec::new(dec!(1), WeightUnit::Kilogram),
        payment_method: PaymentMethod::Online,
        pickup_date: None,
        pickup_slot: Some("10:00-13:00".to_owned()),
        notes: None,
        coupon_code: None,
    }
}

#[tokio::test]
async fn create_stores_a_priced_pending_booking() {
    let fx = fixture();
    let booking = fx.service.create(details("400001")).await.unwrap();

    assert!(booking.id().as_str().starts_with("EP"));
    assert_eq!(booking.current_status(), BookingStatus::Pending);
    assert_eq!(booking.payment_status(), PaymentStatus::Pending);
    assert_eq!(booking.tracking_history().len(), 1);
    assert_eq!(booking.latest_entry().location, "12 MG Road");
    assert_eq!(booking.estimated_delivery(), NaiveDate::from_ymd_opt(2025, 6, 4).unwrap());

    // 1 kg surface: base 100, distance 15 + 25 x 1, tax 18% of 140.
    let quote = booking.quote();
    assert_eq!(quote.base_price, dec!(100.00));
    assert_eq!(quote.distance_surcharge, dec!(40.00));
    assert_eq!(quote.tax_amount, dec!(25.20));
    assert_eq!(quote.total_amount, dec!(165.20));

    assert_eq!(fx.service.get(booking.id()).await.unwrap(), booking);
}

#[tokio::test]
async fn rejected_routes_and_packages_store_nothing() {
    let fx = fixture();

    let err = fx.service.create(details("194101")).await.unwrap_err();
    assert!(matches!(err, BookingError::Serviceability { .. }));
    assert_eq!(err.class(), ErrorClass::Rule);

    let mut weightless = details("400001");
    weightless.package.weight = dec!(0);
    let err = fx.service.create(weightless).await.unwrap_err();
    assert!(matches!(err, BookingError::Pricing { .. }));
    assert_eq!(err.class(), ErrorClass::Input);

    let mut express = details("400001");
    express.service_tier = ServiceTier::new("express");
    let err = fx.service.create(express).await.unwrap_err();
    assert!(err.to_string().contains("not offered"), "{err}");

    let mut blank = details("400001");
    blank.sender.name = String::new();
    let err = fx.service.create(blank).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Input);

    assert_eq!(fx.service.repository().len(), 0);
}

#[tokio::test]
async fn skipping_steps_is_rejected_and_history_is_kept() {
    let fx = fixture();
    let booking = fx.service.create(details("400001")).await.unwrap();
    let id = booking.id();

    let err = fx.service.transition(id, BookingStatus::Delivered, "Mumbai", "skip").await.unwrap_err();
    assert!(matches!(err, BookingError::InvalidTransition { .. }));
    assert_eq!(err.class(), ErrorClass::Rule);

    let stored = fx.service.get(id).await.unwrap();
    assert_eq!(stored.tracking_history().len(), 1);
    assert_eq!(stored.latest_entry(), booking.latest_entry());
    assert_eq!(stored.version(), booking.version());
}

#[tokio::test]
async fn walks_the_whole_fulfillment_chain() {
    let fx = fixture();
    let id = fx.service.create(details("400001")).await.unwrap().id().clone();

    let steps = [
        (BookingStatus::Confirmed, "New Delhi"),
        (BookingStatus::Picked, "New Delhi"),
        (BookingStatus::InTransit, "Nagpur Hub"),
        (BookingStatus::OutForDelivery, "Mumbai"),
        (BookingStatus::Delivered, "Mumbai"),
    ];
    let mut last_len = 1;
    for (status, location) in steps {
        fx.clock.advance(TimeDelta::hours(3));
        let booking = fx.service.transition(&id, status, location, format!("Parcel {status}")).await.unwrap();
        assert_eq!(booking.current_status(), booking.latest_entry().status);
        assert!(booking.tracking_history().len() > last_len);
        last_len = booking.tracking_history().len();
    }

    let err = fx.service.cancel(&id, "Mumbai", None).await.unwrap_err();
    assert!(matches!(err, BookingError::InvalidTransition { .. }));

    let view = fx.service.tracking(&id).await.unwrap();
    assert_eq!(view.current_status, BookingStatus::Delivered);
    assert_eq!(view.history.len(), 6);

    let snapshot = fx.service.latest_status(&id).await.unwrap();
    assert_eq!(snapshot.current_status, BookingStatus::Delivered);
    assert_eq!(snapshot.location, "Mumbai");
}

#[tokio::test]
async fn cancel_uses_default_description() {
    let fx = fixture();
    let id = fx.service.create(details("400001")).await.unwrap().id().clone();

    let booking = fx.service.cancel(&id, "New Delhi", None).await.unwrap();
    assert_eq!(booking.current_status(), BookingStatus::Cancelled);
    assert_eq!(booking.latest_entry().description, "Booking cancelled");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_transitions_on_one_booking_apply_once() {
    let fx = fixture();
    let id = fx.service.create(details("400001")).await.unwrap().id().clone();

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let service = fx.service.clone();
            let id = id.clone();
            tokio::spawn(async move {
                service.transition(&id, BookingStatus::Confirmed, "New Delhi", format!("worker {i}")).await
            })
        })
        .collect();

    let mut applied = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => applied += 1,
            Err(err) => assert!(matches!(err, BookingError::InvalidTransition { .. }), "{err}"),
        }
    }
    assert_eq!(applied, 1);

    let stored = fx.service.get(&id).await.unwrap();
    assert_eq!(stored.tracking_history().len(), 2);
    assert_eq!(stored.current_status(), BookingStatus::Confirmed);
    assert_eq!(stored.version(), 1);
    assert_eq!(fx.service.pending_locks(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creations_get_distinct_ids() {
    let fx = fixture();

    let handles: Vec<_> = (0..128)
        .map(|_| {
            let service = fx.service.clone();
            tokio::spawn(async move { service.create(details("400001")).await })
        })
        .collect();

    let mut ids = BTreeSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap().unwrap().id().clone());
    }
    assert_eq!(ids.len(), 128);
    assert_eq!(fx.service.repository().len(), 128);
}

#[tokio::test]
async fn payment_confirmation_confirms_pending_bookings() {
    let fx = fixture();
    let id = fx.service.create(details("400001")).await.unwrap().id().clone();

    let booking = fx.service.confirm_payment(&id, "Online").await.unwrap();
    assert_eq!(booking.payment_status(), PaymentStatus::Paid);
    assert_eq!(booking.current_status(), BookingStatus::Confirmed);
    assert_eq!(booking.latest_entry().description, "Payment successful - Order confirmed");

    // Paid twice is not a valid payment change; nothing moves.
    let err = fx.service.confirm_payment(&id, "Online").await.unwrap_err();
    assert!(matches!(err, BookingError::InvalidPaymentUpdate { .. }));
    assert_eq!(fx.service.get(&id).await.unwrap().tracking_history().len(), 2);

    let booking = fx.service.update_payment(&id, PaymentStatus::Refunded).await.unwrap();
    assert_eq!(booking.payment_status(), PaymentStatus::Refunded);
    assert_eq!(booking.current_status(), BookingStatus::Confirmed);
}

#[tokio::test]
async fn payment_after_dispatch_leaves_status_alone() {
    let fx = fixture();
    let id = fx.service.create(details("400001")).await.unwrap().id().clone();
    fx.service.transition(&id, BookingStatus::Confirmed, "New Delhi", "COD order").await.unwrap();

    let err = fx.service.update_payment(&id, PaymentStatus::Refunded).await.unwrap_err();
    assert!(matches!(err, BookingError::InvalidPaymentUpdate { .. }));

    let booking = fx.service.update_payment(&id, PaymentStatus::Failed).await.unwrap();
    assert_eq!(booking.payment_status(), PaymentStatus::Failed);
    let booking = fx.service.confirm_payment(&id, "Online").await.unwrap();
    assert_eq!(booking.payment_status(), PaymentStatus::Paid);
    assert_eq!(booking.tracking_history().len(), 2);
}

#[tokio::test]
async fn notification_facts_follow_persistence() {
    let fx = fixture();
    let mut created = fx.bus.subscribe::<BookingCreated>().unwrap();
    let mut changed = fx.bus.subscribe::<StatusChanged>().unwrap();
    let mut paid = fx.bus.subscribe::<PaymentUpdated>().unwrap();

    let id = fx.service.create(details("400001")).await.unwrap().id().clone();
    let event = created.next_event().await.unwrap();
    assert_eq!(event.booking_id, id);
    assert_eq!(event.status, BookingStatus::Pending);

    fx.service.confirm_payment(&id, "Online").await.unwrap();
    assert_eq!(paid.next_event().await.unwrap().payment_status, PaymentStatus::Paid);
    let event = changed.next_event().await.unwrap();
    assert_eq!((event.from, event.status), (BookingStatus::Pending, BookingStatus::Confirmed));

    // Rejected operations publish nothing.
    let _ = fx.service.transition(&id, BookingStatus::Delivered, "Mumbai", "skip").await;
    assert!(changed.try_next_event().is_none());
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let fx = fixture();

    let err = fx.service.get(&BookingId::new("EP1")).await.unwrap_err();
    assert!(matches!(err, BookingError::NotFound { .. }));

    let err = fx.service.transition(&BookingId::new("EP1"), BookingStatus::Confirmed, "", "").await.unwrap_err();
    assert!(matches!(err, BookingError::NotFound { .. }));

    assert_eq!(fx.service.parse_id(" EP17000000000000001 ").unwrap().as_str(), "EP17000000000000001");
    let err = fx.service.parse_id("XX123").unwrap_err();
    assert!(matches!(err, BookingError::Kernel { .. }));
    assert_eq!(err.class(), ErrorClass::Input);
}

/// Reports the first `collisions` saves as taken ids.
#[derive(Debug)]
struct CollidingRepository {
    inner: InMemoryBookingRepository,
    collisions: AtomicU32,
}

impl CollidingRepository {
    fn new(collisions: u32) -> Self {
        Self { inner: InMemoryBookingRepository::new(), collisions: AtomicU32::new(collisions) }
    }
}

impl BookingRepository for CollidingRepository {
    async fn save(&self, booking: Booking) -> Result<(), BookingError> {
        if self.collisions.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1)).is_ok() {
            return Err(BookingError::UniquenessConflict { message: booking.id().to_string().into(), context: None });
        }
        self.inner.save(booking).await
    }

    async fn load(&self, id: &BookingId) -> Result<Option<Booking>, BookingError> {
        self.inner.load(id).await
    }

    async fn update(&self, booking: Booking, expected_version: u64) -> Result<(), BookingError> {
        self.inner.update(booking, expected_version).await
    }
}

#[tokio::test]
async fn id_collisions_are_retried() {
    let fx = fixture_with(CollidingRepository::new(2), 3);

    let booking = fx.service.create(details("400001")).await.unwrap();
    assert!(booking.id().as_str().ends_with("0003"), "{}", booking.id());
    assert_eq!(fx.service.repository().inner.len(), 1);
}

#[tokio::test]
async fn retries_are_bounded() {
    let fx = fixture_with(CollidingRepository::new(u32::MAX), 3);

    let err = fx.service.create(details("400001")).await.unwrap_err();
    assert!(matches!(err, BookingError::IdAllocationExhausted { .. }));
    assert_eq!(err.class(), ErrorClass::Contention);
    assert!(err.class().is_retryable());
    assert_eq!(fx.service.repository().inner.len(), 0);
    assert_eq!(fx.service.repository().collisions.load(Ordering::SeqCst), u32::MAX - 3);
}

#[tokio::test]
async fn stale_versions_are_refused() {
    let repository = InMemoryBookingRepository::new();
    let fx = fixture_with(repository.clone(), 5);
    let booking = fx.service.create(details("400001")).await.unwrap();

    let mut first = booking.clone();
    first.transition(BookingStatus::Confirmed, "New Delhi", "first", fx.clock.now()).unwrap();
    repository.update(first, booking.version()).await.unwrap();

    let mut second = booking.clone();
    second.transition(BookingStatus::Cancelled, "New Delhi", "second", fx.clock.now()).unwrap();
    let err = repository.update(second, booking.version()).await.unwrap_err();
    assert!(matches!(err, BookingError::VersionConflict { .. }));
    assert_eq!(err.class(), ErrorClass::Contention);

    assert_eq!(repository.load(booking.id()).await.unwrap().unwrap().current_status(), BookingStatus::Confirmed);
}

/// Never finishes an update, so the caller's future has to be abandoned.
#[derive(Debug, Default)]
struct StallingRepository {
    inner: InMemoryBookingRepository,
}

impl BookingRepository for StallingRepository {
    async fn save(&self, booking: Booking) -> Result<(), BookingError> {
        self.inner.save(booking).await
    }

    async fn load(&self, id: &BookingId) -> Result<Option<Booking>, BookingError> {
        self.inner.load(id).await
    }

    async fn update(&self, _booking: Booking, _expected_version: u64) -> Result<(), BookingError> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn abandoned_mutations_release_their_lock() {
    let fx = fixture_with(StallingRepository::default(), 5);
    let id = fx.service.create(details("400001")).await.unwrap().id().clone();

    let stalled = tokio::time::timeout(
        std::time::Duration::from_millis(20),
        fx.service.transition(&id, BookingStatus::Confirmed, "Hub", "never lands"),
    )
    .await;
    assert!(stalled.is_err());
    assert_eq!(fx.service.pending_locks(), 0);

    let stored = fx.service.get(&id).await.unwrap();
    assert_eq!(stored.current_status(), BookingStatus::Pending);
}

fn coupon_pricing() -> PricingConfig {
    serde_json::from_str(
        r#"{ "coupons": [
            { "code": "FIRST20", "discountType": "percentage", "percent": 20,
              "maxDiscountAmount": 25, "minOrderValue": 100,
              "validFrom": "2025-05-01T00:00:00Z", "validUntil": "2025-06-30T23:59:59Z" },
            { "code": "OLD50", "discountType": "flat", "amount": 50,
              "validFrom": "2025-01-01T00:00:00Z", "validUntil": "2025-03-31T23:59:59Z" }
        ] }"#,
    )
    .unwrap()
}

#[tokio::test]
async fn coupon_discount_is_stored_beside_the_quote() {
    let fx = fixture_priced(InMemoryBookingRepository::new(), 5, &coupon_pricing());
    let mut request = details("400001");
    request.coupon_code = Some("first20".to_owned());

    let booking = fx.service.create(request).await.unwrap();

    assert_eq!(booking.quote().total_amount, dec!(165.20));
    assert_eq!(booking.coupon_discount(), dec!(25.00));
    assert_eq!(booking.amount_due(), dec!(140.20));
    assert_eq!(booking.details().coupon_code.as_deref(), Some("FIRST20"));
    assert_eq!(fx.service.get(booking.id()).await.unwrap(), booking);
}

#[tokio::test]
async fn unusable_coupons_abort_creation() {
    let fx = fixture_priced(InMemoryBookingRepository::new(), 5, &coupon_pricing());

    let mut expired = details("400001");
    expired.coupon_code = Some("OLD50".to_owned());
    let err = fx.service.create(expired).await.unwrap_err();
    assert!(matches!(err, BookingError::Pricing { .. }));
    assert_eq!(err.class(), ErrorClass::Rule);

    let mut unknown = details("400001");
    unknown.coupon_code = Some("NOPE".to_owned());
    assert!(fx.service.create(unknown).await.is_err());

    let mut blank = details("400001");
    blank.coupon_code = Some("  ".to_owned());
    let booking = fx.service.create(blank).await.unwrap();
    assert_eq!(booking.coupon_discount(), dec!(0));
    assert_eq!(booking.details().coupon_code, None);

    assert_eq!(fx.service.repository().len(), 1);
}
