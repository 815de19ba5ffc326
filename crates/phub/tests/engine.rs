use chrono::{NaiveDate, TimeZone, Utc};
use phub::booking::{InMemoryBookingRepository, ShipmentDetails};
use phub::domain::booking::{ContactDetails, PaymentStatus};
use phub::domain::config::EngineConfig;
use phub::domain::error::ErrorClass;
use phub::domain::location::PostalCode;
use phub::domain::package::{Dimensions, PackageSpec, PaymentMethod, WeightUnit};
use phub::domain::tier::ServiceTier;
use phub::domain::tracking::BookingStatus;
use phub::kernel::clock::ManualClock;
use phub::pricing::QuoteRequest;
use phub::serviceability::InMemoryCatalog;
use phub::{Engine, EngineError, InMemoryEngine};
use rust_decimal_macros::dec;
use std::sync::Arc;

const CATALOG: &str = r#"[
    { "postalCode": "110001", "city": "New Delhi", "state": "Delhi", "isServiceable": true,
      "deliveryDays": 2, "surcharge": 0, "supportedServiceTiers": ["surface", "air", "express"] },
    { "postalCode": "560001", "city": "Bengaluru", "state": "Karnataka", "isServiceable": true,
      "deliveryDays": 3, "surcharge": "10", "supportedServiceTiers": ["surface", "air", "express"] },
    { "postalCode": "194101", "city": "Leh", "state": "Ladakh", "isServiceable": false,
      "deliveryDays": 10, "surcharge": "120", "supportedServiceTiers": [] }
]"#;

fn engine_with(config: EngineConfig) -> InMemoryEngine {
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()));
    let catalog = InMemoryCatalog::from_json_str(CATALOG).unwrap();
    Engine::init_with_clock(config, catalog, InMemoryBookingRepository::new(), clock).unwrap()
}

fn engine() -> InMemoryEngine {
    engine_with(EngineConfig::default())
}

fn contact(code: &str) -> ContactDetails {
    ContactDetails {
        name: "Asha".to_owned(),
        phone: "9876543210".to_owned(),
        email: None,
        address: "1 Residency Road".to_owned(),
        postal_code: PostalCode::try_from(code).unwrap(),
        city: None,
        state: None,
        landmark: Some("Near the metro".to_owned()),
    }
}

#[test]
fn check_reports_catalog_entries() {
    let engine = engine();

    assert!(engine.check("110001").unwrap().is_serviceable);
    assert!(!engine.check("194101").unwrap().is_serviceable);

    let err = engine.check("11-001").unwrap_err();
    assert_eq!(err.class(), ErrorClass::Input);
    let err = engine.check("999999").unwrap_err();
    assert_eq!(err.class(), ErrorClass::Rule);
}

#[test]
fn estimate_counts_from_the_engine_clock() {
    let estimate = engine().estimate("110001", "560001", Some(&ServiceTier::new("air"))).unwrap();

    assert_eq!(estimate.route.transit_days, 3);
    assert_eq!(estimate.estimated_delivery, NaiveDate::from_ymd_opt(2025, 6, 4).unwrap());
    assert_eq!(estimate.available_tiers.len(), 3);
}

#[test]
fn quote_prices_volumetric_parcels() {
    let package = PackageSpec::new(dec!(1000), WeightUnit::Gram)
        .with_dimensions(Dimensions::new(dec!(30), dec!(20), dec!(10)));
    let request = QuoteRequest::new(ServiceTier::new("air"), package, PaymentMethod::Online);

    let quote = engine().quote("110001", "560001", &request).unwrap();

    // 2.222 kg volumetric beats 1 kg actual: 3 kg at 220.
    assert_eq!(quote.chargeable_weight_kg, 3);
    assert_eq!(quote.base_price, dec!(660.00));
    // 10 route surcharge + 25 x 1 delivery-day gap.
    assert_eq!(quote.distance_surcharge, dec!(35.00));
    assert_eq!(quote.tax_amount, dec!(125.10));
    assert_eq!(quote.total_amount, dec!(820.10));
}

#[test]
fn quote_rejects_unserviceable_routes() {
    let request = QuoteRequest::new(
        ServiceTier::new("surface"),
        PackageSpec::new(dec!(1), WeightUnit::Kilogram),
        PaymentMethod::Cod,
    );
    let err = engine().quote("110001", "194101", &request).unwrap_err();
    assert!(matches!(err, EngineError::Serviceability { .. }));
    assert!(err.to_string().contains("194101"), "{err}");
}

#[test]
fn disabled_gating_quotes_any_tier() {
    let mut config = EngineConfig::default();
    config.serviceability.enforce_tier_gating = false;
    let request = QuoteRequest::new(
        ServiceTier::new("premium"),
        PackageSpec::new(dec!(1), WeightUnit::Kilogram),
        PaymentMethod::Online,
    );

    assert!(engine().quote("110001", "560001", &request).is_err());
    let quote = engine_with(config).quote("110001", "560001", &request).unwrap();
    assert_eq!(quote.rate_per_kg, dec!(450.00));
}

#[test]
fn invalid_pricing_config_fails_init() {
    let mut config = EngineConfig::default();
    config.pricing.rate_table.clear();

    let catalog = InMemoryCatalog::from_json_str(CATALOG).unwrap();
    let err = InMemoryEngine::init(config, catalog, InMemoryBookingRepository::new()).unwrap_err();
    assert!(matches!(err, EngineError::Pricing { .. }));
}

#[tokio::test]
async fn book_then_pay() {
    let engine = engine();
    let details = ShipmentDetails {
        service_tier: ServiceTier::new("express"),
        sender: contact("110001"),
        receiver: contact("560001"),
        package: PackageSpec::new(dec!(500), WeightUnit::Gram).fragile(true),
        payment_method: PaymentMethod::Online,
        pickup_date: NaiveDate::from_ymd_opt(2025, 6, 2),
        pickup_slot: None,
        notes: Some("Glassware".to_owned()),
        coupon_code: None,
    };

    let booking = engine.book(details).await.unwrap();
    assert_eq!(booking.latest_entry().location, "1 Residency Road");
    assert_eq!(booking.amount_due(), booking.quote().total_amount);
    assert_eq!(booking.quote().fragile_surcharge, dec!(40.00));

    let paid = engine.bookings().confirm_payment(booking.id(), "Online").await.unwrap();
    assert_eq!(paid.payment_status(), PaymentStatus::Paid);
    assert_eq!(paid.current_status(), BookingStatus::Confirmed);
}

#[test]
fn verification_store_is_wired() {
    let engine = engine();
    let code = engine.verification().issue("asha@example.com").unwrap();
    assert!(engine.verification().take_if_valid("asha@example.com", &code));
    assert!(phub::features::is_enabled("verification"));
}
