use crate::args::{ParcelArgs, PartyArgs, RouteArgs};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use phub::InMemoryEngine;
use phub::booking::{Booking, ShipmentDetails};
use phub::domain::booking::ContactDetails;
use phub::domain::location::{LocationRecord, PostalCode};
use phub::domain::package::{PackageSpec, PaymentMethod};
use phub::domain::quote::QuoteBreakdown;
use phub::domain::route::DeliveryEstimate;
use phub::domain::tier::ServiceTier;
use phub::pricing::QuoteRequest;

pub fn check(engine: &InMemoryEngine, postal_code: &str) -> Result<LocationRecord> {
    Ok(engine.check(postal_code)?)
}

pub fn estimate(engine: &InMemoryEngine, route: &RouteArgs, tier: Option<&str>) -> Result<DeliveryEstimate> {
    let tier = tier.map(ServiceTier::new);
    Ok(engine.estimate(&route.from, &route.to, tier.as_ref())?)
}

pub fn quote(engine: &InMemoryEngine, route: &RouteArgs, parcel: &ParcelArgs) -> Result<QuoteBreakdown> {
    let request = QuoteRequest::new(ServiceTier::new(&parcel.tier), package(parcel), payment(parcel));
    Ok(engine.quote(&route.from, &route.to, &request)?)
}

/// Optional fields of a booking request.
#[derive(Debug, Default)]
pub struct Pickup {
    pub date: Option<NaiveDate>,
    pub slot: Option<String>,
    pub notes: Option<String>,
    pub coupon: Option<String>,
}

pub async fn book(
    engine: &InMemoryEngine,
    route: &RouteArgs,
    parcel: &ParcelArgs,
    parties: PartyArgs,
    pickup: Pickup,
) -> Result<Booking> {
    let details = ShipmentDetails {
        service_tier: ServiceTier::new(&parcel.tier),
        sender: contact(parties.sender_name, parties.sender_phone, parties.sender_address, &route.from)?,
        receiver: contact(
            parties.receiver_name,
            parties.receiver_phone,
            parties.receiver_address,
            &route.to,
        )?,
        package: package(parcel),
        payment_method: payment(parcel),
        pickup_date: pickup.date,
        pickup_slot: pickup.slot,
        notes: pickup.notes,
        coupon_code: pickup.coupon,
    };
    Ok(engine.book(details).await?)
}

fn package(parcel: &ParcelArgs) -> PackageSpec {
    let mut package = PackageSpec::new(parcel.weight, parcel.unit.into()).fragile(parcel.fragile);
    if let Some(dims) = parcel.dims {
        package = package.with_dimensions(dims);
    }
    if let Some(value) = parcel.value {
        package = package.with_declared_value(value);
    }
    package
}

const fn payment(parcel: &ParcelArgs) -> PaymentMethod {
    if parcel.cod { PaymentMethod::Cod } else { PaymentMethod::Online }
}

fn contact(name: String, phone: String, address: String, postal_code: &str) -> Result<ContactDetails> {
    let postal_code = PostalCode::try_from(postal_code)
        .with_context(|| format!("Invalid postal code '{postal_code}'"))?;
    Ok(ContactDetails {
        name,
        phone,
        email: None,
        address,
        postal_code,
        city: None,
        state: None,
        landmark: None,
    })
}
