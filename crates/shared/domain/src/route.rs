use crate::location::LocationRecord;
use crate::money::Money;
use crate::tier::ServiceTier;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Routing inputs derived from an origin/destination pair.
///
/// `routing_distance_proxy` is the gap between both endpoints' delivery-day
/// estimates. The catalog carries no geographic data, so this is an
/// approximation of distance and is priced as such.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
    pub transit_days: u32,
    pub surcharge: Money,
    pub routing_distance_proxy: u32,
}

/// Delivery estimate for a route, as reported to customers before booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryEstimate {
    pub origin: LocationRecord,
    pub destination: LocationRecord,
    pub route: RouteInfo,
    pub available_tiers: Vec<ServiceTier>,
    pub estimated_delivery: NaiveDate,
}
