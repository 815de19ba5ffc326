use phub_domain::package::{PackageSpec, PaymentMethod};
use phub_domain::tier::ServiceTier;
use serde::{Deserialize, Serialize};

/// Quote input as received at the boundary.
///
/// Accepts the historical field names (`serviceType`, `packageDetails`,
/// `value`) and normalises them into the single shape the calculator uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(alias = "serviceType")]
    pub service_tier: ServiceTier,
    #[serde(alias = "packageDetails")]
    pub package: PackageSpec,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

impl QuoteRequest {
    pub fn new(service_tier: impl Into<ServiceTier>, package: PackageSpec, payment_method: PaymentMethod) -> Self {
        Self { service_tier: service_tier.into(), package, payment_method }
    }
}
