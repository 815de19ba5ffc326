use crate::money::Money;
use crate::tier::ServiceTier;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where the per-kg rate of a quote came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    /// The tier was found in the rate table.
    Table,
    /// The tier was unknown and the lowest configured rate was used instead.
    Fallback,
}

/// Itemized, immutable price of one shipment.
///
/// Every monetary field is already rounded to the minor unit, and
/// `total_amount == subtotal() + tax_amount` holds exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBreakdown {
    pub service_tier: ServiceTier,
    pub rate_source: RateSource,
    pub actual_weight_kg: Decimal,
    pub volumetric_weight_kg: Decimal,
    pub chargeable_weight_kg: u32,
    pub rate_per_kg: Money,
    pub base_price: Money,
    pub distance_surcharge: Money,
    pub fragile_surcharge: Money,
    pub declared_value_surcharge: Money,
    pub cod_surcharge: Money,
    pub tax_amount: Money,
    pub total_amount: Money,
}

impl QuoteBreakdown {
    #[must_use]
    pub fn surcharges_total(&self) -> Money {
        self.distance_surcharge
            + self.fragile_surcharge
            + self.declared_value_surcharge
            + self.cod_surcharge
    }

    /// Base price plus every surcharge, before tax.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.base_price + self.surcharges_total()
    }
}
