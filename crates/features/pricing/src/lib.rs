//! Pricing slice: turns a service tier, a package and routing inputs into an
//! itemized [`QuoteBreakdown`](phub_domain::quote::QuoteBreakdown).
//!
//! ## Pipeline
//! 1. Normalise the weight to kilograms and derive the volumetric weight (`L×W×H / 2700`).
//! 2. Chargeable weight is the heavier of the two, rounded up, at least 1 kg.
//! 3. Base price is `rate × chargeable`, never below the configured floor.
//! 4. Distance, fragile, declared-value and COD surcharges are added.
//! 5. Tax is applied to the subtotal.
//!
//! Every monetary field is rounded half-up to the cent exactly once.
//!
//! Coupons are applied after the quote and never change the breakdown; the
//! discount is reported next to it.

mod calculator;
mod coupon;
mod error;
mod request;
mod weight;

pub use crate::calculator::QuoteCalculator;
pub use crate::coupon::apply_coupon;
pub use crate::error::{PricingError, PricingErrorExt};
pub use crate::request::QuoteRequest;
pub use crate::weight::{actual_weight_kg, volumetric_weight_kg};

use phub_domain::config::PricingConfig;

/// Initialize the pricing slice.
///
/// # Errors
/// Returns [`PricingError::InvalidConfig`] for an unusable rate table or negative knobs.
pub fn init(config: &PricingConfig) -> Result<QuoteCalculator, PricingError> {
    let calculator = QuoteCalculator::from_config(config.clone())?;
    tracing::info!(tiers = config.rate_table.len(), "Pricing slice initialized");
    Ok(calculator)
}
