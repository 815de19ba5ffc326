use crate::coupon::Coupon;
use crate::money::Money;
use crate::tier::ServiceTier;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level engine configuration supplied by the host.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfigInner {
    pub pricing: PricingConfig,
    pub serviceability: ServiceabilityConfig,
    pub booking: BookingConfig,
    pub verification: VerificationConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into slices.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(flatten, default)]
    inner: Arc<EngineConfigInner>,
}

impl Deref for EngineConfig {
    type Target = EngineConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for EngineConfig {
    fn deref_mut(&mut self) -> &mut EngineConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Rate table and surcharge knobs of the quote calculator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Per-kg rate of each service tier.
    pub rate_table: BTreeMap<ServiceTier, Money>,
    pub price_floor: Money,
    pub tax_rate: Decimal,
    pub insurance_rate: Decimal,
    pub cod_rate: Decimal,
    pub cod_cap: Money,
    pub flat_fragile_fee: Money,
    /// Charged per unit of routing distance proxy.
    pub distance_surcharge_rate: Money,
    /// Redeemable promotional codes.
    pub coupons: Vec<Coupon>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceabilityConfig {
    /// Reject routes whose endpoints do not both support the requested tier.
    pub enforce_tier_gating: bool,
}

/// Booking identifier format and allocation policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    pub id_prefix: String,
    pub id_sequence_width: usize,
    pub id_retry_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    pub otp_ttl_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub level: String,
    /// Directory for rolling log files. Console only when absent.
    pub directory: Option<PathBuf>,
    /// Write file logs as JSON lines.
    pub json: bool,
}

// --- Default ---

impl Default for PricingConfig {
    fn default() -> Self {
        let rate_table = [("surface", 100), ("air", 220), ("express", 300), ("premium", 450)]
            .into_iter()
            .map(|(tier, rate)| (ServiceTier::new(tier), Decimal::from(rate)))
            .collect();

        Self {
            rate_table,
            price_floor: Decimal::new(5000, 2),
            tax_rate: Decimal::new(18, 2),
            insurance_rate: Decimal::new(2, 2),
            cod_rate: Decimal::new(2, 2),
            cod_cap: Decimal::new(5000, 2),
            flat_fragile_fee: Decimal::new(4000, 2),
            distance_surcharge_rate: Decimal::new(2500, 2),
            coupons: Vec::new(),
        }
    }
}

impl Default for ServiceabilityConfig {
    fn default() -> Self {
        Self { enforce_tier_gating: true }
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self { id_prefix: "EP".to_owned(), id_sequence_width: 4, id_retry_limit: 5 }
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self { otp_ttl_seconds: 300 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), directory: None, json: false }
    }
}
