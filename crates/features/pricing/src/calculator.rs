use crate::coupon::{apply_coupon, validate_coupon};
use crate::error::PricingError;
use crate::request::QuoteRequest;
use crate::weight::{actual_weight_kg, chargeable_weight_kg, validate, volumetric_weight_kg};
use chrono::{DateTime, Utc};
use phub_domain::config::PricingConfig;
use phub_domain::coupon::{AppliedCoupon, Coupon};
use phub_domain::money::{Money, round_money};
use phub_domain::package::{PackageSpec, PaymentMethod};
use phub_domain::quote::{QuoteBreakdown, RateSource};
use phub_domain::route::RouteInfo;
use phub_domain::tier::ServiceTier;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, warn};

const WEIGHT_SCALE: u32 = 3;

/// Pure quote calculator over a validated rate table.
///
/// Identical inputs always produce an identical breakdown; the calculator
/// holds no mutable state and can be shared freely.
#[phub_derive::phub_slice]
pub struct QuoteCalculator {
    config: PricingConfig,
    fallback_rate: Money,
    coupons: BTreeMap<String, Coupon>,
}

impl QuoteCalculator {
    /// Validates the configuration and builds a calculator.
    ///
    /// # Errors
    /// Returns [`PricingError::InvalidConfig`] when the rate table is empty, the
    /// price floor is not positive, any rate or fee is negative, or a coupon is
    /// malformed or listed twice.
    pub fn from_config(config: PricingConfig) -> Result<Self, PricingError> {
        validate_config(&config)?;
        let fallback_rate = config.rate_table.values().min().copied().ok_or_else(|| {
            PricingError::InvalidConfig { message: "rate table is empty".into(), context: None }
        })?;

        let mut coupons = BTreeMap::new();
        for coupon in &config.coupons {
            validate_coupon(coupon).map_err(invalid_config)?;
            let code = Coupon::normalize_code(&coupon.code);
            if coupons.insert(code.clone(), coupon.clone()).is_some() {
                return Err(invalid_config(format!("coupon '{code}' is listed twice")));
            }
        }
        Ok(Self::new(QuoteCalculatorInner { config, fallback_rate, coupons }))
    }

    #[must_use]
    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Per-kg rate of a tier. Unknown tiers get the lowest configured rate so
    /// quoting stays available; the source tells which one was used.
    #[must_use]
    pub fn rate_for(&self, tier: &ServiceTier) -> (Money, RateSource) {
        self.config.rate_table.get(tier).map_or_else(
            || {
                warn!(%tier, rate = %self.fallback_rate, "Unknown service tier, using lowest rate");
                (self.fallback_rate, RateSource::Fallback)
            },
            |rate| (*rate, RateSource::Table),
        )
    }

    /// Computes the itemized price of a shipment.
    ///
    /// Each component is rounded once to the minor unit, so
    /// `total_amount == base + surcharges + tax` holds to the cent.
    ///
    /// # Errors
    /// Returns [`PricingError::InvalidPackageSpec`] if the weight is not positive,
    /// a dimension or the declared value is negative, or the package is too large
    /// to price, and [`PricingError::InvalidRoute`] for a negative route surcharge.
    /// An unknown tier is never an error.
    pub fn quote(
        &self,
        tier: &ServiceTier,
        package: &PackageSpec,
        route: &RouteInfo,
        payment: PaymentMethod,
    ) -> Result<QuoteBreakdown, PricingError> {
        if let Err(err) = validate(package).and_then(|()| validate_route(route)) {
            debug!(%tier, error = %err, "Quote rejected");
            return Err(err);
        }

        let cfg = &self.config;
        let actual = actual_weight_kg(package);
        let volumetric = volumetric_weight_kg(package)?;
        let chargeable = chargeable_weight_kg(actual, volumetric)?;
        let (rate_per_kg, rate_source) = self.rate_for(tier);

        let weighted = checked(rate_per_kg.checked_mul(Decimal::from(chargeable)), "base price")?;
        let base_price = round_money(weighted.max(cfg.price_floor));

        let distance = checked(
            cfg.distance_surcharge_rate
                .checked_mul(Decimal::from(route.routing_distance_proxy))
                .and_then(|d| d.checked_add(route.surcharge)),
            "distance surcharge",
        )?;
        let distance_surcharge = round_money(distance);

        let fragile_surcharge =
            round_money(if package.fragile { cfg.flat_fragile_fee } else { Decimal::ZERO });

        let declared_value_surcharge = round_money(checked(
            package.declared_value.map_or(Some(Decimal::ZERO), |v| v.checked_mul(cfg.insurance_rate)),
            "declared value surcharge",
        )?);

        let cod_surcharge = round_money(match payment {
            PaymentMethod::Cod => {
                checked(base_price.checked_mul(cfg.cod_rate), "cod surcharge")?.min(cfg.cod_cap)
            },
            PaymentMethod::Online => Decimal::ZERO,
        });

        let subtotal = checked(
            [distance_surcharge, fragile_surcharge, declared_value_surcharge, cod_surcharge]
                .into_iter()
                .try_fold(base_price, Decimal::checked_add),
            "subtotal",
        )?;
        let tax_amount = round_money(checked(subtotal.checked_mul(cfg.tax_rate), "tax")?);

        let breakdown = QuoteBreakdown {
            service_tier: tier.clone(),
            rate_source,
            actual_weight_kg: actual.round_dp(WEIGHT_SCALE),
            volumetric_weight_kg: volumetric.round_dp(WEIGHT_SCALE),
            chargeable_weight_kg: chargeable,
            rate_per_kg: round_money(rate_per_kg),
            base_price,
            distance_surcharge,
            fragile_surcharge,
            declared_value_surcharge,
            cod_surcharge,
            tax_amount,
            total_amount: subtotal + tax_amount,
        };
        debug!(%tier, chargeable, total = %breakdown.total_amount, "Quote computed");
        Ok(breakdown)
    }

    /// Quotes a boundary request.
    ///
    /// # Errors
    /// See [`QuoteCalculator::quote`].
    pub fn quote_request(
        &self,
        request: &QuoteRequest,
        route: &RouteInfo,
    ) -> Result<QuoteBreakdown, PricingError> {
        self.quote(&request.service_tier, &request.package, route, request.payment_method)
    }

    /// Redeems a configured coupon against an order total.
    ///
    /// # Errors
    /// Returns [`PricingError::CouponRejected`] for an unknown code or any
    /// reason [`apply_coupon`] refuses it.
    pub fn redeem(
        &self,
        code: &str,
        order_total: Money,
        now: DateTime<Utc>,
    ) -> Result<AppliedCoupon, PricingError> {
        let normalized = Coupon::normalize_code(code);
        let coupon = self.coupons.get(&normalized).ok_or_else(|| PricingError::CouponRejected {
            message: format!("{normalized} is not a valid coupon code").into(),
            context: None,
        })?;
        let applied = apply_coupon(coupon, order_total, now).inspect_err(|err| {
            debug!(code = %normalized, error = %err, "Coupon rejected");
        })?;
        debug!(code = %applied.code, discount = %applied.discount, "Coupon applied");
        Ok(applied)
    }
}

fn validate_route(route: &RouteInfo) -> Result<(), PricingError> {
    if route.surcharge.is_sign_negative() && !route.surcharge.is_zero() {
        return Err(PricingError::InvalidRoute {
            message: format!("route surcharge is negative: {}", route.surcharge).into(),
            context: None,
        });
    }
    Ok(())
}

fn checked(value: Option<Decimal>, what: &'static str) -> Result<Decimal, PricingError> {
    value.ok_or_else(|| PricingError::InvalidPackageSpec {
        message: format!("{what} is out of range").into(),
        context: None,
    })
}

fn validate_config(config: &PricingConfig) -> Result<(), PricingError> {
    if config.rate_table.is_empty() {
        return Err(invalid_config("rate table is empty"));
    }
    if let Some((tier, rate)) = config.rate_table.iter().find(|(_, rate)| rate.is_sign_negative()) {
        return Err(invalid_config(format!("rate for '{tier}' is negative: {rate}")));
    }
    if config.price_floor <= Decimal::ZERO {
        return Err(invalid_config("price_floor must be positive"));
    }

    let knobs = [
        ("tax_rate", config.tax_rate),
        ("insurance_rate", config.insurance_rate),
        ("cod_rate", config.cod_rate),
        ("cod_cap", config.cod_cap),
        ("flat_fragile_fee", config.flat_fragile_fee),
        ("distance_surcharge_rate", config.distance_surcharge_rate),
    ];
    if let Some((name, value)) = knobs.iter().find(|(_, value)| value.is_sign_negative()) {
        return Err(invalid_config(format!("{name} is negative: {value}")));
    }
    Ok(())
}

fn invalid_config(message: impl Into<std::borrow::Cow<'static, str>>) -> PricingError {
    PricingError::InvalidConfig { message: message.into(), context: None }
}
