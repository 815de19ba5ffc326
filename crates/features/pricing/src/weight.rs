use crate::error::PricingError;
use phub_domain::constants::VOLUMETRIC_DIVISOR;
use phub_domain::package::{PackageSpec, WeightUnit};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

const GRAMS_PER_KG: u32 = 1000;

/// Rejects packages no quote can be computed for.
pub(crate) fn validate(package: &PackageSpec) -> Result<(), PricingError> {
    if package.weight <= Decimal::ZERO {
        return Err(invalid(format!("weight must be positive, got {}", package.weight)));
    }
    if let Some(dims) = &package.dimensions
        && dims.has_negative()
    {
        return Err(invalid(format!(
            "dimensions must not be negative, got {}x{}x{}",
            dims.length, dims.width, dims.height
        )));
    }
    if let Some(value) = package.declared_value
        && value < Decimal::ZERO
    {
        return Err(invalid(format!("declared value must not be negative, got {value}")));
    }
    Ok(())
}

#[must_use]
pub fn actual_weight_kg(package: &PackageSpec) -> Decimal {
    match package.weight_unit {
        WeightUnit::Gram => package.weight / Decimal::from(GRAMS_PER_KG),
        WeightUnit::Kilogram => package.weight,
    }
}

/// `L×W×H / 2700` for centimeter dimensions; zero unless all three are positive.
///
/// # Errors
/// Returns [`PricingError::InvalidPackageSpec`] when the volume overflows.
pub fn volumetric_weight_kg(package: &PackageSpec) -> Result<Decimal, PricingError> {
    let Some(dims) = package.dimensions.filter(|dims| dims.all_positive()) else {
        return Ok(Decimal::ZERO);
    };
    dims.length
        .checked_mul(dims.width)
        .and_then(|area| area.checked_mul(dims.height))
        .and_then(|volume| volume.checked_div(Decimal::from(VOLUMETRIC_DIVISOR)))
        .ok_or_else(|| invalid(format!("volume of {}x{}x{} is out of range", dims.length, dims.width, dims.height)))
}

/// Billing weight: the heavier of actual and volumetric, rounded up, at least 1 kg.
pub(crate) fn chargeable_weight_kg(actual: Decimal, volumetric: Decimal) -> Result<u32, PricingError> {
    let heaviest = actual.max(volumetric).ceil();
    heaviest
        .to_u32()
        .map(|kg| kg.max(1))
        .ok_or_else(|| invalid(format!("chargeable weight {heaviest} kg is out of range")))
}

fn invalid(message: String) -> PricingError {
    PricingError::InvalidPackageSpec { message: message.into(), context: None }
}
