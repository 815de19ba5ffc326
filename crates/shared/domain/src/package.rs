use crate::money::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightUnit {
    /// Default when a request omits the unit.
    #[default]
    #[serde(rename = "g", alias = "gram", alias = "grams")]
    Gram,
    #[serde(rename = "kg", alias = "kilogram", alias = "kilograms")]
    Kilogram,
}

/// Package dimensions in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: Decimal,
    pub width: Decimal,
    pub height: Decimal,
}

impl Dimensions {
    #[must_use]
    pub const fn new(length: Decimal, width: Decimal, height: Decimal) -> Self {
        Self { length, width, height }
    }

    #[must_use]
    pub fn has_negative(&self) -> bool {
        self.as_array().iter().any(|d| *d < Decimal::ZERO)
    }

    #[must_use]
    pub fn all_positive(&self) -> bool {
        self.as_array().iter().all(|d| *d > Decimal::ZERO)
    }

    #[must_use]
    pub const fn as_array(&self) -> [Decimal; 3] {
        [self.length, self.width, self.height]
    }
}

/// Physical description of a parcel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSpec {
    pub weight: Decimal,
    #[serde(default)]
    pub weight_unit: WeightUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, alias = "value", skip_serializing_if = "Option::is_none")]
    pub declared_value: Option<Money>,
    #[serde(default)]
    pub fragile: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PackageSpec {
    pub fn new(weight: Decimal, weight_unit: WeightUnit) -> Self {
        Self {
            weight,
            weight_unit,
            dimensions: None,
            declared_value: None,
            fragile: false,
            description: None,
        }
    }

    #[must_use]
    pub const fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    #[must_use]
    pub const fn with_declared_value(mut self, value: Money) -> Self {
        self.declared_value = Some(value);
        self
    }

    #[must_use]
    pub const fn fragile(mut self, fragile: bool) -> Self {
        self.fragile = fragile;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "COD", alias = "cod")]
    Cod,
    #[serde(rename = "Online", alias = "online")]
    Online,
}
