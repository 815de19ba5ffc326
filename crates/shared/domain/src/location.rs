use crate::constants::POSTAL_CODE_LEN;
use crate::money::Money;
use crate::tier::ServiceTier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Six-digit postal code (PIN). Always well-formed once constructed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

/// Raised when a string is not exactly six ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPostalCode(pub String);

impl fmt::Display for InvalidPostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a {POSTAL_CODE_LEN}-digit postal code", self.0)
    }
}

impl std::error::Error for InvalidPostalCode {}

impl PostalCode {
    #[must_use]
    pub fn is_well_formed(raw: &str) -> bool {
        raw.len() == POSTAL_CODE_LEN && raw.bytes().all(|b| b.is_ascii_digit())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PostalCode {
    type Error = InvalidPostalCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if Self::is_well_formed(trimmed) {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(InvalidPostalCode(value))
        }
    }
}

impl TryFrom<&str> for PostalCode {
    type Error = InvalidPostalCode;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(value.to_owned())
    }
}

impl From<PostalCode> for String {
    fn from(value: PostalCode) -> Self {
        value.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog entry describing one postal code. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub postal_code: PostalCode,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub is_serviceable: bool,
    pub delivery_days: u32,
    #[serde(default)]
    pub surcharge: Money,
    #[serde(default)]
    pub supported_service_tiers: BTreeSet<ServiceTier>,
}

impl LocationRecord {
    #[must_use]
    pub fn supports(&self, tier: &ServiceTier) -> bool {
        self.supported_service_tiers.contains(tier)
    }
}
