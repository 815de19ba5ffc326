use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Named delivery class (`surface`, `air`, `express`, ...).
///
/// Tiers are configuration, not a closed enum: the rate table decides which
/// tags exist. Tags are stored trimmed and lower-cased so `"Air"` and `"air"`
/// refer to the same tier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ServiceTier(String);

impl ServiceTier {
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(tag.as_ref().trim().to_ascii_lowercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ServiceTier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

impl From<&str> for ServiceTier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ServiceTier {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl Borrow<str> for ServiceTier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_normalised() {
        assert_eq!(ServiceTier::new(" Air "), ServiceTier::new("air"));
        let tier: ServiceTier = serde_json::from_str("\"EXPRESS\"").unwrap();
        assert_eq!(tier.as_str(), "express");
    }
}
