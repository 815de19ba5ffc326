use crate::error::{ServiceabilityError, ServiceabilityErrorExt};
use fxhash::FxHashMap;
use phub_domain::location::{LocationRecord, PostalCode};
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Read-only lookup of postal code records.
///
/// The engine consults the catalog but never writes to it. Implementations
/// must be cheap to call concurrently.
pub trait LocationCatalog: Debug + Send + Sync {
    fn get(&self, code: &PostalCode) -> Option<LocationRecord>;
}

impl<C: LocationCatalog + ?Sized> LocationCatalog for Arc<C> {
    fn get(&self, code: &PostalCode) -> Option<LocationRecord> {
        (**self).get(code)
    }
}

/// Catalog held in memory, typically loaded once from a JSON seed file.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    records: FxHashMap<PostalCode, LocationRecord>,
}

impl InMemoryCatalog {
    /// Builds a catalog from records. A later duplicate replaces an earlier one.
    ///
    /// # Errors
    /// Returns [`ServiceabilityError::InvalidLocation`] for the first record
    /// that fails [`validate_record`].
    pub fn new(records: impl IntoIterator<Item = LocationRecord>) -> Result<Self, ServiceabilityError> {
        let mut catalog = Self::default();
        for record in records {
            catalog.insert(record)?;
        }
        Ok(catalog)
    }

    /// Parses a JSON array of [`LocationRecord`]s.
    ///
    /// # Errors
    /// Returns [`ServiceabilityError::InvalidCatalog`] for malformed JSON or postal codes
    /// and [`ServiceabilityError::InvalidLocation`] for out-of-range record values.
    pub fn from_json_str(raw: &str) -> Result<Self, ServiceabilityError> {
        let records: Vec<LocationRecord> =
            serde_json::from_str(raw).context("Failed to parse location records")?;
        Self::new(records)
    }

    /// Reads and parses a JSON catalog file.
    ///
    /// # Errors
    /// Returns [`ServiceabilityError::Io`] when the file cannot be read and
    /// [`ServiceabilityError::InvalidCatalog`] when it cannot be parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ServiceabilityError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .context(format!("Failed to read catalog {}", path.display()))?;
        let catalog = Self::from_json_str(&raw)?;
        info!(path = %path.display(), locations = catalog.len(), "Location catalog loaded");
        Ok(catalog)
    }

    /// Adds or replaces a record, returning the one it replaced.
    ///
    /// # Errors
    /// Returns [`ServiceabilityError::InvalidLocation`] when the record fails
    /// [`validate_record`]; the catalog is left unchanged.
    pub fn insert(
        &mut self,
        record: LocationRecord,
    ) -> Result<Option<LocationRecord>, ServiceabilityError> {
        validate_record(&record)?;
        let replaced = self.records.insert(record.postal_code.clone(), record);
        if let Some(old) = &replaced {
            warn!(postal_code = %old.postal_code, "Duplicate catalog entry replaced");
        }
        Ok(replaced)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Checks the numeric ranges of a catalog record.
///
/// A record needs at least one delivery day and a non-negative surcharge.
///
/// # Errors
/// Returns [`ServiceabilityError::InvalidLocation`] naming the postal code.
pub fn validate_record(record: &LocationRecord) -> Result<(), ServiceabilityError> {
    if record.delivery_days < 1 {
        return Err(ServiceabilityError::InvalidLocation {
            message: format!("{} must take at least one delivery day", record.postal_code).into(),
            context: None,
        });
    }
    if record.surcharge.is_sign_negative() && !record.surcharge.is_zero() {
        return Err(ServiceabilityError::InvalidLocation {
            message: format!("{} has a negative surcharge {}", record.postal_code, record.surcharge)
                .into(),
            context: None,
        });
    }
    Ok(())
}

impl LocationCatalog for InMemoryCatalog {
    fn get(&self, code: &PostalCode) -> Option<LocationRecord> {
        self.records.get(code).cloned()
    }
}
