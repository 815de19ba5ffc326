//! Serviceability slice: location catalog boundary and route resolution.
//!
//! [`Resolver`] is pure apart from catalog reads and is safe to share across
//! tasks; clones share the same catalog.

mod catalog;
mod error;
mod resolver;

pub use crate::catalog::{InMemoryCatalog, LocationCatalog, validate_record};
pub use crate::error::{ServiceabilityError, ServiceabilityErrorExt};
pub use crate::resolver::{Resolver, TierGating, route_between};

use phub_domain::config::ServiceabilityConfig;

/// Initialize the serviceability slice over a catalog.
pub fn init<C: LocationCatalog>(config: &ServiceabilityConfig, catalog: C) -> Resolver<C> {
    let gating = TierGating::from(config.enforce_tier_gating);
    tracing::info!(?gating, "Serviceability slice initialized");
    Resolver::with_catalog(catalog, gating)
}
