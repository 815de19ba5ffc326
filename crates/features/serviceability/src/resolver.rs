use crate::catalog::{LocationCatalog, validate_record};
use crate::error::ServiceabilityError;
use chrono::{Days, NaiveDate};
use phub_domain::location::{LocationRecord, PostalCode};
use phub_domain::route::{DeliveryEstimate, RouteInfo};
use phub_domain::tier::ServiceTier;
use phub_kernel::validation::InputGuard;
use tracing::debug;

/// Whether a route must support the requested tier at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierGating {
    Enforce,
    Skip,
}

impl From<bool> for TierGating {
    fn from(enforce: bool) -> Self {
        if enforce { Self::Enforce } else { Self::Skip }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Origin,
    Destination,
}

/// Decides route eligibility from catalog data.
#[phub_derive::phub_slice]
pub struct Resolver<C: LocationCatalog> {
    catalog: C,
    gating: TierGating,
}

impl<C: LocationCatalog> Resolver<C> {
    pub fn with_catalog(catalog: C, gating: TierGating) -> Self {
        Self::new(ResolverInner { catalog, gating })
    }

    #[must_use]
    pub fn gating(&self) -> TierGating {
        self.gating
    }

    #[must_use]
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Resolves a route using the configured tier gating.
    ///
    /// # Errors
    /// * [`ServiceabilityError::UnserviceableOrigin`] / [`ServiceabilityError::UnserviceableDestination`]
    ///   when an endpoint is missing from the catalog or flagged unserviceable.
    /// * [`ServiceabilityError::TierUnavailable`] when gating is enforced and the tier is not
    ///   supported by both endpoints.
    pub fn resolve(
        &self,
        origin: &PostalCode,
        destination: &PostalCode,
        tier: &ServiceTier,
    ) -> Result<RouteInfo, ServiceabilityError> {
        self.resolve_with(origin, destination, tier, self.gating)
    }

    /// Same as [`Resolver::resolve`] with an explicit gating choice for this call.
    ///
    /// # Errors
    /// See [`Resolver::resolve`].
    pub fn resolve_with(
        &self,
        origin: &PostalCode,
        destination: &PostalCode,
        tier: &ServiceTier,
        gating: TierGating,
    ) -> Result<RouteInfo, ServiceabilityError> {
        let (from, to) = self.endpoints(origin, destination)?;
        if gating == TierGating::Enforce {
            ensure_tier(&from, &to, tier)?;
        }
        route_between(&from, &to)
    }

    /// Looks up a single postal code.
    ///
    /// A known but unserviceable code is returned as-is; the report is not an
    /// authorization to book.
    ///
    /// # Errors
    /// * [`ServiceabilityError::MalformedPostalCode`] for anything but six digits.
    /// * [`ServiceabilityError::UnknownLocation`] when the catalog has no entry.
    pub fn check(&self, raw_code: impl AsRef<str>) -> Result<LocationRecord, ServiceabilityError> {
        let code = InputGuard::postal_code(raw_code)?;
        self.catalog.get(&code).ok_or_else(|| {
            debug!(postal_code = %code, "Postal code not in catalog");
            ServiceabilityError::UnknownLocation {
                message: format!("No catalog entry for {code}").into(),
                context: None,
            }
        })
    }

    /// Delivery estimate shown before booking.
    ///
    /// `available_tiers` lists the tiers both endpoints support, sorted. A requested
    /// tier is checked with the configured gating; without one no tier check happens.
    ///
    /// # Errors
    /// Input and rule errors of [`Resolver::check`] and [`Resolver::resolve`], plus
    /// [`ServiceabilityError::Internal`] when the date would overflow the calendar.
    pub fn estimate(
        &self,
        origin: impl AsRef<str>,
        destination: impl AsRef<str>,
        tier: Option<&ServiceTier>,
        today: NaiveDate,
    ) -> Result<DeliveryEstimate, ServiceabilityError> {
        let origin = InputGuard::postal_code(origin)?;
        let destination = InputGuard::postal_code(destination)?;
        let (from, to) = self.endpoints(&origin, &destination)?;

        if let Some(tier) = tier
            && self.gating == TierGating::Enforce
        {
            ensure_tier(&from, &to, tier)?;
        }

        let route = route_between(&from, &to)?;
        let estimated_delivery = today
            .checked_add_days(Days::new(u64::from(route.transit_days)))
            .ok_or_else(|| ServiceabilityError::Internal {
                message: format!("{today} + {} days is out of range", route.transit_days).into(),
                context: Some("Delivery estimate".into()),
            })?;
        let available_tiers =
            from.supported_service_tiers.intersection(&to.supported_service_tiers).cloned().collect();

        Ok(DeliveryEstimate { origin: from, destination: to, route, available_tiers, estimated_delivery })
    }

    fn endpoints(
        &self,
        origin: &PostalCode,
        destination: &PostalCode,
    ) -> Result<(LocationRecord, LocationRecord), ServiceabilityError> {
        let from = self.serviceable(origin, Endpoint::Origin)?;
        let to = self.serviceable(destination, Endpoint::Destination)?;
        Ok((from, to))
    }

    fn serviceable(
        &self,
        code: &PostalCode,
        endpoint: Endpoint,
    ) -> Result<LocationRecord, ServiceabilityError> {
        let reason = match self.catalog.get(code) {
            Some(record) if record.is_serviceable => return Ok(record),
            Some(_) => "not serviceable",
            None => "not in catalog",
        };
        debug!(postal_code = %code, ?endpoint, reason, "Route rejected");

        let message = format!("{code} is {reason}").into();
        Err(match endpoint {
            Endpoint::Origin => ServiceabilityError::UnserviceableOrigin { message, context: None },
            Endpoint::Destination => {
                ServiceabilityError::UnserviceableDestination { message, context: None }
            },
        })
    }
}

fn ensure_tier(
    from: &LocationRecord,
    to: &LocationRecord,
    tier: &ServiceTier,
) -> Result<(), ServiceabilityError> {
    if from.supports(tier) && to.supports(tier) {
        return Ok(());
    }
    debug!(%tier, origin = %from.postal_code, destination = %to.postal_code, "Tier not offered on route");
    Err(ServiceabilityError::TierUnavailable {
        message: format!(
            "'{tier}' is not offered between {} and {}",
            from.postal_code, to.postal_code
        )
        .into(),
        context: None,
    })
}

/// Routing inputs for two serviceable endpoints.
///
/// Transit takes as long as the slower endpoint, surcharges add up, and the
/// delivery-day gap stands in for distance.
///
/// Records are re-checked here since a catalog other than
/// [`crate::InMemoryCatalog`] may hand out anything.
///
/// # Errors
/// Returns [`ServiceabilityError::InvalidLocation`] when either record is out
/// of range or the combined surcharge does not fit a decimal.
pub fn route_between(
    from: &LocationRecord,
    to: &LocationRecord,
) -> Result<RouteInfo, ServiceabilityError> {
    validate_record(from)?;
    validate_record(to)?;
    let surcharge = from.surcharge.checked_add(to.surcharge).ok_or_else(|| {
        ServiceabilityError::InvalidLocation {
            message: format!(
                "surcharges of {} and {} overflow",
                from.postal_code, to.postal_code
            )
            .into(),
            context: Some("Route surcharge".into()),
        }
    })?;

    Ok(RouteInfo {
        transit_days: from.delivery_days.max(to.delivery_days),
        surcharge,
        routing_distance_proxy: from.delivery_days.abs_diff(to.delivery_days),
    })
}
