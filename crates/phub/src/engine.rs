use crate::error::EngineError;
use phub_booking::{Booking, BookingRepository, BookingService, ShipmentDetails};
use phub_domain::config::EngineConfig;
use phub_domain::location::LocationRecord;
use phub_domain::quote::QuoteBreakdown;
use phub_domain::route::DeliveryEstimate;
use phub_domain::tier::ServiceTier;
use phub_event_bus::EventBus;
use phub_kernel::clock::{Clock, SystemClock};
use phub_kernel::validation::InputGuard;
use phub_pricing::{QuoteCalculator, QuoteRequest};
use phub_serviceability::{LocationCatalog, Resolver};
use std::sync::Arc;

/// The assembled engine: every slice wired to one configuration, clock and event bus.
#[phub_derive::phub_slice]
pub struct Engine<C: LocationCatalog, R: BookingRepository> {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    events: EventBus,
    resolver: Resolver<C>,
    calculator: QuoteCalculator,
    bookings: BookingService<C, R>,
    #[cfg(feature = "verification")]
    verification: phub_verification::OtpStore,
}

impl<C: LocationCatalog, R: BookingRepository> Engine<C, R> {
    /// Builds the engine on the system clock.
    ///
    /// # Errors
    /// Returns [`EngineError::Pricing`] when the pricing section is unusable.
    pub fn init(config: EngineConfig, catalog: C, repository: R) -> Result<Self, EngineError> {
        Self::init_with_clock(config, catalog, repository, Arc::new(SystemClock))
    }

    /// # Errors
    /// See [`Engine::init`].
    pub fn init_with_clock(
        config: EngineConfig,
        catalog: C,
        repository: R,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, EngineError> {
        let events = EventBus::new();
        let resolver = phub_serviceability::init(&config.serviceability, catalog);
        let calculator = phub_pricing::init(&config.pricing)?;
        let bookings = phub_booking::init(
            &config.booking,
            resolver.clone(),
            calculator.clone(),
            repository,
            events.clone(),
            Arc::clone(&clock),
        );
        #[cfg(feature = "verification")]
        let verification = phub_verification::init(&config.verification, Arc::clone(&clock));

        tracing::info!(slices = ?crate::features::ENABLED, "Engine initialized");
        Ok(Self::new(EngineInner {
            config,
            clock,
            events,
            resolver,
            calculator,
            bookings,
            #[cfg(feature = "verification")]
            verification,
        }))
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    #[must_use]
    pub fn resolver(&self) -> &Resolver<C> {
        &self.resolver
    }

    #[must_use]
    pub fn calculator(&self) -> &QuoteCalculator {
        &self.calculator
    }

    #[must_use]
    pub fn bookings(&self) -> &BookingService<C, R> {
        &self.bookings
    }

    #[cfg(feature = "verification")]
    #[must_use]
    pub fn verification(&self) -> &phub_verification::OtpStore {
        &self.verification
    }

    /// Serviceability report for a single postal code.
    ///
    /// # Errors
    /// Malformed or unknown codes, see [`Resolver::check`].
    pub fn check(&self, postal_code: &str) -> Result<LocationRecord, EngineError> {
        Ok(self.resolver.check(postal_code)?)
    }

    /// Delivery estimate between two postal codes, counted from today.
    ///
    /// # Errors
    /// See [`Resolver::estimate`].
    pub fn estimate(
        &self,
        origin: &str,
        destination: &str,
        tier: Option<&ServiceTier>,
    ) -> Result<DeliveryEstimate, EngineError> {
        Ok(self.resolver.estimate(origin, destination, tier, self.clock.today())?)
    }

    /// Routes and prices a shipment without booking it.
    ///
    /// # Errors
    /// Malformed postal codes, route rejections and invalid packages.
    pub fn quote(
        &self,
        origin: &str,
        destination: &str,
        request: &QuoteRequest,
    ) -> Result<QuoteBreakdown, EngineError> {
        let origin = InputGuard::postal_code(origin)?;
        let destination = InputGuard::postal_code(destination)?;
        let route = self.resolver.resolve(&origin, &destination, &request.service_tier)?;
        Ok(self.calculator.quote_request(request, &route)?)
    }

    /// Creates a booking. See [`BookingService::create`].
    ///
    /// # Errors
    /// Any creation failure, wrapped as [`EngineError::Booking`].
    pub async fn book(&self, details: ShipmentDetails) -> Result<Booking, EngineError> {
        Ok(self.bookings.create(details).await?)
    }
}
