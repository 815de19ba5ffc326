//! Facade crate for the `ParcelHub` engine.
//! Re-exports domain/kernel primitives and the feature slices, and wires them
//! into an [`Engine`].
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! ```rust,ignore
//! use phub::{Engine, InMemoryEngine};
//! use phub::serviceability::InMemoryCatalog;
//! use phub::booking::InMemoryBookingRepository;
//!
//! let catalog = InMemoryCatalog::from_json_file("catalog.json")?;
//! let engine: InMemoryEngine = Engine::init(config, catalog, InMemoryBookingRepository::new())?;
//! let record = engine.check("110001")?;
//! ```

mod engine;
mod error;

pub use crate::engine::Engine;
pub use crate::error::{EngineError, EngineErrorExt};
pub use phub_booking as booking;
pub use phub_domain as domain;
pub use phub_event_bus as events;
pub use phub_kernel as kernel;
pub use phub_pricing as pricing;
pub use phub_serviceability as serviceability;
#[cfg(feature = "verification")]
pub use phub_verification as verification;

/// Engine over the in-process catalog and repository.
pub type InMemoryEngine =
    Engine<phub_serviceability::InMemoryCatalog, phub_booking::InMemoryBookingRepository>;

/// Feature registry for runtime introspection.
pub mod features {
    /// Build-time enabled slices (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        "serviceability",
        "pricing",
        "booking",
        #[cfg(feature = "verification")]
        "verification",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}
