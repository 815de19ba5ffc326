//! # Event Bus
//!
//! Type-indexed fan-out channels connecting the engine to whoever wants to hear
//! about bookings (notifiers, audit sinks, the CLI).
//!
//! Each event type gets one lazily created `tokio::sync::broadcast` channel.
//! Publishing never blocks and never waits for subscribers: with nobody
//! listening an event is simply dropped, which is what a notification
//! boundary needs.
//!
//! # Example
//!
//! ```rust
//! use phub_event_bus::{EventBus, EventReceiverExt, EventBusError};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct ParcelPicked { id: u64 }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), EventBusError> {
//!     let bus = EventBus::new();
//!
//!     let mut rx = bus.subscribe::<ParcelPicked>()?;
//!     bus.publish(ParcelPicked { id: 42 })?;
//!
//!     assert_eq!(rx.next_event().await.map(|e| e.id), Some(42));
//!     Ok(())
//! }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{Event, EventBus};
pub use error::{EventBusError, EventBusErrorExt};
pub use receiver::EventReceiverExt;
