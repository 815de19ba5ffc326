//! Verification slice: one-time codes with an explicit lifecycle.
//!
//! Codes are issued with an expiry, consumed exactly once by a matching check,
//! and removed once expired. Callers only see [`OtpStore`], so a shared store
//! can replace the in-process map later without touching them.

#[cfg(feature = "issuance")]
mod code;
mod error;
mod store;

#[cfg(feature = "issuance")]
pub use crate::code::generate_code;
pub use crate::error::{VerificationError, VerificationErrorExt};
pub use crate::store::OtpStore;

use phub_domain::config::VerificationConfig;
use phub_kernel::clock::Clock;
use std::sync::Arc;

/// Initialize the verification slice.
pub fn init(config: &VerificationConfig, clock: Arc<dyn Clock>) -> OtpStore {
    tracing::info!(ttl_seconds = config.otp_ttl_seconds, "Verification slice initialized");
    OtpStore::from_config(config, clock)
}
