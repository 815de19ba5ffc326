use crate::error::VerificationError;
use chrono::{DateTime, TimeDelta, Utc};
use fxhash::FxHashMap;
use parking_lot::Mutex;
use phub_domain::config::VerificationConfig;
use phub_kernel::clock::Clock;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
struct PendingCode {
    code: String,
    expires_at: DateTime<Utc>,
}

impl PendingCode {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Process-wide store for short-lived one-time codes.
///
/// An entry lives from `put` until it is consumed by a successful check or
/// found expired. A wrong code leaves the entry in place so the user can retry.
/// Every `put` sweeps expired entries first, so abandoned codes do not pile up.
#[phub_derive::phub_slice]
pub struct OtpStore {
    entries: Mutex<FxHashMap<String, PendingCode>>,
    clock: Arc<dyn Clock>,
    default_ttl: TimeDelta,
}

impl OtpStore {
    pub fn with_clock(clock: Arc<dyn Clock>, default_ttl: TimeDelta) -> Self {
        Self::new(OtpStoreInner { entries: Mutex::default(), clock, default_ttl })
    }

    pub fn from_config(config: &VerificationConfig, clock: Arc<dyn Clock>) -> Self {
        let seconds = i64::try_from(config.otp_ttl_seconds).unwrap_or(i64::MAX);
        let ttl = TimeDelta::try_seconds(seconds).unwrap_or(TimeDelta::MAX);
        Self::with_clock(clock, ttl)
    }

    #[must_use]
    pub fn default_ttl(&self) -> TimeDelta {
        self.default_ttl
    }

    /// Stores `value` under `key`, replacing any earlier code for that key.
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>, ttl: TimeDelta) {
        let now = self.clock.now();
        let expires_at = now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut entries = self.entries.lock();
        let swept = sweep(&mut entries, now);
        if swept > 0 {
            debug!(swept, "Expired verification codes dropped");
        }
        entries.insert(key.into(), PendingCode { code: value.into(), expires_at });
    }

    /// Consumes the code for `key` if it matches and has not expired.
    ///
    /// # Errors
    /// * [`VerificationError::NotRequested`] when nothing is stored for `key`.
    /// * [`VerificationError::Expired`] when the code outlived its TTL; the entry is removed.
    /// * [`VerificationError::Mismatch`] when `value` differs; the entry is kept.
    pub fn verify(&self, key: &str, value: &str) -> Result<(), VerificationError> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        let Some(pending) = entries.get(key) else {
            debug!(key, "Verification without a pending code");
            return Err(VerificationError::NotRequested { message: key.to_owned().into(), context: None });
        };
        if pending.is_expired(now) {
            entries.remove(key);
            debug!(key, "Verification code expired");
            return Err(VerificationError::Expired { message: key.to_owned().into(), context: None });
        }
        if pending.code != value {
            debug!(key, "Verification code mismatch");
            return Err(VerificationError::Mismatch { message: key.to_owned().into(), context: None });
        }
        entries.remove(key);
        Ok(())
    }

    /// Boolean form of [`OtpStore::verify`].
    #[must_use]
    pub fn take_if_valid(&self, key: &str, value: &str) -> bool {
        self.verify(key, value).is_ok()
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        sweep(&mut self.entries.lock(), now)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Draws a fresh code for `key` and stores it with the default TTL.
    ///
    /// # Errors
    /// Returns [`VerificationError::Internal`] if the system RNG is unavailable.
    #[cfg(feature = "issuance")]
    pub fn issue(&self, key: impl Into<String>) -> Result<String, VerificationError> {
        let key = key.into();
        let code = crate::code::generate_code()?;
        self.put(key.as_str(), code.as_str(), self.default_ttl);
        tracing::info!(key = %key, ttl_seconds = self.default_ttl.num_seconds(), "Verification code issued");
        Ok(code)
    }
}

fn sweep(entries: &mut FxHashMap<String, PendingCode>, now: DateTime<Utc>) -> usize {
    let before = entries.len();
    entries.retain(|_, pending| !pending.is_expired(now));
    before - entries.len()
}
