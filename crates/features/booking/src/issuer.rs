use phub_domain::booking::BookingId;
use phub_domain::config::BookingConfig;
use phub_kernel::clock::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Issues booking identifiers shaped `<prefix><millis><sequence>`.
///
/// The sequence comes from a single atomic counter, so every call in the
/// process gets a distinct value no matter how many callers race. It is
/// zero-padded to the configured width and simply grows wider once it
/// outgrows it; it never wraps. The timestamp keeps ids from different
/// processes apart and makes them roughly sortable.
#[derive(Debug)]
pub struct IdIssuer {
    prefix: String,
    width: usize,
    sequence: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl IdIssuer {
    pub fn new(prefix: impl Into<String>, width: usize, clock: Arc<dyn Clock>) -> Self {
        Self::with_start(prefix, width, clock, 0)
    }

    /// Starts the sequence after `last_issued`, e.g. when resuming from storage.
    pub fn with_start(
        prefix: impl Into<String>,
        width: usize,
        clock: Arc<dyn Clock>,
        last_issued: u64,
    ) -> Self {
        Self { prefix: prefix.into(), width, sequence: AtomicU64::new(last_issued), clock }
    }

    pub fn from_config(config: &BookingConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(config.id_prefix.clone(), config.id_sequence_width, clock)
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn issue(&self) -> BookingId {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        let millis = self.clock.current_millis();
        BookingId::new(format!("{}{millis}{sequence:0width$}", self.prefix, width = self.width))
    }
}
