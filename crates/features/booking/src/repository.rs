use crate::error::BookingError;
use crate::machine::Booking;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use phub_domain::booking::BookingId;
use std::fmt::Debug;
use std::sync::Arc;

/// Persistence boundary for bookings.
///
/// The engine relies on two guarantees from an implementation: `save` never
/// overwrites an existing id, and `update` only replaces a booking whose
/// stored version still equals `expected_version`.
pub trait BookingRepository: Debug + Send + Sync + 'static {
    /// Inserts a new booking.
    ///
    /// Fails with [`BookingError::UniquenessConflict`] if the id is taken.
    fn save(&self, booking: Booking) -> impl Future<Output = Result<(), BookingError>> + Send;

    fn load(&self, id: &BookingId) -> impl Future<Output = Result<Option<Booking>, BookingError>> + Send;

    /// Replaces a stored booking (compare-and-swap on version).
    ///
    /// Fails with [`BookingError::NotFound`] for an unknown id and with
    /// [`BookingError::VersionConflict`] if the stored version moved on.
    fn update(
        &self,
        booking: Booking,
        expected_version: u64,
    ) -> impl Future<Output = Result<(), BookingError>> + Send;
}

/// Process-local reference repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingRepository {
    bookings: Arc<RwLock<FxHashMap<BookingId, Booking>>>,
}

impl InMemoryBookingRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bookings.read().len()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<BookingId> {
        let mut ids: Vec<_> = self.bookings.read().keys().cloned().collect();
        ids.sort_unstable();
        ids
    }
}

impl BookingRepository for InMemoryBookingRepository {
    async fn save(&self, booking: Booking) -> Result<(), BookingError> {
        let mut bookings = self.bookings.write();
        if bookings.contains_key(booking.id()) {
            return Err(BookingError::UniquenessConflict {
                message: booking.id().to_string().into(),
                context: Some("In-memory repository".into()),
            });
        }
        bookings.insert(booking.id().clone(), booking);
        Ok(())
    }

    async fn load(&self, id: &BookingId) -> Result<Option<Booking>, BookingError> {
        Ok(self.bookings.read().get(id).cloned())
    }

    async fn update(&self, booking: Booking, expected_version: u64) -> Result<(), BookingError> {
        let mut bookings = self.bookings.write();
        let Some(stored) = bookings.get_mut(booking.id()) else {
            return Err(BookingError::NotFound {
                message: booking.id().to_string().into(),
                context: Some("In-memory repository".into()),
            });
        };
        if stored.version() != expected_version {
            return Err(BookingError::VersionConflict {
                message: format!(
                    "{} is at version {}, expected {expected_version}",
                    booking.id(),
                    stored.version()
                )
                .into(),
                context: None,
            });
        }
        *stored = booking;
        Ok(())
    }
}

impl<R: BookingRepository> BookingRepository for Arc<R> {
    fn save(&self, booking: Booking) -> impl Future<Output = Result<(), BookingError>> + Send {
        (**self).save(booking)
    }

    fn load(&self, id: &BookingId) -> impl Future<Output = Result<Option<Booking>, BookingError>> + Send {
        (**self).load(id)
    }

    fn update(
        &self,
        booking: Booking,
        expected_version: u64,
    ) -> impl Future<Output = Result<(), BookingError>> + Send {
        (**self).update(booking, expected_version)
    }
}
