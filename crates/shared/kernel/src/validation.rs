use crate::error::KernelError;
use phub_domain::booking::BookingId;
use phub_domain::location::PostalCode;

/// Boundary checks for identifiers that arrive as free text.
#[derive(Debug)]
pub struct InputGuard;

impl InputGuard {
    /// Parses a six-digit postal code, ignoring surrounding whitespace.
    ///
    /// # Errors
    /// Returns [`KernelError::MalformedPostalCode`] for anything but six ASCII digits.
    pub fn postal_code(raw: impl AsRef<str>) -> Result<PostalCode, KernelError> {
        PostalCode::try_from(raw.as_ref()).map_err(|err| KernelError::MalformedPostalCode {
            message: err.to_string().into(),
            context: None,
        })
    }

    /// Checks that a booking id is `prefix` followed only by digits.
    ///
    /// # Errors
    /// Returns [`KernelError::MalformedBookingId`] when the prefix differs or the tail
    /// is empty or not numeric.
    pub fn booking_id(raw: impl AsRef<str>, prefix: &str) -> Result<BookingId, KernelError> {
        let raw = raw.as_ref().trim();
        let Some(tail) = raw.strip_prefix(prefix) else {
            return Err(KernelError::MalformedBookingId {
                message: format!("Expected prefix '{prefix}', got '{raw}'").into(),
                context: None,
            });
        };
        if tail.is_empty() || !tail.bytes().all(|b| b.is_ascii_digit()) {
            return Err(KernelError::MalformedBookingId {
                message: format!("'{raw}' has a non-numeric tail").into(),
                context: None,
            });
        }
        Ok(BookingId::new(raw))
    }
}
