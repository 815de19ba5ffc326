/// Length of an Indian postal code (PIN).
pub const POSTAL_CODE_LEN: usize = 6;

/// Divisor turning a cm³ volume into a volumetric weight in kilograms.
pub const VOLUMETRIC_DIVISOR: u32 = 2700;

/// Fractional digits kept on every monetary amount.
pub const MONEY_SCALE: u32 = 2;

/// Description written on the first tracking entry of every booking.
pub const INITIAL_TRACKING_DESCRIPTION: &str = "Booking created";

/// Description written when a payment confirms a pending booking.
pub const PAYMENT_CONFIRMED_DESCRIPTION: &str = "Payment successful - Order confirmed";

/// Number of digits in a one-time verification code.
pub const OTP_LEN: usize = 6;
