use phub_kernel::KernelError;
use phub_pricing::PricingError;
use phub_serviceability::ServiceabilityError;
use std::borrow::Cow;

#[phub_derive::phub_error]
pub enum BookingError {
    #[class(input)]
    #[error("Invalid booking details{}: {message}", format_context(.context))]
    InvalidDetails { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[class(rule)]
    #[error("Invalid transition{}: {message}", format_context(.context))]
    InvalidTransition { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[class(rule)]
    #[error("Invalid payment update{}: {message}", format_context(.context))]
    InvalidPaymentUpdate { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[class(rule)]
    #[error("Booking not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[class(contention)]
    #[error("Booking id already taken{}: {message}", format_context(.context))]
    UniquenessConflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[class(contention)]
    #[error("Booking id allocation exhausted{}: {message}", format_context(.context))]
    IdAllocationExhausted { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[class(contention)]
    #[error("Concurrent booking update{}: {message}", format_context(.context))]
    VersionConflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[class(source)]
    #[error("Validation error{}: {source}", format_context(.context))]
    Kernel { source: KernelError, context: Option<Cow<'static, str>> },

    #[class(source)]
    #[error("Serviceability error{}: {source}", format_context(.context))]
    Serviceability { source: ServiceabilityError, context: Option<Cow<'static, str>> },

    #[class(source)]
    #[error("Pricing error{}: {source}", format_context(.context))]
    Pricing { source: PricingError, context: Option<Cow<'static, str>> },

    #[error("Internal booking error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
