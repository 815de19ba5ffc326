use phub_booking::BookingError;
use phub_kernel::KernelError;
use phub_pricing::PricingError;
use phub_serviceability::ServiceabilityError;
use std::borrow::Cow;

/// Errors surfaced by [`Engine`](crate::Engine); every variant keeps the class of the slice error it wraps.
#[phub_derive::phub_error]
pub enum EngineError {
    #[class(source)]
    #[error("{source}{}", format_context(.context))]
    Kernel { source: KernelError, context: Option<Cow<'static, str>> },

    #[class(source)]
    #[error("{source}{}", format_context(.context))]
    Serviceability { source: ServiceabilityError, context: Option<Cow<'static, str>> },

    #[class(source)]
    #[error("{source}{}", format_context(.context))]
    Pricing { source: PricingError, context: Option<Cow<'static, str>> },

    #[class(source)]
    #[error("{source}{}", format_context(.context))]
    Booking { source: BookingError, context: Option<Cow<'static, str>> },

    #[error("Internal engine error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
