use phub_kernel::KernelError;
use std::borrow::Cow;

#[phub_derive::phub_error]
pub enum ServiceabilityError {
    #[class(input)]
    #[error("Malformed postal code{}: {source}", format_context(.context))]
    MalformedPostalCode { source: KernelError, context: Option<Cow<'static, str>> },

    #[class(rule)]
    #[error("Unknown location{}: {message}", format_context(.context))]
    UnknownLocation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[class(rule)]
    #[error("Unserviceable origin{}: {message}", format_context(.context))]
    UnserviceableOrigin { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[class(rule)]
    #[error("Unserviceable destination{}: {message}", format_context(.context))]
    UnserviceableDestination { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[class(rule)]
    #[error("Service tier unavailable{}: {message}", format_context(.context))]
    TierUnavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[class(input)]
    #[error("Invalid catalog{}: {source}", format_context(.context))]
    InvalidCatalog { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[class(input)]
    #[error("Invalid location record{}: {message}", format_context(.context))]
    InvalidLocation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Catalog I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal serviceability error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
