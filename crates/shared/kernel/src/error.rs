use std::borrow::Cow;

#[phub_derive::phub_error]
pub enum KernelError {
    #[class(input)]
    #[error("Malformed postal code{}: {message}", format_context(.context))]
    MalformedPostalCode { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[class(input)]
    #[error("Malformed booking id{}: {message}", format_context(.context))]
    MalformedBookingId { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}
