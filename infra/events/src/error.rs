use std::borrow::Cow;

/// Errors that can occur during event bus operations.
#[phub_derive::phub_error]
pub enum EventBusError {
    /// An internal downcast failed. Indicates a broken type registry.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Capacity must be greater than zero.
    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
