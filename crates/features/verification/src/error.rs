use std::borrow::Cow;

#[phub_derive::phub_error]
pub enum VerificationError {
    #[class(rule)]
    #[error("No code requested{}: {message}", format_context(.context))]
    NotRequested { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[class(rule)]
    #[error("Code expired{}: {message}", format_context(.context))]
    Expired { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[class(input)]
    #[error("Code mismatch{}: {message}", format_context(.context))]
    Mismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Entropy source failures and other unexpected faults.
    #[error("Internal verification error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
