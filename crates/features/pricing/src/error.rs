use std::borrow::Cow;

#[phub_derive::phub_error]
pub enum PricingError {
    #[class(input)]
    #[error("Invalid package{}: {message}", format_context(.context))]
    InvalidPackageSpec { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[class(input)]
    #[error("Invalid route{}: {message}", format_context(.context))]
    InvalidRoute { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[class(rule)]
    #[error("Coupon rejected{}: {message}", format_context(.context))]
    CouponRejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid pricing configuration{}: {message}", format_context(.context))]
    InvalidConfig { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal pricing error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
