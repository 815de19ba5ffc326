use phub_derive::phub_error;
use phub_domain::error::ErrorClass;
use std::borrow::Cow;

#[phub_error]
pub enum RouteError {
    #[class(input)]
    #[error("Malformed code{}: {message}", format_context(.context))]
    Malformed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[class(rule)]
    #[error("Unserviceable{}: {message}", format_context(.context))]
    Unserviceable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let err = RouteError::Unserviceable { message: "826004".into(), context: None };
    assert_eq!(err.class(), ErrorClass::Rule);

    let err: RouteError = "unexpected".into();
    assert_eq!(err.class(), ErrorClass::Internal);

    let err = Err::<(), _>(RouteError::Malformed { message: "12".into(), context: None })
        .context("origin")
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Input);
    assert_eq!(err.to_string(), "Malformed code (origin): 12");

    wrapping::check();
}

mod wrapping {
    use super::RouteError;
    use phub_derive::phub_error;
    use std::borrow::Cow;

    #[phub_error]
    pub enum BookingFlowError {
        #[class(source)]
        #[error("Route error{}: {source}", format_context(.context))]
        Route { source: RouteError, context: Option<Cow<'static, str>> },

        #[class(contention)]
        #[error("Conflict{}: {message}", format_context(.context))]
        Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    }

    pub fn check() {
        let inner = RouteError::Unserviceable { message: "x".into(), context: None };
        let outer = BookingFlowError::from(inner);
        assert_eq!(outer.class(), phub_domain::error::ErrorClass::Rule);
        assert!(outer.to_string().starts_with("Route error: Unserviceable"));
    }
}
