use serde::Serialize;
use std::fmt;

/// Coarse classification of every engine error.
///
/// Callers use it to decide what to do with a failure without matching on
/// slice-specific variants: input errors are reported back verbatim, rule
/// errors are expected outcomes, contention errors may be retried by
/// resubmitting the whole request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorClass {
    Input,
    Rule,
    Contention,
    Internal,
}

impl ErrorClass {
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Contention)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Rule => "rule",
            Self::Contention => "contention",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
