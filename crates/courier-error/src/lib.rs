// Courier Error Handling Framework
// Central location for error types, traits, and handling utilities

use std::error::Error as StdError;
use std::fmt;

// Re-export common error handling tools for convenience
pub use thiserror;

// Module structure
mod traits;

// Include sub-modules
mod broker;
mod engine;
mod types;

// Public exports
pub use broker::{BrokerError, BrokerResult};
pub use engine::{EngineError, EngineResult};
pub use traits::Retryable;
pub use types::{TypesError, TypesResult};

/// Error domains representing different components of the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorDomain {
    Types,
    Engine,
    Broker,
}

impl fmt::Display for ErrorDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorDomain::Types => write!(f, "types"),
            ErrorDomain::Engine => write!(f, "engine"),
            ErrorDomain::Broker => write!(f, "broker"),
        }
    }
}

/// Standard Result type using BoxError
pub type Result<T> = std::result::Result<T, BoxError>;
/// Shorthand for a boxed CourierError
pub type BoxError = Box<dyn CourierError>;

/// Base trait for all errors in the Courier system.
pub trait CourierError: StdError + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Returns a unique static string code for this error type.
    fn error_code(&self) -> &'static str;

    /// The domain this error belongs to.
    fn domain(&self) -> ErrorDomain;

    /// Provides a brief description of the error (defaults to Display impl).
    fn description(&self) -> String {
        format!("{}", self)
    }

    /// Converts the error into a boxed trait object.
    fn into_boxed(self) -> Box<dyn CourierError>
    where
        Self: Sized + CourierError,
    {
        Box::new(self)
    }
}

/// Format an error together with its source chain into one string.
///
/// This is the wire representation carried by error envelopes, the
/// closest analog of an embedded stack trace.
pub fn format_error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut formatted = format!("{}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        formatted.push_str("\ncaused by: ");
        formatted.push_str(&cause.to_string());
        source = cause.source();
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_display() {
        assert_eq!(ErrorDomain::Types.to_string(), "types");
        assert_eq!(ErrorDomain::Engine.to_string(), "engine");
        assert_eq!(ErrorDomain::Broker.to_string(), "broker");
    }

    #[test]
    fn test_format_error_chain_flattens_sources() {
        #[derive(Debug, thiserror::Error)]
        #[error("outer failed")]
        struct Outer {
            #[source]
            inner: Inner,
        }

        #[derive(Debug, thiserror::Error)]
        #[error("inner failed")]
        struct Inner;

        let formatted = format_error_chain(&Outer { inner: Inner });
        assert_eq!(formatted, "outer failed\ncaused by: inner failed");
    }
}
