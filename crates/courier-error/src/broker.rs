// Broker-specific error types
// These errors are specifically for the broker adapter

use std::time::Duration;

use thiserror::Error;

use crate::types::TypesError;
use crate::{CourierError, ErrorDomain, Retryable};

/// Broker-specific error types
#[derive(Error, Debug, Clone)]
pub enum BrokerError {
    /// Broker not ready or message momentarily unroutable; safe to retry
    #[error("Transient broker error: {0}")]
    Transient(String),

    /// Failed to establish the connection or channel
    #[error("Broker connection failed: {0}")]
    Connect(String),

    /// Queue/exchange declaration or binding failed
    #[error("Broker declaration failed: {0}")]
    Declare(String),

    /// Publish failed for a non-transient reason
    #[error("Publish failed: {0}")]
    Publish(String),

    /// Consume stream failed
    #[error("Consume failed: {0}")]
    Consume(String),

    /// Retry budget exhausted; carries the last observed error
    #[error("Broker retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    /// Envelope could not be serialized for the wire
    #[error("Encoding failed: {0}")]
    Encoding(String),
}

impl CourierError for BrokerError {
    fn error_code(&self) -> &'static str {
        match self {
            BrokerError::Transient(_) => "BROKER_TRANSIENT",
            BrokerError::Connect(_) => "BROKER_CONNECT",
            BrokerError::Declare(_) => "BROKER_DECLARE",
            BrokerError::Publish(_) => "BROKER_PUBLISH",
            BrokerError::Consume(_) => "BROKER_CONSUME",
            BrokerError::RetriesExhausted { .. } => "BROKER_RETRIES_EXHAUSTED",
            BrokerError::Encoding(_) => "BROKER_ENCODING",
        }
    }

    fn domain(&self) -> ErrorDomain {
        ErrorDomain::Broker
    }
}

impl Retryable for BrokerError {
    fn is_retryable(&self) -> bool {
        matches!(self, BrokerError::Transient(_))
    }

    fn retry_after(&self) -> Option<Duration> {
        if self.is_retryable() {
            Some(Duration::from_millis(500))
        } else {
            None
        }
    }
}

/// Convenient Result type for broker operations
pub type BrokerResult<T> = Result<T, BrokerError>;

/// Convert from broker error to boxed error
impl From<BrokerError> for Box<dyn CourierError> {
    fn from(err: BrokerError) -> Self {
        Box::new(err)
    }
}

impl From<TypesError> for BrokerError {
    fn from(err: TypesError) -> Self {
        BrokerError::Encoding(err.to_string())
    }
}

impl BrokerError {
    /// Create a new transient error
    pub fn transient(message: impl Into<String>) -> Self {
        BrokerError::Transient(message.into())
    }

    /// Create a new retries-exhausted error
    pub fn retries_exhausted(attempts: u32, last: impl Into<String>) -> Self {
        BrokerError::RetriesExhausted {
            attempts,
            last: last.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transient_errors_retry() {
        assert!(BrokerError::transient("booting").is_retryable());
        assert!(!BrokerError::Publish("bad exchange".to_string()).is_retryable());
        assert!(!BrokerError::retries_exhausted(10, "unroutable").is_retryable());
    }

    #[test]
    fn test_retry_after_only_for_retryable() {
        assert!(BrokerError::transient("booting").retry_after().is_some());
        assert!(BrokerError::Connect("refused".to_string()).retry_after().is_none());
    }
}
