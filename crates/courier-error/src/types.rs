// Types-specific error types
// These errors are specifically for the courier-types crate

use thiserror::Error;

use crate::{CourierError, ErrorDomain};

/// Types-specific error types
#[derive(Error, Debug, Clone)]
pub enum TypesError {
    /// Function reference string does not match the reference grammar
    #[error("Invalid function reference: {0}")]
    InvalidFunctionReference(String),

    /// Inbound message body is not a valid envelope
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Serialization failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),
}

impl CourierError for TypesError {
    fn error_code(&self) -> &'static str {
        match self {
            TypesError::InvalidFunctionReference(_) => "TYPES_INVALID_FUNCTION_REFERENCE",
            TypesError::MalformedEnvelope(_) => "TYPES_MALFORMED_ENVELOPE",
            TypesError::SerializationFailed(_) => "TYPES_SERIALIZATION_FAILED",
        }
    }

    fn domain(&self) -> ErrorDomain {
        ErrorDomain::Types
    }
}

/// Convenient Result type for types operations
pub type TypesResult<T> = Result<T, TypesError>;

/// Convert from types error to boxed error
impl From<TypesError> for Box<dyn CourierError> {
    fn from(err: TypesError) -> Self {
        Box::new(err)
    }
}

impl TypesError {
    /// Create a new invalid function reference error
    pub fn invalid_reference(reference: impl Into<String>) -> Self {
        TypesError::InvalidFunctionReference(reference.into())
    }

    /// Create a new malformed envelope error
    pub fn malformed_envelope(message: impl Into<String>) -> Self {
        TypesError::MalformedEnvelope(message.into())
    }
}
