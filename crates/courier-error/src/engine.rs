// Engine-specific error types
// These errors are specifically for the courier-engine crate

use thiserror::Error;

use crate::types::TypesError;
use crate::{CourierError, ErrorDomain};

/// Engine-specific error types
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    /// exit_scope called on a scope with no parent
    #[error("Invalid scope transition: {0}")]
    InvalidScopeTransition(String),

    /// User code failed during invocation; payload is the formatted
    /// error chain published to the error topic
    #[error("Invocation failed: {0}")]
    InvocationFailed(String),

    /// No callable registered under the given reference
    #[error("Function not found: {0}")]
    FunctionNotFound(String),

    /// Configuration rejected at startup
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Registry operation error
    #[error("Registry error: {0}")]
    RegistryError(String),

    /// Invalid function reference (carried up from parsing)
    #[error("Invalid function reference: {0}")]
    InvalidFunctionReference(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl CourierError for EngineError {
    fn error_code(&self) -> &'static str {
        match self {
            EngineError::InvalidScopeTransition(_) => "ENGINE_INVALID_SCOPE_TRANSITION",
            EngineError::InvocationFailed(_) => "ENGINE_INVOCATION_FAILED",
            EngineError::FunctionNotFound(_) => "ENGINE_FUNCTION_NOT_FOUND",
            EngineError::InvalidConfig(_) => "ENGINE_INVALID_CONFIG",
            EngineError::SerializationFailed(_) => "ENGINE_SERIALIZATION_FAILED",
            EngineError::RegistryError(_) => "ENGINE_REGISTRY_ERROR",
            EngineError::InvalidFunctionReference(_) => "ENGINE_INVALID_FUNCTION_REFERENCE",
            EngineError::InternalError(_) => "ENGINE_INTERNAL_ERROR",
        }
    }

    fn domain(&self) -> ErrorDomain {
        ErrorDomain::Engine
    }
}

/// Convenient Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Convert from engine error to boxed error
impl From<EngineError> for Box<dyn CourierError> {
    fn from(err: EngineError) -> Self {
        Box::new(err)
    }
}

impl From<TypesError> for EngineError {
    fn from(err: TypesError) -> Self {
        match err {
            TypesError::InvalidFunctionReference(reference) => {
                EngineError::InvalidFunctionReference(reference)
            }
            other => EngineError::SerializationFailed(other.to_string()),
        }
    }
}

impl EngineError {
    /// Create a new invalid scope transition error
    pub fn invalid_scope_transition(message: impl Into<String>) -> Self {
        EngineError::InvalidScopeTransition(message.into())
    }

    /// Create a new invocation failure carrying the formatted chain
    pub fn invocation_failed(trace: impl Into<String>) -> Self {
        EngineError::InvocationFailed(trace.into())
    }

    /// Create a new function not found error
    pub fn function_not_found(reference: impl Into<String>) -> Self {
        EngineError::FunctionNotFound(reference.into())
    }

    /// Create a new invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        EngineError::InvalidConfig(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_error_conversion_keeps_reference() {
        let err: EngineError = TypesError::invalid_reference("not-a-ref").into();
        assert!(matches!(err, EngineError::InvalidFunctionReference(ref r) if r == "not-a-ref"));
    }

    #[test]
    fn test_error_codes_are_domain_prefixed() {
        let err = EngineError::invalid_scope_transition("root");
        assert_eq!(err.error_code(), "ENGINE_INVALID_SCOPE_TRANSITION");
        assert_eq!(err.domain(), ErrorDomain::Engine);
    }
}
