// Direct in-process transport
//
// The thinnest front end over the invocation pipeline: invoke a
// registered callable with a payload and get its output values back.
// A failed invocation is re-raised to the caller with the captured
// chain attached, unlike the broker path which ships it to the error
// topic.

use serde_json::Value;

use courier_error::EngineResult;
use courier_types::Envelope;

use crate::invocation::{FunctionRegistry, InvocationPipeline, OutputMessage, PipelineOutcome};

/// Direct-call front end for one registered callable.
#[derive(Debug)]
pub struct DirectInvoker {
    pipeline: InvocationPipeline,
}

impl DirectInvoker {
    /// Resolve a reference through the registry and build an invoker.
    pub fn new(registry: &FunctionRegistry, reference: &str) -> EngineResult<Self> {
        let parsed = courier_types::FunctionReference::parse(reference)?;
        let pipeline = InvocationPipeline::from_registry(registry, &parsed)?;
        Ok(DirectInvoker { pipeline })
    }

    /// Invoke with a bare payload and return the output payloads.
    pub fn invoke(&self, data: Value) -> EngineResult<Vec<Value>> {
        let outputs = self.pipeline.invoke(&Envelope::new(data)).into_result()?;
        Ok(outputs
            .into_iter()
            .map(|output| output.envelope.data)
            .collect())
    }

    /// Invoke with a full envelope, keeping scopes and routes visible.
    ///
    /// Used by transports and tests that chain one function's output
    /// into another's input.
    pub fn invoke_envelope(&self, envelope: &Envelope) -> PipelineOutcome {
        self.pipeline.invoke(envelope)
    }

    /// Like `invoke_envelope` but re-raising a failure.
    pub fn invoke_envelope_checked(&self, envelope: &Envelope) -> EngineResult<Vec<OutputMessage>> {
        self.pipeline.invoke(envelope).into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_error::EngineError;
    use serde_json::json;

    #[test]
    fn test_direct_invocation_returns_values() {
        let registry = FunctionRegistry::new();
        registry
            .register_fn("math.rs:product", |_ctx, data| {
                let x = data["x"].as_f64().unwrap_or_default();
                let y = data["y"].as_f64().unwrap_or_default();
                Ok(json!(x * y))
            })
            .unwrap();

        let invoker = DirectInvoker::new(&registry, "math.rs:product").unwrap();
        let values = invoker.invoke(json!({"x": 4, "y": 5})).unwrap();
        assert_eq!(values, vec![json!(20.0)]);
    }

    #[test]
    fn test_direct_invocation_reraises_failure() {
        let registry = FunctionRegistry::new();
        registry
            .register_streaming("math.rs:explode", |_ctx, _data| {
                Err(EngineError::InternalError("kaboom".to_string()))
            })
            .unwrap();

        let invoker = DirectInvoker::new(&registry, "math.rs:explode").unwrap();
        let err = invoker.invoke(json!(null)).unwrap_err();
        assert!(matches!(err, EngineError::InvocationFailed(ref t) if t.contains("kaboom")));
    }
}
