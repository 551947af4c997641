// Function registry
//
// This module provides functionality for registering callables and
// resolving function references to them during invocation. It replaces
// filesystem-based dynamic loading with an explicit registration table;
// the pipeline never depends on how a callable came to exist.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use courier_error::{EngineError, EngineResult};
use courier_types::FunctionReference;

use super::context::Context;

/// A callable the runtime can drive.
///
/// Streaming callables emit any number of values through the context;
/// scalar callables are adapted by `FunctionRegistry::register_fn` so
/// both share one code path in the pipeline.
pub trait Invocable: Send + Sync {
    /// Run the callable against one inbound payload.
    fn invoke(&self, ctx: &mut Context, data: Value) -> EngineResult<()>;
}

impl std::fmt::Debug for dyn Invocable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Invocable")
    }
}

struct ScalarFn<F>(F);

impl<F> Invocable for ScalarFn<F>
where
    F: Fn(&mut Context, Value) -> EngineResult<Value> + Send + Sync,
{
    fn invoke(&self, ctx: &mut Context, data: Value) -> EngineResult<()> {
        let result = (self.0)(ctx, data)?;
        ctx.emit(result);
        Ok(())
    }
}

struct StreamingFn<F>(F);

impl<F> Invocable for StreamingFn<F>
where
    F: Fn(&mut Context, Value) -> EngineResult<()> + Send + Sync,
{
    fn invoke(&self, ctx: &mut Context, data: Value) -> EngineResult<()> {
        (self.0)(ctx, data)
    }
}

/// Registry mapping canonical function references to callables.
#[derive(Default)]
pub struct FunctionRegistry {
    /// Registered callables by canonical reference string
    functions: RwLock<HashMap<String, Arc<dyn Invocable>>>,
}

impl FunctionRegistry {
    /// Create a new function registry
    pub fn new() -> Self {
        FunctionRegistry {
            functions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a callable under a reference string.
    ///
    /// The reference must parse; registering the same reference twice
    /// is an error.
    pub fn register(
        &self,
        reference: &str,
        function: Arc<dyn Invocable>,
    ) -> EngineResult<FunctionReference> {
        let parsed = FunctionReference::parse(reference)?;
        let identifier = parsed.identifier();

        let mut functions = self.functions.write().map_err(|_| {
            EngineError::InternalError("failed to acquire write lock on functions".to_string())
        })?;

        if functions.contains_key(&identifier) {
            return Err(EngineError::RegistryError(format!(
                "function '{}' already registered",
                identifier
            )));
        }

        functions.insert(identifier, function);
        Ok(parsed)
    }

    /// Register a scalar callable; its return value becomes a
    /// one-element stream.
    pub fn register_fn<F>(&self, reference: &str, function: F) -> EngineResult<FunctionReference>
    where
        F: Fn(&mut Context, Value) -> EngineResult<Value> + Send + Sync + 'static,
    {
        self.register(reference, Arc::new(ScalarFn(function)))
    }

    /// Register a streaming callable that emits through the context.
    pub fn register_streaming<F>(
        &self,
        reference: &str,
        function: F,
    ) -> EngineResult<FunctionReference>
    where
        F: Fn(&mut Context, Value) -> EngineResult<()> + Send + Sync + 'static,
    {
        self.register(reference, Arc::new(StreamingFn(function)))
    }

    /// Resolve a reference to its registered callable.
    pub fn resolve(&self, reference: &FunctionReference) -> EngineResult<Arc<dyn Invocable>> {
        let functions = self.functions.read().map_err(|_| {
            EngineError::InternalError("failed to acquire read lock on functions".to_string())
        })?;

        functions
            .get(&reference.identifier())
            .cloned()
            .ok_or_else(|| EngineError::function_not_found(reference.identifier()))
    }

    /// Count the number of registered callables
    pub fn count(&self) -> EngineResult<usize> {
        let functions = self.functions.read().map_err(|_| {
            EngineError::InternalError("failed to acquire read lock on functions".to_string())
        })?;

        Ok(functions.len())
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.count().unwrap_or(0);
        f.debug_struct("FunctionRegistry").field("functions", &count).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_and_resolve() {
        let registry = FunctionRegistry::new();
        assert_eq!(registry.count().unwrap(), 0);

        let reference = registry
            .register_fn("math.rs:double", |_ctx, data| {
                Ok(json!(data.as_f64().unwrap_or(0.0) * 2.0))
            })
            .unwrap();

        assert_eq!(registry.count().unwrap(), 1);
        assert!(registry.resolve(&reference).is_ok());
    }

    #[test]
    fn test_resolve_unregistered_reference_fails() {
        let registry = FunctionRegistry::new();
        let reference = FunctionReference::parse("math.rs:missing").unwrap();
        let err = registry.resolve(&reference).unwrap_err();
        assert!(matches!(err, EngineError::FunctionNotFound(_)));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let registry = FunctionRegistry::new();
        registry.register_fn("math.rs:id", |_ctx, data| Ok(data)).unwrap();
        let err = registry.register_fn("math.rs:id", |_ctx, data| Ok(data)).unwrap_err();
        assert!(matches!(err, EngineError::RegistryError(_)));
    }

    #[test]
    fn test_malformed_reference_rejected_at_registration() {
        let registry = FunctionRegistry::new();
        let err = registry.register_fn("not a reference", |_ctx, data| Ok(data)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidFunctionReference(_)));
    }

    #[test]
    fn test_scalar_adapter_emits_once() {
        let registry = FunctionRegistry::new();
        let reference = registry
            .register_fn("math.rs:answer", |_ctx, _data| Ok(json!(42)))
            .unwrap();

        let function = registry.resolve(&reference).unwrap();
        let mut ctx = Context::new();
        function.invoke(&mut ctx, json!(null)).unwrap();

        let emitted = ctx.take_emitted();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].data, json!(42));
    }
}
