// Invocation context handed to user callables
//
// The context is an explicit handle, not ambient state: each inbound
// envelope gets its own context, so concurrent instances never share
// scope mutation.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use courier_error::{EngineError, EngineResult};
use courier_types::{Envelope, PubTopic, ScopeSnapshot};

use crate::scope::ScopeStack;

/// One value produced by a callable, captured with the scope that was
/// current at the moment it was emitted.
#[derive(Debug, Clone)]
pub struct Emission {
    /// The payload value
    pub data: Value,
    /// Scope snapshot as of the emit call
    pub scope: ScopeSnapshot,
    /// Publish-topic override for this value, if any
    pub route: Option<PubTopic>,
}

/// Per-invocation handle threaded through user callables.
///
/// Owns the scope stack and the output buffer; `emit` is the streaming
/// analog of a generator yield.
#[derive(Debug)]
pub struct Context {
    scopes: ScopeStack,
    emitted: Vec<Emission>,
}

impl Context {
    /// Create a context with a fresh root scope, for a root trigger.
    pub fn new() -> Self {
        Context {
            scopes: ScopeStack::new(),
            emitted: Vec::new(),
        }
    }

    /// Create a context for an inbound envelope, rehydrating its scope
    /// when one is present.
    pub fn from_envelope(envelope: &Envelope) -> Self {
        let scopes = match &envelope.scope {
            Some(snapshot) => ScopeStack::rehydrate(snapshot),
            None => ScopeStack::new(),
        };
        Context {
            scopes,
            emitted: Vec::new(),
        }
    }

    /// Create a new scope under the current one and make it current.
    pub fn initiate_scope(&mut self) {
        self.scopes.initiate_scope();
    }

    /// Close the current scope, making its parent current.
    pub fn exit_scope(&mut self) -> EngineResult<()> {
        self.scopes.exit_scope()
    }

    /// Store a value in the current scope.
    pub fn store<T: Serialize>(&mut self, key: &str, value: T) -> EngineResult<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| EngineError::SerializationFailed(format!("failed to store {key}: {e}")))?;
        self.scopes.store(key, value);
        Ok(())
    }

    /// Retrieve a value visible from the current scope, walking up
    /// through ancestors; `None` when the key is absent everywhere or
    /// the stored value does not deserialize to `T`.
    pub fn retrieve<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.scopes
            .retrieve(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Current nesting depth, counting the root as 1.
    pub fn depth(&self) -> usize {
        self.scopes.depth()
    }

    /// Emit one output value, capturing the current scope.
    pub fn emit(&mut self, data: Value) {
        let scope = self.scopes.snapshot();
        self.emitted.push(Emission {
            data,
            scope,
            route: None,
        });
    }

    /// Emit one output value routed to an explicit topic instead of
    /// the configured publish topic.
    pub fn emit_to(&mut self, topic: &str, data: Value) {
        let scope = self.scopes.snapshot();
        self.emitted.push(Emission {
            data,
            scope,
            route: Some(PubTopic::new(topic)),
        });
    }

    /// Drain the emitted values in emission order.
    pub fn take_emitted(&mut self) -> Vec<Emission> {
        std::mem::take(&mut self.emitted)
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_emit_captures_scope_at_emit_time() {
        let mut ctx = Context::new();
        ctx.emit(json!(1));
        ctx.initiate_scope();
        ctx.emit(json!(2));

        let emitted = ctx.take_emitted();
        assert_eq!(emitted.len(), 2);
        assert_eq!(emitted[0].scope.depth(), 1);
        assert_eq!(emitted[1].scope.depth(), 2);
        assert_eq!(emitted[1].scope.parent_id(), Some(&emitted[0].scope.id));
    }

    #[test]
    fn test_store_and_retrieve_typed_values() {
        let mut ctx = Context::new();
        ctx.store("count", 3_u32).unwrap();
        assert_eq!(ctx.retrieve::<u32>("count"), Some(3));
        assert_eq!(ctx.retrieve::<u32>("missing"), None);
    }

    #[test]
    fn test_emit_to_records_route_override() {
        let mut ctx = Context::new();
        ctx.emit_to("side channel", json!(null));

        let emitted = ctx.take_emitted();
        assert_eq!(emitted[0].route.as_ref().unwrap().as_str(), "side_channel");
    }

    #[test]
    fn test_rehydrated_context_sees_upstream_store() {
        let mut upstream = Context::new();
        upstream.store("test_key", "outer scope data").unwrap();
        upstream.emit(json!(null));
        let emission = upstream.take_emitted().remove(0);

        let envelope = Envelope {
            data: json!(null),
            scope: Some(emission.scope),
            log: Vec::new(),
        };
        let downstream = Context::from_envelope(&envelope);
        assert_eq!(
            downstream.retrieve::<String>("test_key").as_deref(),
            Some("outer scope data")
        );
    }
}
