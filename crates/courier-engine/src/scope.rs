// Scope stack for nested invocation context
//
// A scope is a node in a parent-linked tree. Depth navigation
// (initiate/exit) is deliberately decoupled from data visibility
// (store/retrieve with ancestor fallback): descendants can read
// configuration or correlation data set by an ancestor without
// parameter threading, while sibling branches stay isolated.

use std::collections::HashMap;

use serde_json::Value;

use courier_error::{EngineError, EngineResult};
use courier_types::{ScopeId, ScopeSnapshot};

/// One level of nested invocation context.
#[derive(Debug, Clone)]
pub struct Scope {
    id: ScopeId,
    parent: Option<Box<Scope>>,
    store: HashMap<String, Value>,
}

impl Scope {
    fn root() -> Self {
        Scope {
            id: ScopeId::generate(),
            parent: None,
            store: HashMap::new(),
        }
    }

    fn from_snapshot(snapshot: &ScopeSnapshot) -> Self {
        Scope {
            id: snapshot.id.clone(),
            parent: snapshot
                .parent
                .as_ref()
                .map(|parent| Box::new(Scope::from_snapshot(parent))),
            store: snapshot.data.clone(),
        }
    }

    fn snapshot(&self) -> ScopeSnapshot {
        ScopeSnapshot {
            id: self.id.clone(),
            parent: self.parent.as_ref().map(|parent| Box::new(parent.snapshot())),
            data: self.store.clone(),
        }
    }
}

/// The per-invocation stack of nested scopes.
///
/// Every invocation owns exactly one stack: fresh for a root trigger,
/// rehydrated from the inbound envelope otherwise. The stack is
/// discarded when the invocation finishes, so no locking is needed
/// around mutation.
#[derive(Debug)]
pub struct ScopeStack {
    current: Scope,
}

impl ScopeStack {
    /// Create a stack with a fresh root scope.
    pub fn new() -> Self {
        ScopeStack {
            current: Scope::root(),
        }
    }

    /// Rebuild a stack from a serialized scope crossing the wire.
    pub fn rehydrate(snapshot: &ScopeSnapshot) -> Self {
        ScopeStack {
            current: Scope::from_snapshot(snapshot),
        }
    }

    /// Identifier of the current scope.
    pub fn current_id(&self) -> &ScopeId {
        &self.current.id
    }

    /// Create a new scope under the current one and make it current.
    pub fn initiate_scope(&mut self) {
        let parent = std::mem::replace(&mut self.current, Scope::root());
        self.current.parent = Some(Box::new(parent));
    }

    /// Close the current scope, making its parent current.
    ///
    /// Fails with `InvalidScopeTransition` when the current scope is a
    /// root.
    pub fn exit_scope(&mut self) -> EngineResult<()> {
        match self.current.parent.take() {
            Some(parent) => {
                self.current = *parent;
                Ok(())
            }
            None => Err(EngineError::invalid_scope_transition(format!(
                "cannot exit root scope {}",
                self.current.id
            ))),
        }
    }

    /// Write into the current scope's local store.
    ///
    /// Overwrites an existing value for the key in this scope without
    /// touching ancestor stores.
    pub fn store(&mut self, key: impl Into<String>, value: Value) {
        self.current.store.insert(key.into(), value);
    }

    /// Look up a key starting at the current scope and walking up
    /// through parents; the nearest match wins. An absent key is
    /// `None`, not an error.
    pub fn retrieve(&self, key: &str) -> Option<&Value> {
        let mut scope = Some(&self.current);
        while let Some(node) = scope {
            if let Some(value) = node.store.get(key) {
                return Some(value);
            }
            scope = node.parent.as_deref();
        }
        None
    }

    /// Current nesting depth, counting the root as 1.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut scope = &self.current;
        while let Some(parent) = scope.parent.as_deref() {
            depth += 1;
            scope = parent;
        }
        depth
    }

    /// Capture the current scope chain by value.
    pub fn snapshot(&self) -> ScopeSnapshot {
        self.current.snapshot()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        ScopeStack::new()
    }
}
