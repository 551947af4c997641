// Scope identity

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unique identifier for a scope node.
///
/// Assigned once at scope creation and immutable afterwards; equality
/// of two snapshots' ids is what correlates scopes across processes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeId(String);

impl ScopeId {
    /// Mint a fresh identifier
    pub fn generate() -> Self {
        ScopeId(Uuid::new_v4().to_string())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ScopeId {
    fn from(id: String) -> Self {
        ScopeId(id)
    }
}

impl From<&str> for ScopeId {
    fn from(id: &str) -> Self {
        ScopeId(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(ScopeId::generate(), ScopeId::generate());
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = ScopeId::from("abc-123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc-123\"");
    }
}
