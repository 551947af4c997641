// Message envelope wire format
//
// The unit of communication between invocations:
// `{ "data": <any>, "scope": {"id", "parent", ...} | null, "log": [...] }`.
// Only structural scope identity plus scope-local stored data cross the
// wire; the live scope tree stays with the owning process.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use courier_error::{TypesError, TypesResult};

use crate::ids::ScopeId;
use crate::log::LogRecord;

/// Serialized scope identity at the time of send.
///
/// Snapshots are taken by value: mutating the live scope after a
/// snapshot was captured never alters the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeSnapshot {
    /// Identifier of the scope this snapshot was taken from
    pub id: ScopeId,
    /// Snapshot of the enclosing scope, or `None` for a root
    pub parent: Option<Box<ScopeSnapshot>>,
    /// Scope-local stored data; omitted from the wire when empty
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub data: HashMap<String, Value>,
}

impl ScopeSnapshot {
    /// Distance to the root, counting the root as depth 1.
    pub fn depth(&self) -> usize {
        match &self.parent {
            Some(parent) => 1 + parent.depth(),
            None => 1,
        }
    }

    /// Identifier of the parent scope, if any.
    pub fn parent_id(&self) -> Option<&ScopeId> {
        self.parent.as_ref().map(|p| &p.id)
    }
}

/// The unit of communication between invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Payload produced by or passed into a callable
    #[serde(default)]
    pub data: Value,
    /// Scope identity at the time of send
    #[serde(default)]
    pub scope: Option<ScopeSnapshot>,
    /// Append-only audit trail across the call chain
    #[serde(default)]
    pub log: Vec<LogRecord>,
}

impl Envelope {
    /// Build an envelope around a bare payload.
    pub fn new(data: Value) -> Self {
        Envelope {
            data,
            scope: None,
            log: Vec::new(),
        }
    }

    /// Decode an envelope from a raw message body.
    ///
    /// Absent `scope` and `log` fields are tolerated; anything that is
    /// not a JSON object fails with `MalformedEnvelope`.
    pub fn decode(body: &[u8]) -> TypesResult<Self> {
        serde_json::from_slice(body).map_err(|err| TypesError::malformed_envelope(err.to_string()))
    }

    /// Encode the envelope for the wire.
    pub fn encode(&self) -> TypesResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|err| TypesError::SerializationFailed(err.to_string()))
    }

    /// Look up a dotted path inside the payload, `"x.y"` style.
    ///
    /// Array segments may be numeric indices. Absent paths return
    /// `None` rather than an error.
    pub fn data_at(&self, path: &str) -> Option<&Value> {
        path.split('.').try_fold(&self.data, |value, segment| match value {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }
}

/// The error wire format, published to a function's error topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Formatted failure chain from the failed invocation
    pub error: String,
}

impl ErrorEnvelope {
    /// Build an error envelope around a formatted failure.
    pub fn new(error: impl Into<String>) -> Self {
        ErrorEnvelope {
            error: error.into(),
        }
    }

    /// Decode an error envelope from a raw message body.
    pub fn decode(body: &[u8]) -> TypesResult<Self> {
        serde_json::from_slice(body).map_err(|err| TypesError::malformed_envelope(err.to_string()))
    }

    /// Encode the error envelope for the wire.
    pub fn encode(&self) -> TypesResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|err| TypesError::SerializationFailed(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_tolerates_missing_fields() {
        let envelope = Envelope::decode(br#"{"data": {"x": 4, "y": 5}}"#).unwrap();
        assert_eq!(envelope.data["x"], 4);
        assert!(envelope.scope.is_none());
        assert!(envelope.log.is_empty());
    }

    #[test]
    fn test_decode_rejects_non_envelope_bodies() {
        assert!(Envelope::decode(b"not json").is_err());
        assert!(Envelope::decode(b"[1, 2, 3]").is_err());
    }

    #[test]
    fn test_encode_always_writes_all_fields() {
        let body = Envelope::new(json!(20.0)).encode().unwrap();
        let raw: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(raw["data"], 20.0);
        assert_eq!(raw["scope"], Value::Null);
        assert_eq!(raw["log"], json!([]));
    }

    #[test]
    fn test_scope_wire_shape_omits_empty_store() {
        let snapshot = ScopeSnapshot {
            id: ScopeId::from("outer"),
            parent: None,
            data: HashMap::new(),
        };
        let raw = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(raw, json!({"id": "outer", "parent": null}));
    }

    #[test]
    fn test_snapshot_depth_counts_root_as_one() {
        let nested = ScopeSnapshot {
            id: ScopeId::from("inner"),
            parent: Some(Box::new(ScopeSnapshot {
                id: ScopeId::from("outer"),
                parent: None,
                data: HashMap::new(),
            })),
            data: HashMap::new(),
        };
        assert_eq!(nested.depth(), 2);
        assert_eq!(nested.parent_id().unwrap().as_str(), "outer");
    }

    #[test]
    fn test_data_at_walks_nested_paths() {
        let envelope = Envelope::new(json!({"a": {"b": [10, {"c": "found"}]}}));
        assert_eq!(envelope.data_at("a.b.1.c"), Some(&json!("found")));
        assert_eq!(envelope.data_at("a.missing"), None);
    }

    #[test]
    fn test_error_envelope_roundtrip() {
        let body = ErrorEnvelope::new("boom\ncaused by: io").encode().unwrap();
        let decoded = ErrorEnvelope::decode(&body).unwrap();
        assert!(decoded.error.starts_with("boom"));
    }
}
