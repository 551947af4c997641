// Audit-log records carried in message envelopes
//
// Each invocation hop appends exactly one record to the envelope's log
// and forwards the sequence otherwise unchanged, so the log read at any
// point is the call chain that produced the message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One invocation record in the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Unique record ID
    pub id: String,
    /// Identifier of the function that handled this hop
    pub function: String,
    /// The timestamp when the hop executed
    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    /// Create the record for the current hop.
    pub fn new(function: impl Into<String>) -> Self {
        LogRecord {
            id: Uuid::new_v4().to_string(),
            function: function.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Append a hop record to an inbound log, leaving the input untouched.
pub fn append_hop(log: &[LogRecord], function: &str) -> Vec<LogRecord> {
    let mut appended = log.to_vec();
    appended.push(LogRecord::new(function));
    appended
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_hop_preserves_order() {
        let first = append_hop(&[], "upstream.rs:source");
        let second = append_hop(&first, "downstream.rs:sink");

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
        assert_eq!(second[0], first[0]);
        assert_eq!(second[1].function, "downstream.rs:sink");
    }

    #[test]
    fn test_records_get_unique_ids() {
        let log = append_hop(&append_hop(&[], "f.rs:a"), "f.rs:a");
        assert_ne!(log[0].id, log[1].id);
    }
}
