// Routing topics and the topic resolver
//
// Topics are plain routing-key strings bound to a single configured
// exchange. Characters unsuitable in broker routing keys are mapped to
// underscores; normalization is idempotent, so resolving the same
// configuration twice yields identical strings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::reference::FunctionReference;

/// Suffix appended to a function identifier to derive its error topic
pub const ERROR_TOPIC_SUFFIX: &str = "_error";

/// A normalized routing-key string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Normalize a raw configuration string into a routing key.
    pub fn new(raw: &str) -> Self {
        let normalized = raw
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        Topic(normalized)
    }

    /// Get the routing key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The inbound routing destination for a function instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubTopic(Topic);

impl SubTopic {
    pub fn new(raw: &str) -> Self {
        SubTopic(Topic::new(raw))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SubTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The outbound routing destination for a function instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PubTopic(Topic);

impl PubTopic {
    pub fn new(raw: &str) -> Self {
        PubTopic(Topic::new(raw))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PubTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The error channel for a function instance.
///
/// Derived deterministically from the function identifier, so any
/// consumer that knows the identifier can locate the channel without
/// extra coordination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorTopic(Topic);

impl ErrorTopic {
    /// Derive the error topic for a function reference.
    pub fn for_function(reference: &FunctionReference) -> Self {
        ErrorTopic(Topic::new(&format!(
            "{}{}",
            reference.identifier(),
            ERROR_TOPIC_SUFFIX
        )))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ErrorTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The resolved routing destinations for one function instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSet {
    pub subtopic: SubTopic,
    pub pubtopic: PubTopic,
    pub error_topic: ErrorTopic,
}

/// Resolve configuration strings into the three routing destinations.
///
/// Pure and idempotent: the same inputs always produce the same set.
pub fn resolve_topics(subtopic: &str, pubtopic: &str, func: &FunctionReference) -> TopicSet {
    TopicSet {
        subtopic: SubTopic::new(subtopic),
        pubtopic: PubTopic::new(pubtopic),
        error_topic: ErrorTopic::for_function(func),
    }
}
