// Identity and wire types for the Courier runtime
//
// Everything that crosses a process boundary lives here: scope
// identities, function references, routing topics, and the message
// envelope with its JSON codec. Serialization lives with the types.

pub mod envelope;
pub mod ids;
pub mod log;
pub mod reference;
pub mod topic;

// Re-export key types
pub use envelope::{Envelope, ErrorEnvelope, ScopeSnapshot};
pub use ids::ScopeId;
pub use log::LogRecord;
pub use reference::FunctionReference;
pub use topic::{resolve_topics, ErrorTopic, PubTopic, SubTopic, Topic, TopicSet};
