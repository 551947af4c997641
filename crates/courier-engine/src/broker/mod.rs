//! AMQP broker transport for the Courier engine
//!
//! Owns the consume loop and the reliability policy around it:
//! publisher confirms, mandatory routing, and bounded-backoff retries
//! for a broker that is still booting or a consumer that is not yet
//! bound.

pub mod adapter;
pub mod retry;

// Re-export key types
pub use adapter::{AdapterState, AmqpAdapter};
pub use retry::RetryPolicy;
