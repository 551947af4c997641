// Core engine functionality for the Courier runtime

// Re-export modules
pub mod broker;
pub mod config;
pub mod direct;
pub mod invocation;
pub mod scope;

// Re-export key types
pub use broker::{AdapterState, AmqpAdapter, RetryPolicy};
pub use config::{Config, Protocol};
pub use direct::DirectInvoker;
pub use invocation::{
    Context, FunctionRegistry, Invocable, InvocationPipeline, OutputMessage, PipelineOutcome,
};
pub use scope::ScopeStack;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
