//! Invocation system for the Courier engine
//!
//! This module provides the invocation system for the Courier engine:
//! the per-invocation context handle handed to user callables, the
//! registry resolving function references to callables, and the
//! pipeline normalizing scalar and streaming results into an ordered
//! sequence of output envelopes.

pub mod context;
pub mod pipeline;
pub mod registry;

// Re-export key types
pub use context::{Context, Emission};
pub use pipeline::{InvocationPipeline, OutputMessage, PipelineOutcome};
pub use registry::{FunctionRegistry, Invocable};
