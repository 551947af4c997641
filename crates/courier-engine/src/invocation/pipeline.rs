// Invocation pipeline
//
// Wraps a resolved callable and normalizes its output into an ordered
// sequence of envelopes. Failure is a value, not control flow: the
// outcome carries whatever was emitted before the failure together
// with the formatted failure itself, and the transport decides how to
// ship each.

use std::sync::Arc;

use tracing::debug;

use courier_error::{format_error_chain, EngineError, EngineResult};
use courier_types::{log, Envelope, FunctionReference, PubTopic};

use super::context::Context;
use super::registry::{FunctionRegistry, Invocable};

/// One output envelope paired with its routing override, if any.
#[derive(Debug, Clone)]
pub struct OutputMessage {
    /// The envelope to publish
    pub envelope: Envelope,
    /// Explicit publish topic for this message; the configured
    /// pubtopic applies when absent
    pub route: Option<PubTopic>,
}

/// Result of draining one invocation.
///
/// Output units emitted before a failure remain part of the outcome;
/// at-least-once partial delivery is expected under streaming.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Ordered output messages, one per emitted value
    pub outputs: Vec<OutputMessage>,
    /// Formatted failure chain when the callable failed
    pub failure: Option<String>,
}

impl PipelineOutcome {
    /// Whether the invocation ran to exhaustion without failing.
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Collapse the outcome for a direct caller: the failure, when
    /// present, is re-raised with the captured chain attached.
    pub fn into_result(self) -> EngineResult<Vec<OutputMessage>> {
        match self.failure {
            None => Ok(self.outputs),
            Some(trace) => Err(EngineError::invocation_failed(trace)),
        }
    }
}

/// Drives one callable against inbound envelopes.
pub struct InvocationPipeline {
    function: Arc<dyn Invocable>,
    identifier: String,
}

impl InvocationPipeline {
    /// Create a pipeline around an already-resolved callable.
    pub fn new(function: Arc<dyn Invocable>, reference: &FunctionReference) -> Self {
        InvocationPipeline {
            function,
            identifier: reference.identifier(),
        }
    }

    /// Resolve the reference through the registry and build a pipeline.
    pub fn from_registry(
        registry: &FunctionRegistry,
        reference: &FunctionReference,
    ) -> EngineResult<Self> {
        let function = registry.resolve(reference)?;
        Ok(InvocationPipeline::new(function, reference))
    }

    /// Canonical identifier of the wrapped callable.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Run the callable to exhaustion or failure against one inbound
    /// envelope.
    ///
    /// The inbound scope is rehydrated (or a fresh root created), a hop
    /// record is appended to the inbound log, and every emitted value
    /// becomes exactly one output message carrying the scope that was
    /// current when it was emitted. Values are never filtered: a null
    /// emission still produces a message; only a callable that emits
    /// nothing yields a valid empty stream.
    pub fn invoke(&self, inbound: &Envelope) -> PipelineOutcome {
        let mut ctx = Context::from_envelope(inbound);
        let hop_log = log::append_hop(&inbound.log, &self.identifier);

        let result = self.function.invoke(&mut ctx, inbound.data.clone());

        let outputs = ctx
            .take_emitted()
            .into_iter()
            .map(|emission| OutputMessage {
                envelope: Envelope {
                    data: emission.data,
                    scope: Some(emission.scope),
                    log: hop_log.clone(),
                },
                route: emission.route,
            })
            .collect::<Vec<_>>();

        let failure = result.err().map(|err| {
            let trace = format_error_chain(&err);
            debug!(function = %self.identifier, error = %trace, "invocation failed");
            trace
        });

        debug!(
            function = %self.identifier,
            outputs = outputs.len(),
            success = failure.is_none(),
            "invocation drained"
        );

        PipelineOutcome { outputs, failure }
    }
}

impl std::fmt::Debug for InvocationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationPipeline")
            .field("identifier", &self.identifier)
            .finish()
    }
}
