// src/proc/mod.rs

//! Processor capability contract and the built-in local node kinds.
//!
//! A processor is one opaque unit of work: the engine hands it the memoized
//! output of its upstream node (if it has one) and awaits a produced value.
//! Networked kinds (LLM prompts, image generation, transcription, ...) are
//! implemented by the embedding application against the same trait; the
//! built-ins shipped here perform no I/O.
//!
//! - [`registry`] maps type tags to constructors.
//! - [`input_text`] emits a configured text verbatim.
//! - [`transition`] passes its upstream output through unchanged.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

pub mod input_text;
pub mod registry;
pub mod transition;

pub use input_text::InputTextProcessor;
pub use registry::Registry;
pub use transition::TransitionProcessor;

/// The value a processor produces. Flows carry arbitrary JSON.
pub type OutputValue = serde_json::Value;

/// Future returned by [`Processor::produce`].
pub type ProduceFuture<'a> =
    Pin<Box<dyn Future<Output = anyhow::Result<OutputValue>> + Send + 'a>>;

/// Trait abstracting one node kind's domain logic.
///
/// Implementations are free to:
/// - compute locally (built-ins)
/// - perform network or storage I/O (application-provided kinds)
pub trait Processor: Send {
    /// The type tag this processor was registered under.
    fn processor_type(&self) -> &str;

    /// Produce this node's output from the upstream output, if any.
    ///
    /// The engine reads the upstream value through the link-time handle
    /// immediately before calling this, so an upstream that has not produced
    /// yet is observed as `None`.
    fn produce<'a>(&'a mut self, input: Option<&'a OutputValue>) -> ProduceFuture<'a>;

    /// Best-effort cancellation hook, invoked after an in-flight `produce`
    /// future has been dropped. No rollback of partial side effects is
    /// guaranteed.
    fn cancel(&mut self) {}
}

/// Per-session data threaded into constructors that need it (e.g. provider
/// API keys supplied with the client connection).
///
/// The engine never reads this; it only carries it from the transport to the
/// constructors.
#[derive(Debug, Clone, Default)]
pub struct SharedContext {
    api_keys: BTreeMap<String, String>,
}

impl SharedContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, provider: impl Into<String>, key: impl Into<String>) -> Self {
        self.api_keys.insert(provider.into(), key.into());
        self
    }

    pub fn api_key(&self, provider: &str) -> Option<&str> {
        self.api_keys.get(provider).map(String::as_str)
    }
}
