// src/proc/transition.rs

//! Built-in `transition` kind: passes its upstream output through unchanged.

use crate::proc::{OutputValue, Processor, ProduceFuture};

pub const TRANSITION: &str = "transition";

/// Identity node, useful for wiring and for surfacing an intermediate value
/// on its own name. An absent upstream produces `null`.
#[derive(Debug, Clone, Default)]
pub struct TransitionProcessor;

impl TransitionProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Processor for TransitionProcessor {
    fn processor_type(&self) -> &str {
        TRANSITION
    }

    fn produce<'a>(&'a mut self, input: Option<&'a OutputValue>) -> ProduceFuture<'a> {
        Box::pin(async move { Ok(input.cloned().unwrap_or(OutputValue::Null)) })
    }
}
