// src/proc/input_text.rs

//! Built-in `input-text` kind: emits its configured text verbatim.

use crate::config::model::NodeDescriptor;
use crate::errors::{FlowdagError, Result};
use crate::proc::{OutputValue, Processor, ProduceFuture};

pub const INPUT_TEXT: &str = "input-text";

/// Source node for a flow: ignores any upstream and produces the `text`
/// parameter from its descriptor.
#[derive(Debug, Clone)]
pub struct InputTextProcessor {
    text: String,
}

impl InputTextProcessor {
    pub fn from_descriptor(descriptor: &NodeDescriptor) -> Result<Self> {
        let text = descriptor.param_str("text").ok_or_else(|| {
            FlowdagError::ConfigError(format!(
                "node '{}' of type '{INPUT_TEXT}' is missing required parameter 'text'",
                descriptor.name
            ))
        })?;

        Ok(Self {
            text: text.to_string(),
        })
    }
}

impl Processor for InputTextProcessor {
    fn processor_type(&self) -> &str {
        INPUT_TEXT
    }

    fn produce<'a>(&'a mut self, _input: Option<&'a OutputValue>) -> ProduceFuture<'a> {
        Box::pin(async move { Ok(OutputValue::String(self.text.clone())) })
    }
}
