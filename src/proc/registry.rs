// src/proc/registry.rs

//! Type-tag to constructor table.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::config::model::NodeDescriptor;
use crate::errors::{FlowdagError, Result};
use crate::graph::node::Node;
use crate::proc::{Processor, SharedContext};

/// Constructor for one node kind.
///
/// Receives the full descriptor (including opaque params) and the shared
/// per-session context. Pure construction: no I/O happens here.
pub type Constructor =
    Box<dyn Fn(&NodeDescriptor, &SharedContext) -> Result<Box<dyn Processor>> + Send + Sync>;

/// Maps type tags to constructors and builds nodes from descriptors.
pub struct Registry {
    constructors: HashMap<String, Constructor>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// An empty registry. Applications register their own kinds on top.
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// A registry pre-populated with the built-in local kinds.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register(super::input_text::INPUT_TEXT, |descriptor, _ctx| {
            Ok(Box::new(super::InputTextProcessor::from_descriptor(descriptor)?) as Box<dyn Processor>)
        });
        registry.register(super::transition::TRANSITION, |_descriptor, _ctx| {
            Ok(Box::new(super::TransitionProcessor::new()) as Box<dyn Processor>)
        });

        registry
    }

    /// Register a constructor for a type tag. Last registration wins.
    pub fn register<F>(&mut self, type_tag: impl Into<String>, constructor: F)
    where
        F: Fn(&NodeDescriptor, &SharedContext) -> Result<Box<dyn Processor>>
            + Send
            + Sync
            + 'static,
    {
        let type_tag = type_tag.into();
        let replaced = self
            .constructors
            .insert(type_tag.clone(), Box::new(constructor))
            .is_some();

        if replaced {
            debug!(processor_type = %type_tag, "re-registered constructor; last registration wins");
        }
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.constructors.contains_key(type_tag)
    }

    /// Build a single node from a descriptor.
    ///
    /// Fails with `UnknownType` if no constructor is registered for the
    /// descriptor's type tag.
    pub fn create(&self, descriptor: &NodeDescriptor, context: &SharedContext) -> Result<Node> {
        let constructor = self
            .constructors
            .get(&descriptor.processor_type)
            .ok_or_else(|| FlowdagError::UnknownType(descriptor.processor_type.clone()))?;

        let processor = constructor(descriptor, context)?;

        debug!(
            node = %descriptor.name,
            processor_type = %descriptor.processor_type,
            "constructed node"
        );

        Ok(Node::new(
            descriptor.name.clone(),
            descriptor.processor_type.clone(),
            descriptor.input.clone(),
            processor,
        ))
    }
}
