// src/graph/node.rs

//! Node instances and the ordered node set for one batch.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::engine::NodeName;
use crate::proc::{OutputValue, Processor};

/// Shared handle to a node instance.
///
/// The same instance is aliased by the batch being launched and by the
/// session store, so a later targeted launch can reuse it together with its
/// memoized output. The async mutex is held for the duration of a node's
/// `produce` call.
pub type NodeHandle = Arc<Mutex<Node>>;

/// Engine-owned wrapper around one processor.
///
/// Carries the identity and wiring the engine needs (name, input reference,
/// resolved input handle) plus the memoized output; the processor itself
/// stays opaque.
pub struct Node {
    name: NodeName,
    processor_type: String,
    input_ref: Option<NodeName>,
    /// Resolved by the linker; not re-resolved at execution time.
    input: Option<NodeHandle>,
    /// Absent until the first successful execution; overwritten on recompute.
    output: Option<OutputValue>,
    processor: Box<dyn Processor>,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("processor_type", &self.processor_type)
            .field("input_ref", &self.input_ref)
            .field("linked", &self.input.is_some())
            .field("has_output", &self.output.is_some())
            .finish_non_exhaustive()
    }
}

impl Node {
    pub fn new(
        name: NodeName,
        processor_type: String,
        input_ref: Option<NodeName>,
        processor: Box<dyn Processor>,
    ) -> Self {
        Self {
            name,
            processor_type,
            input_ref,
            input: None,
            output: None,
            processor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn processor_type(&self) -> &str {
        &self.processor_type
    }

    /// Name of the upstream node this node consumes, if any.
    pub fn input_ref(&self) -> Option<&str> {
        self.input_ref.as_deref()
    }

    /// The resolved upstream handle, if this node has been linked.
    pub fn input_handle(&self) -> Option<NodeHandle> {
        self.input.clone()
    }

    pub fn set_input_handle(&mut self, handle: NodeHandle) {
        self.input = Some(handle);
    }

    /// Memoized output from the most recent successful execution.
    pub fn output(&self) -> Option<&OutputValue> {
        self.output.as_ref()
    }

    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    /// Execute the processor and memoize its output.
    ///
    /// The caller supplies the upstream value it read through this node's
    /// input handle. On failure the previous memoized output (if any) is left
    /// untouched.
    pub async fn produce(&mut self, input: Option<&OutputValue>) -> anyhow::Result<OutputValue> {
        let output = self.processor.produce(input).await?;
        self.output = Some(output.clone());
        Ok(output)
    }

    /// Best-effort cancellation, delegated to the processor.
    pub fn cancel(&mut self) {
        self.processor.cancel();
    }

    pub fn into_handle(self) -> NodeHandle {
        Arc::new(Mutex::new(self))
    }
}

/// The node instances of one config batch, in declaration order.
#[derive(Debug, Default)]
pub struct NodeSet {
    order: Vec<NodeName>,
    nodes: HashMap<NodeName, NodeHandle>,
}

impl NodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under its name. Names are unique per validated config,
    /// so inserting an existing name replaces the handle without reordering.
    pub fn insert(&mut self, name: NodeName, handle: NodeHandle) {
        if self.nodes.insert(name.clone(), handle).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&NodeHandle> {
        self.nodes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// (name, handle) pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeHandle)> {
        self.order.iter().map(|name| {
            let handle = self
                .nodes
                .get(name)
                .expect("NodeSet order and map out of sync");
            (name.as_str(), handle)
        })
    }
}
