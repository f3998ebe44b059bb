// src/config/model.rs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One node of a flow, as submitted by a client.
///
/// This is a direct mapping of the JSON the UI produces:
///
/// ```json
/// [
///   { "name": "a", "processorType": "input-text", "text": "hello" },
///   { "name": "b", "processorType": "transition", "input": "a" }
/// ]
/// ```
///
/// `name`, `processorType` and `input` are the engine's concern; everything
/// else is opaque, type-specific configuration kept in `params` and handed to
/// the registered constructor untouched.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    /// Node name, unique within one flow.
    pub name: String,

    /// Type tag resolved against the registry.
    pub processor_type: String,

    /// Name of the upstream node whose output this node consumes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,

    /// Type-specific fields the engine does not interpret.
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl NodeDescriptor {
    /// Look up an opaque parameter by key.
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Look up an opaque string parameter by key.
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }
}

/// A flow exactly as deserialized, before validation.
///
/// The JSON form is a bare array of descriptors; declaration order is
/// execution order.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RawFlowConfig {
    pub nodes: Vec<NodeDescriptor>,
}

/// A validated flow: node names are unique and the list is non-empty.
///
/// Constructed via `FlowConfig::try_from(raw)`; see [`super::validate`].
#[derive(Debug, Clone)]
pub struct FlowConfig {
    nodes: Vec<NodeDescriptor>,
}

impl FlowConfig {
    /// Construct without re-validating. Only `validate` should call this.
    pub(crate) fn new_unchecked(nodes: Vec<NodeDescriptor>) -> Self {
        Self { nodes }
    }

    /// Descriptors in declaration order.
    pub fn nodes(&self) -> &[NodeDescriptor] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.iter().any(|d| d.name == name)
    }

    /// All node names in this flow.
    pub fn names(&self) -> HashSet<String> {
        self.nodes.iter().map(|d| d.name.clone()).collect()
    }

    /// Names of terminal nodes: nodes no other node consumes as input.
    ///
    /// Returned in declaration order.
    pub fn leaf_names(&self) -> Vec<String> {
        let consumed: HashSet<&str> = self
            .nodes
            .iter()
            .filter_map(|d| d.input.as_deref())
            .collect();

        self.nodes
            .iter()
            .filter(|d| !consumed.contains(d.name.as_str()))
            .map(|d| d.name.clone())
            .collect()
    }
}
