#![allow(dead_code)]

use serde_json::{Map, Value};

use flowdag::config::{FlowConfig, NodeDescriptor, RawFlowConfig};

/// Builder for `NodeDescriptor` to simplify test setup.
pub struct NodeDescriptorBuilder {
    descriptor: NodeDescriptor,
}

impl NodeDescriptorBuilder {
    pub fn new(name: &str, processor_type: &str) -> Self {
        Self {
            descriptor: NodeDescriptor {
                name: name.to_string(),
                processor_type: processor_type.to_string(),
                input: None,
                params: Map::new(),
            },
        }
    }

    pub fn input(mut self, upstream: &str) -> Self {
        self.descriptor.input = Some(upstream.to_string());
        self
    }

    pub fn param(mut self, key: &str, value: Value) -> Self {
        self.descriptor.params.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> NodeDescriptor {
        self.descriptor
    }
}

/// Builder for `FlowConfig`.
pub struct FlowConfigBuilder {
    raw: RawFlowConfig,
}

impl FlowConfigBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawFlowConfig::default(),
        }
    }

    pub fn with_node(mut self, descriptor: NodeDescriptor) -> Self {
        self.raw.nodes.push(descriptor);
        self
    }

    /// The raw, unvalidated form, for tests exercising validation failures.
    pub fn build_raw(self) -> RawFlowConfig {
        self.raw
    }

    pub fn build(self) -> FlowConfig {
        FlowConfig::try_from(self.raw).expect("Failed to build valid flow config from builder")
    }
}

impl Default for FlowConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for a `const` node emitting the given string.
pub fn const_node(name: &str, value: &str) -> NodeDescriptor {
    NodeDescriptorBuilder::new(name, "const")
        .param("value", Value::String(value.to_string()))
        .build()
}

/// Shorthand for an `upper` node consuming `input`.
pub fn upper_node(name: &str, input: &str) -> NodeDescriptor {
    NodeDescriptorBuilder::new(name, "upper").input(input).build()
}

/// Shorthand for a `fail` node.
pub fn fail_node(name: &str) -> NodeDescriptor {
    NodeDescriptorBuilder::new(name, "fail").build()
}
