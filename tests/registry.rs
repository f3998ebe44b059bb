// tests/registry.rs

//! Registry contract: registration, lookup, context threading.

mod common;
use crate::common::init_tracing;

use serde_json::{json, Value};

use flowdag::errors::FlowdagError;
use flowdag::proc::{OutputValue, Processor, ProduceFuture, Registry, SharedContext};
use flowdag_test_utils::builders::NodeDescriptorBuilder;

struct EchoProcessor {
    value: Value,
}

impl Processor for EchoProcessor {
    fn processor_type(&self) -> &str {
        "echo"
    }

    fn produce<'a>(&'a mut self, _input: Option<&'a OutputValue>) -> ProduceFuture<'a> {
        Box::pin(async move { Ok(self.value.clone()) })
    }
}

#[tokio::test]
async fn register_and_create_builds_a_node_from_its_descriptor() {
    init_tracing();

    let mut registry = Registry::new();
    registry.register("echo", |descriptor, _ctx| {
        Ok(Box::new(EchoProcessor {
            value: descriptor.param("value").cloned().unwrap_or(Value::Null),
        }) as Box<dyn Processor>)
    });

    let descriptor = NodeDescriptorBuilder::new("n", "echo")
        .param("value", json!(42))
        .build();
    let node = registry.create(&descriptor, &SharedContext::new()).unwrap();

    assert_eq!(node.name(), "n");
    assert_eq!(node.processor_type(), "echo");
    assert!(!node.has_output());

    let mut node = node;
    let output = node.produce(None).await.unwrap();
    assert_eq!(output, json!(42));
    assert_eq!(node.output(), Some(&json!(42)));
}

#[test]
fn create_unknown_type_fails() {
    let registry = Registry::new();
    let descriptor = NodeDescriptorBuilder::new("n", "mystery").build();

    let err = registry
        .create(&descriptor, &SharedContext::new())
        .unwrap_err();
    assert!(matches!(err, FlowdagError::UnknownType(tag) if tag == "mystery"));
}

#[tokio::test]
async fn last_registration_for_a_tag_wins() {
    init_tracing();

    let mut registry = Registry::new();
    registry.register("echo", |_descriptor, _ctx| {
        Ok(Box::new(EchoProcessor {
            value: json!("old"),
        }) as Box<dyn Processor>)
    });
    registry.register("echo", |_descriptor, _ctx| {
        Ok(Box::new(EchoProcessor {
            value: json!("new"),
        }) as Box<dyn Processor>)
    });

    let descriptor = NodeDescriptorBuilder::new("n", "echo").build();
    let mut node = registry.create(&descriptor, &SharedContext::new()).unwrap();
    assert_eq!(node.produce(None).await.unwrap(), json!("new"));
}

#[tokio::test]
async fn shared_context_reaches_the_constructor() {
    init_tracing();

    let mut registry = Registry::new();
    registry.register("key-probe", |_descriptor, ctx| {
        let key = ctx.api_key("openai").unwrap_or("missing").to_string();
        Ok(Box::new(EchoProcessor {
            value: Value::String(key),
        }) as Box<dyn Processor>)
    });

    let ctx = SharedContext::new().with_api_key("openai", "sk-test");
    let descriptor = NodeDescriptorBuilder::new("n", "key-probe").build();
    let mut node = registry.create(&descriptor, &ctx).unwrap();

    assert_eq!(node.produce(None).await.unwrap(), json!("sk-test"));
}

#[tokio::test]
async fn builtin_registry_covers_input_text_and_transition() {
    init_tracing();

    let registry = Registry::with_builtins();
    assert!(registry.contains("input-text"));
    assert!(registry.contains("transition"));

    let text = NodeDescriptorBuilder::new("t", "input-text")
        .param("text", json!("hi there"))
        .build();
    let mut node = registry.create(&text, &SharedContext::new()).unwrap();
    assert_eq!(node.produce(None).await.unwrap(), json!("hi there"));

    let pass = NodeDescriptorBuilder::new("p", "transition").input("t").build();
    let mut node = registry.create(&pass, &SharedContext::new()).unwrap();
    let upstream = json!("carried");
    assert_eq!(node.produce(Some(&upstream)).await.unwrap(), json!("carried"));
    assert_eq!(node.produce(None).await.unwrap(), Value::Null);
}

#[test]
fn input_text_without_its_parameter_is_a_config_error() {
    let registry = Registry::with_builtins();
    let descriptor = NodeDescriptorBuilder::new("t", "input-text").build();

    let err = registry
        .create(&descriptor, &SharedContext::new())
        .unwrap_err();
    assert!(matches!(err, FlowdagError::ConfigError(msg) if msg.contains("text")));
}
