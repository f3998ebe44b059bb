// tests/leaf_parallel.rs

mod common;
use crate::common::{events_of, harness, init_tracing, produced_of};

use serde_json::json;

use flowdag::engine::LifecycleEvent;
use flowdag::errors::FlowdagError;
use flowdag_test_utils::builders::{const_node, upper_node, FlowConfigBuilder, NodeDescriptorBuilder};

#[tokio::test]
async fn leaf_parallel_runs_predecessors_first_then_joins_all_leaves() {
    init_tracing();

    // Diamond: a feeds the two terminal nodes b and c.
    let cfg = FlowConfigBuilder::new()
        .with_node(const_node("a", "x"))
        .with_node(upper_node("b", "a"))
        .with_node(upper_node("c", "a"))
        .build();

    let h = harness();
    h.launcher.run_leaf_parallel(&cfg, "s1").await.unwrap();

    let produced = produced_of(&h.produced);
    assert_eq!(produced.len(), 3);
    assert_eq!(produced[0], "a");
    assert!(produced[1..].contains(&"b".to_string()));
    assert!(produced[1..].contains(&"c".to_string()));

    // Both leaves saw a's output.
    assert_eq!(
        h.store.get("s1", "b").unwrap().lock().await.output(),
        Some(&json!("X"))
    );
    assert_eq!(
        h.store.get("s1", "c").unwrap().lock().await.output(),
        Some(&json!("X"))
    );

    let events = events_of(&h.events);
    assert_eq!(events.len(), 6);
    assert_eq!(events[0], LifecycleEvent::Started { node: "a".into() });
    assert_eq!(
        events[1],
        LifecycleEvent::Progress {
            node: "a".into(),
            output: json!("x"),
        }
    );
}

#[tokio::test]
async fn predecessor_failure_aborts_before_any_leaf_runs() {
    init_tracing();

    let cfg = FlowConfigBuilder::new()
        .with_node(NodeDescriptorBuilder::new("a", "fail").build())
        .with_node(upper_node("b", "a"))
        .build();

    let h = harness();
    let err = h.launcher.run_leaf_parallel(&cfg, "s1").await.unwrap_err();

    assert!(matches!(err, FlowdagError::Production { node, .. } if node == "a"));
    assert_eq!(produced_of(&h.produced), vec!["a"]);
    assert!(events_of(&h.events).iter().all(|e| e.node() != "b"));
}

#[tokio::test]
async fn first_failed_leaf_in_declaration_order_names_the_launch_failure() {
    init_tracing();

    let cfg = FlowConfigBuilder::new()
        .with_node(const_node("a", "x"))
        .with_node(
            NodeDescriptorBuilder::new("b", "fail")
                .input("a")
                .param("message", json!("b broke"))
                .build(),
        )
        .with_node(upper_node("c", "a"))
        .build();

    let h = harness();
    let err = h.launcher.run_leaf_parallel(&cfg, "s1").await.unwrap_err();

    assert!(matches!(err, FlowdagError::Production { node, .. } if node == "b"));

    // The healthy sibling leaf still completed and kept its output.
    assert_eq!(
        h.store.get("s1", "c").unwrap().lock().await.output(),
        Some(&json!("X"))
    );
}
