// tests/reconcile.rs

//! SessionStore reconciliation rules: which stored instances survive a
//! changed flow shape.

mod common;
use crate::common::init_tracing;

use std::collections::HashSet;

use flowdag::engine::SessionStore;
use flowdag::graph::node::NodeHandle;
use flowdag::proc::SharedContext;
use flowdag_test_utils::builders::{const_node, upper_node};
use flowdag_test_utils::processors::{new_produce_log, scripted_registry};

fn names(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn stored_pair() -> (SessionStore, NodeHandle, NodeHandle) {
    let log = new_produce_log();
    let registry = scripted_registry(&log);
    let ctx = SharedContext::new();

    let a = registry
        .create(&const_node("a", "hello"), &ctx)
        .unwrap()
        .into_handle();
    let b = registry
        .create(&upper_node("b", "a"), &ctx)
        .unwrap()
        .into_handle();

    let store = SessionStore::new();
    store.set("s1", "a", a.clone());
    store.set("s1", "b", b.clone());
    (store, a, b)
}

#[tokio::test]
async fn reconcile_keeps_nodes_matching_the_current_flow() {
    init_tracing();

    let (store, a, b) = stored_pair();
    let kept = store.reconcile("s1", &names(&["a", "b"])).await;

    assert_eq!(kept.len(), 2);
    assert!(std::sync::Arc::ptr_eq(kept.get("a").unwrap(), &a));
    assert!(std::sync::Arc::ptr_eq(kept.get("b").unwrap(), &b));
    assert_eq!(store.session_len("s1"), 2);
}

#[tokio::test]
async fn reconcile_drops_a_node_whose_name_left_the_flow() {
    init_tracing();

    let (store, a, _b) = stored_pair();
    let kept = store.reconcile("s1", &names(&["a", "c"])).await;

    assert_eq!(kept.len(), 1);
    assert!(std::sync::Arc::ptr_eq(kept.get("a").unwrap(), &a));

    // The discarded entry is gone from the store too.
    assert!(store.get("s1", "b").is_none());
    assert_eq!(store.session_len("s1"), 1);
}

#[tokio::test]
async fn reconcile_drops_a_node_whose_input_became_dangling() {
    init_tracing();

    let (store, _a, _b) = stored_pair();

    // "b" survives by name but its input "a" left the flow.
    let kept = store.reconcile("s1", &names(&["b", "c"])).await;

    assert!(kept.is_empty());
    assert!(store.get("s1", "b").is_none());
    assert_eq!(store.session_len("s1"), 0);
}

#[tokio::test]
async fn reconcile_is_scoped_to_one_session() {
    init_tracing();

    let (store, _a, _b) = stored_pair();

    let log = new_produce_log();
    let registry = scripted_registry(&log);
    let other = registry
        .create(&const_node("a", "other"), &SharedContext::new())
        .unwrap()
        .into_handle();
    store.set("s2", "a", other);

    // Reconciling s1 against an empty shape clears s1 only.
    let kept = store.reconcile("s1", &names(&["z"])).await;
    assert!(kept.is_empty());
    assert_eq!(store.session_len("s1"), 0);
    assert_eq!(store.session_len("s2"), 1);
}

#[tokio::test]
async fn set_overwrites_and_remove_session_clears() {
    init_tracing();

    let (store, a, _b) = stored_pair();
    store.set("s1", "b", a.clone());
    assert!(std::sync::Arc::ptr_eq(&store.get("s1", "b").unwrap(), &a));

    store.remove_session("s1");
    assert_eq!(store.session_len("s1"), 0);
    assert!(store.get("s1", "a").is_none());
}
