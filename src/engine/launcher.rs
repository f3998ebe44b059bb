// src/engine/launcher.rs

//! One execution pass over a node batch.
//!
//! The launcher drives registry, linker, session store and observer set in
//! one of three strategies:
//! - **full**: construct everything fresh, execute all nodes in declaration
//!   order, stop at the first failure.
//! - **targeted**: reconcile against the session store, reuse still-valid
//!   instances, execute only nodes without a memoized output plus the target,
//!   stop once the target has been processed.
//! - **leaf-parallel**: like full, but terminal nodes (nothing depends on
//!   them) run concurrently once the shared predecessors are done.
//!
//! Within a strategy, nodes execute strictly sequentially in declaration
//! order; the leaf join is the only sanctioned concurrency.

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::config::model::FlowConfig;
use crate::engine::observer::ObserverSet;
use crate::engine::session::SessionStore;
use crate::engine::LifecycleEvent;
use crate::errors::{FlowdagError, Result};
use crate::graph::linker::link;
use crate::graph::node::{NodeHandle, NodeSet};
use crate::proc::{OutputValue, Registry, SharedContext};

/// Receiver half of a launch's cancel signal.
///
/// Firing it drops the in-flight `produce` future, invokes the node's
/// best-effort `cancel`, and fails the launch with `Cancelled`. Dropping the
/// sender counts as cancellation too: the holder is normally the transport
/// task, and a dropped sender means the client is gone.
pub type CancelSignal = oneshot::Receiver<()>;

/// Orchestrates execution passes for one client connection.
pub struct Launcher {
    registry: Registry,
    store: Arc<SessionStore>,
    observers: Arc<ObserverSet>,
    context: SharedContext,
}

impl std::fmt::Debug for Launcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Launcher")
            .field("registry", &self.registry)
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}

impl Launcher {
    pub fn new(registry: Registry, store: Arc<SessionStore>, observers: ObserverSet) -> Self {
        Self {
            registry,
            store,
            observers: Arc::new(observers),
            context: SharedContext::new(),
        }
    }

    /// Attach per-session context (e.g. API keys) threaded into constructors.
    pub fn with_context(mut self, context: SharedContext) -> Self {
        self.context = context;
        self
    }

    /// Execute every node of the flow in declaration order.
    ///
    /// All instances are constructed fresh; completed instances are written
    /// back to the session store so a later targeted launch can reuse them.
    /// Stops at the first production failure, leaving earlier outputs stored.
    pub async fn run_full(&self, config: &FlowConfig, session_id: &str) -> Result<()> {
        self.run_full_with_cancel(config, session_id, None).await
    }

    pub async fn run_full_with_cancel(
        &self,
        config: &FlowConfig,
        session_id: &str,
        cancel: Option<CancelSignal>,
    ) -> Result<()> {
        info!(session = %session_id, nodes = config.len(), "starting full launch");

        let nodes = self.build_all(config)?;
        link(&nodes).await?;

        let mut cancel = cancel;
        for (name, handle) in nodes.iter() {
            execute_node(&self.store, &self.observers, name, handle, session_id, &mut cancel)
                .await?;
        }

        info!(session = %session_id, "full launch finished");
        Ok(())
    }

    /// Execute the minimal node set needed to (re)produce `target`.
    ///
    /// Instances stored for this session are reused where reconciliation
    /// allows; the target itself is always rebuilt from its descriptor so an
    /// edited parameter takes effect. Nodes that already carry a memoized
    /// output are skipped, and the pass stops once the target has been
    /// processed.
    pub async fn run_targeted(
        &self,
        config: &FlowConfig,
        session_id: &str,
        target: &str,
    ) -> Result<()> {
        self.run_targeted_with_cancel(config, session_id, target, None)
            .await
    }

    pub async fn run_targeted_with_cancel(
        &self,
        config: &FlowConfig,
        session_id: &str,
        target: &str,
        cancel: Option<CancelSignal>,
    ) -> Result<()> {
        if !config.contains(target) {
            warn!(session = %session_id, target = %target, "targeted launch for unknown node");
            return Err(FlowdagError::TargetNotFound(target.to_string()));
        }

        info!(session = %session_id, target = %target, nodes = config.len(), "starting targeted launch");

        let current_names = config.names();
        let reused = self.store.reconcile(session_id, &current_names).await;

        let mut nodes = NodeSet::new();
        for descriptor in config.nodes() {
            let handle = match reused.get(&descriptor.name) {
                Some(stored) if descriptor.name != target => {
                    debug!(session = %session_id, node = %descriptor.name, "reusing stored instance");
                    stored.clone()
                }
                _ => self
                    .registry
                    .create(descriptor, &self.context)?
                    .into_handle(),
            };
            nodes.insert(descriptor.name.clone(), handle);
        }

        link(&nodes).await?;

        let mut cancel = cancel;
        for (name, handle) in nodes.iter() {
            let skip = {
                let node = handle.lock().await;
                node.has_output() && name != target
            };

            if skip {
                debug!(session = %session_id, node = %name, "skipping node with memoized output");
            } else {
                execute_node(&self.store, &self.observers, name, handle, session_id, &mut cancel)
                    .await?;
            }

            if name == target {
                break;
            }
        }

        info!(session = %session_id, target = %target, "targeted launch finished");
        Ok(())
    }

    /// Full-strategy variant that executes the terminal nodes concurrently.
    ///
    /// Non-leaf nodes run sequentially first, with full-strategy semantics;
    /// a failure there aborts the launch before any leaf is spawned. Leaves
    /// then run as concurrent tasks and are all joined before this returns.
    /// If any leaf failed, the launch fails naming the first failed leaf in
    /// declaration order; leaves that succeeded keep their stored outputs.
    pub async fn run_leaf_parallel(&self, config: &FlowConfig, session_id: &str) -> Result<()> {
        let leaves = config.leaf_names();
        info!(
            session = %session_id,
            nodes = config.len(),
            leaves = leaves.len(),
            "starting leaf-parallel launch"
        );

        let nodes = self.build_all(config)?;
        link(&nodes).await?;

        for (name, handle) in nodes.iter() {
            if leaves.iter().any(|leaf| leaf.as_str() == name) {
                continue;
            }
            execute_node(&self.store, &self.observers, name, handle, session_id, &mut None)
                .await?;
        }

        // Spawn every leaf, then join in declaration order.
        let mut joins = Vec::with_capacity(leaves.len());
        for leaf in &leaves {
            let handle = nodes
                .get(leaf)
                .expect("leaf name missing from built node set")
                .clone();
            let store = Arc::clone(&self.store);
            let observers = Arc::clone(&self.observers);
            let name = leaf.clone();
            let session = session_id.to_string();

            joins.push((
                leaf.clone(),
                tokio::spawn(async move {
                    execute_node(&store, &observers, &name, &handle, &session, &mut None).await
                }),
            ));
        }

        let mut first_failure: Option<FlowdagError> = None;
        for (name, join) in joins {
            match join.await {
                Ok(Ok(_output)) => {}
                Ok(Err(err)) => {
                    if first_failure.is_none() {
                        first_failure = Some(err);
                    }
                }
                Err(join_err) => {
                    warn!(node = %name, error = %join_err, "leaf task did not run to completion");
                    if first_failure.is_none() {
                        first_failure = Some(FlowdagError::Production {
                            node: name,
                            message: join_err.to_string(),
                        });
                    }
                }
            }
        }

        if let Some(err) = first_failure {
            return Err(err);
        }

        info!(session = %session_id, "leaf-parallel launch finished");
        Ok(())
    }

    /// Construct every node of the flow fresh from the registry.
    fn build_all(&self, config: &FlowConfig) -> Result<NodeSet> {
        let mut nodes = NodeSet::new();
        for descriptor in config.nodes() {
            let node = self.registry.create(descriptor, &self.context)?;
            nodes.insert(descriptor.name.clone(), node.into_handle());
        }
        Ok(nodes)
    }
}

/// Execute one node: Started, produce, then Progress + store or Failed.
///
/// The upstream value is read through the node's link-time input handle
/// right before `produce`; an upstream without a memoized output (never run,
/// forward reference, cycle) is observed as absent.
async fn execute_node(
    store: &SessionStore,
    observers: &ObserverSet,
    name: &str,
    handle: &NodeHandle,
    session_id: &str,
    cancel: &mut Option<CancelSignal>,
) -> Result<OutputValue> {
    let upstream = {
        let node = handle.lock().await;
        node.input_handle()
    };
    let input = match upstream {
        Some(upstream) => upstream.lock().await.output().cloned(),
        None => None,
    };

    observers.notify(&LifecycleEvent::Started {
        node: name.to_string(),
    });

    let mut node = handle.lock().await;
    debug!(session = %session_id, node = %name, "executing node");

    let produced = match cancel {
        Some(rx) => {
            let outcome = tokio::select! {
                result = node.produce(input.as_ref()) => Some(result),
                _ = &mut *rx => None,
            };
            match outcome {
                Some(result) => result,
                None => {
                    // The produce future is dropped by the select; give the
                    // processor its best-effort cancellation hook.
                    node.cancel();
                    info!(session = %session_id, node = %name, "launch cancelled while node was running");
                    return Err(FlowdagError::Cancelled {
                        node: name.to_string(),
                    });
                }
            }
        }
        None => node.produce(input.as_ref()).await,
    };
    drop(node);

    match produced {
        Ok(output) => {
            store.set(session_id, name, handle.clone());
            observers.notify(&LifecycleEvent::Progress {
                node: name.to_string(),
                output: output.clone(),
            });
            Ok(output)
        }
        Err(err) => {
            let message = err.to_string();
            warn!(session = %session_id, node = %name, error = %message, "node production failed");
            observers.notify(&LifecycleEvent::Failed {
                node: name.to_string(),
                error: message.clone(),
            });
            Err(FlowdagError::Production {
                node: name.to_string(),
                message,
            })
        }
    }
}
