// src/engine/mod.rs

//! Orchestration engine for flowdag.
//!
//! This module ties together:
//! - the launcher, which drives one execution pass over a node batch
//!   (full, targeted, or leaf-parallel)
//! - the session store that keeps node instances alive between targeted
//!   launches from the same client
//! - the observer set that broadcasts per-node lifecycle events
//!
//! The registry and linker it drives live in [`crate::proc`] and
//! [`crate::graph`].

use serde::Serialize;

use crate::proc::OutputValue;

/// Canonical node name type used throughout the engine.
pub type NodeName = String;

/// Identity scoping instance reuse across repeated launches from one client.
pub type SessionId = String;

/// Per-node lifecycle event broadcast through the observer set.
///
/// Serializable so a transport can forward it to a remote client verbatim;
/// the wire encoding itself is the transport's concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// The node is about to execute.
    Started { node: NodeName },
    /// The node completed and produced an output.
    Progress { node: NodeName, output: OutputValue },
    /// The node's `produce` failed; no later nodes run in this launch.
    Failed { node: NodeName, error: String },
}

impl LifecycleEvent {
    /// Name of the node this event concerns.
    pub fn node(&self) -> &str {
        match self {
            LifecycleEvent::Started { node }
            | LifecycleEvent::Progress { node, .. }
            | LifecycleEvent::Failed { node, .. } => node,
        }
    }
}

pub mod launcher;
pub mod observer;
pub mod session;

pub use launcher::{CancelSignal, Launcher};
pub use observer::{ChannelObserver, LogObserver, Observer, ObserverSet, StdoutObserver};
pub use session::SessionStore;
