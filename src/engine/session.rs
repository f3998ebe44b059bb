// src/engine/session.rs

//! Session-scoped persistence of node instances.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use tracing::debug;

use crate::engine::{NodeName, SessionId};
use crate::graph::node::NodeHandle;

/// Keeps node instances alive between launches, keyed by
/// (session id, node name).
///
/// One store is shared across all sessions of a process; the session id in
/// the key is what isolates clients from each other. Two concurrent launches
/// for the *same* session are not coordinated here: the last write wins.
#[derive(Debug, Default)]
pub struct SessionStore {
    entries: Mutex<HashMap<(SessionId, NodeName), NodeHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, session_id: &str, name: &str) -> Option<NodeHandle> {
        let entries = self.entries.lock().expect("session store poisoned");
        entries
            .get(&(session_id.to_string(), name.to_string()))
            .cloned()
    }

    /// Store (or overwrite) the instance for this (session, name).
    pub fn set(&self, session_id: &str, name: &str, handle: NodeHandle) {
        let mut entries = self.entries.lock().expect("session store poisoned");
        entries.insert((session_id.to_string(), name.to_string()), handle);
    }

    /// Drop everything stored for a session, e.g. on client disconnect.
    pub fn remove_session(&self, session_id: &str) {
        let mut entries = self.entries.lock().expect("session store poisoned");
        entries.retain(|(sid, _), _| sid != session_id);
    }

    /// Number of entries stored for a session.
    pub fn session_len(&self, session_id: &str) -> usize {
        let entries = self.entries.lock().expect("session store poisoned");
        entries.keys().filter(|(sid, _)| sid == session_id).count()
    }

    /// Return the stored nodes of this session that are eligible for reuse
    /// against the given config, and discard the rest.
    ///
    /// A stored node is kept only if:
    /// - its name is still present in `current_names`, and
    /// - its input reference, if any, is also present in `current_names`.
    ///
    /// Everything else is removed from the store; the caller replaces those
    /// names with freshly constructed instances. This prevents reusing an
    /// instance whose dependency shape has changed under it.
    pub async fn reconcile(
        &self,
        session_id: &str,
        current_names: &HashSet<String>,
    ) -> HashMap<NodeName, NodeHandle> {
        // Snapshot outside the node locks; the map lock is never held across
        // an await.
        let snapshot: Vec<(NodeName, NodeHandle)> = {
            let entries = self.entries.lock().expect("session store poisoned");
            entries
                .iter()
                .filter(|((sid, _), _)| sid == session_id)
                .map(|((_, name), handle)| (name.clone(), handle.clone()))
                .collect()
        };

        let mut kept = HashMap::new();
        let mut discarded = Vec::new();

        for (name, handle) in snapshot {
            if !current_names.contains(&name) {
                debug!(session = %session_id, node = %name, "discarding stored node: name left the flow");
                discarded.push(name);
                continue;
            }

            let input_ok = {
                let node = handle.lock().await;
                node.input_ref()
                    .map(|input| current_names.contains(input))
                    .unwrap_or(true)
            };

            if input_ok {
                kept.insert(name, handle);
            } else {
                debug!(session = %session_id, node = %name, "discarding stored node: input reference left the flow");
                discarded.push(name);
            }
        }

        if !discarded.is_empty() {
            let mut entries = self.entries.lock().expect("session store poisoned");
            for name in discarded {
                entries.remove(&(session_id.to_string(), name));
            }
        }

        kept
    }
}
