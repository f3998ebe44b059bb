// src/graph/linker.rs

//! Resolution of named input references into direct handles.

use tracing::{debug, error};

use crate::errors::{FlowdagError, Result};
use crate::graph::node::NodeSet;

/// Resolve every node's input reference against the same batch and store the
/// resolved handle on the node.
///
/// Handles are resolved once, here; execution reads through them without
/// re-resolving. A reference to a name outside the batch fails with
/// `DanglingReference`. Cycles and forward references are not detected: they
/// link fine and the downstream node observes an absent upstream output at
/// execution time.
pub async fn link(nodes: &NodeSet) -> Result<()> {
    for (name, handle) in nodes.iter() {
        let input_ref = {
            let node = handle.lock().await;
            node.input_ref().map(str::to_string)
        };

        let Some(target) = input_ref else {
            continue;
        };

        match nodes.get(&target) {
            Some(upstream) => {
                let mut node = handle.lock().await;
                node.set_input_handle(upstream.clone());
                debug!(node = %name, input = %target, "linked input reference");
            }
            None => {
                error!(node = %name, input = %target, "input reference not found in batch");
                return Err(FlowdagError::DanglingReference {
                    referrer: name.to_string(),
                    missing: target,
                });
            }
        }
    }

    Ok(())
}
