// src/engine/observer.rs

//! Pluggable notification sinks for lifecycle events.
//!
//! Observers are fixed at construction as an ordered list. Broadcast is
//! synchronous and best-effort: a failing observer is logged at the
//! broadcast boundary and never aborts delivery to the rest, and never
//! propagates to the launcher.

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::engine::LifecycleEvent;

/// One notification sink.
///
/// `on_event` returning an error marks the delivery as failed for this
/// observer only; see [`ObserverSet::notify`].
pub trait Observer: Send + Sync {
    fn on_event(&self, event: &LifecycleEvent) -> anyhow::Result<()>;
}

/// Fixed, ordered list of observers.
pub struct ObserverSet {
    observers: Vec<Box<dyn Observer>>,
}

impl std::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSet")
            .field("len", &self.observers.len())
            .finish()
    }
}

impl ObserverSet {
    /// Observers are registered once, here; there is no runtime add/remove.
    pub fn new(observers: Vec<Box<dyn Observer>>) -> Self {
        Self { observers }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Invoke every observer in registration order.
    ///
    /// Observer failures are logged here and go no further.
    pub fn notify(&self, event: &LifecycleEvent) {
        for (index, observer) in self.observers.iter().enumerate() {
            if let Err(err) = observer.on_event(event) {
                warn!(
                    observer = index,
                    node = %event.node(),
                    error = %err,
                    "observer failed; continuing broadcast"
                );
            }
        }
    }
}

/// Forwards events into an mpsc channel, e.g. toward a transport task that
/// owns the client connection.
///
/// Uses `try_send` so the broadcast stays synchronous; a full or closed
/// channel is an observer failure (logged, not escalated).
pub struct ChannelObserver {
    tx: mpsc::Sender<LifecycleEvent>,
}

impl ChannelObserver {
    pub fn new(tx: mpsc::Sender<LifecycleEvent>) -> Self {
        Self { tx }
    }
}

impl Observer for ChannelObserver {
    fn on_event(&self, event: &LifecycleEvent) -> anyhow::Result<()> {
        self.tx
            .try_send(event.clone())
            .context("forwarding lifecycle event to channel")
    }
}

/// Logs events through `tracing`. Handy as a default sink in embedding
/// applications that have no transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn on_event(&self, event: &LifecycleEvent) -> anyhow::Result<()> {
        match event {
            LifecycleEvent::Started { node } => debug!(node = %node, "node started"),
            LifecycleEvent::Progress { node, .. } => debug!(node = %node, "node produced output"),
            LifecycleEvent::Failed { node, error } => {
                warn!(node = %node, error = %error, "node failed")
            }
        }
        Ok(())
    }
}

/// Prints events as JSON lines on stdout. Used by the CLI; logs go to stderr
/// so the two streams stay separable.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutObserver;

impl Observer for StdoutObserver {
    fn on_event(&self, event: &LifecycleEvent) -> anyhow::Result<()> {
        let line = serde_json::to_string(event).context("serializing lifecycle event")?;
        println!("{line}");
        Ok(())
    }
}
