//! Observers for asserting on lifecycle event broadcasts in tests.

use std::sync::{Arc, Mutex};

use anyhow::anyhow;

use flowdag::engine::observer::Observer;
use flowdag::engine::LifecycleEvent;

/// Shared record of events, in delivery order.
pub type EventLog = Arc<Mutex<Vec<LifecycleEvent>>>;

pub fn new_event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// An observer that records every event it sees.
pub struct RecordingObserver {
    events: EventLog,
}

impl RecordingObserver {
    pub fn new(events: EventLog) -> Self {
        Self { events }
    }
}

impl Observer for RecordingObserver {
    fn on_event(&self, event: &LifecycleEvent) -> anyhow::Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// An observer that always fails, for exercising the broadcast boundary.
pub struct FailingObserver;

impl Observer for FailingObserver {
    fn on_event(&self, _event: &LifecycleEvent) -> anyhow::Result<()> {
        Err(anyhow!("observer sink unavailable"))
    }
}
