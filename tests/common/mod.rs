#![allow(dead_code)]

pub use flowdag_test_utils::init_tracing;

use std::sync::Arc;

use flowdag::engine::observer::ObserverSet;
use flowdag::engine::{Launcher, LifecycleEvent, SessionStore};
use flowdag_test_utils::observers::{new_event_log, EventLog, RecordingObserver};
use flowdag_test_utils::processors::{new_produce_log, scripted_registry, ProduceLog};

/// A launcher wired to the scripted registry and a recording observer, plus
/// the shared logs and store the test can assert on.
pub struct Harness {
    pub launcher: Launcher,
    pub store: Arc<SessionStore>,
    pub produced: ProduceLog,
    pub events: EventLog,
}

pub fn harness() -> Harness {
    let produced = new_produce_log();
    let events = new_event_log();
    let store = Arc::new(SessionStore::new());

    let registry = scripted_registry(&produced);
    let observers = ObserverSet::new(vec![Box::new(RecordingObserver::new(events.clone()))]);
    let launcher = Launcher::new(registry, store.clone(), observers);

    Harness {
        launcher,
        store,
        produced,
        events,
    }
}

/// Snapshot of the recorded events.
pub fn events_of(log: &EventLog) -> Vec<LifecycleEvent> {
    log.lock().unwrap().clone()
}

/// Snapshot of the recorded produce calls.
pub fn produced_of(log: &ProduceLog) -> Vec<String> {
    log.lock().unwrap().clone()
}
