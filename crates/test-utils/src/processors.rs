//! Scripted processors for driving the launcher in tests.
//!
//! Each produce call records the node's name into a shared log so tests can
//! assert exactly which nodes ran, and in what order. A cancelled node
//! records `<name>:cancelled`.

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use serde_json::Value;

use flowdag::proc::{OutputValue, Processor, ProduceFuture, Registry};

/// Shared record of produce (and cancel) calls, in order.
pub type ProduceLog = Arc<Mutex<Vec<String>>>;

pub fn new_produce_log() -> ProduceLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// A registry with the scripted kinds `const`, `upper`, `fail` and `hang`,
/// all recording into `log`.
///
/// - `const`: emits its `value` param (null if absent).
/// - `upper`: uppercases its upstream string output; absent upstream → null.
/// - `fail`: always fails, with its `message` param or a default.
/// - `hang`: never completes; only useful together with a cancel signal.
pub fn scripted_registry(log: &ProduceLog) -> Registry {
    let mut registry = Registry::new();

    {
        let log = Arc::clone(log);
        registry.register("const", move |descriptor, _ctx| {
            Ok(Box::new(ConstProcessor {
                name: descriptor.name.clone(),
                value: descriptor.param("value").cloned().unwrap_or(Value::Null),
                log: Arc::clone(&log),
            }) as Box<dyn Processor>)
        });
    }

    {
        let log = Arc::clone(log);
        registry.register("upper", move |descriptor, _ctx| {
            Ok(Box::new(UpperProcessor {
                name: descriptor.name.clone(),
                log: Arc::clone(&log),
            }) as Box<dyn Processor>)
        });
    }

    {
        let log = Arc::clone(log);
        registry.register("fail", move |descriptor, _ctx| {
            Ok(Box::new(FailProcessor {
                name: descriptor.name.clone(),
                message: descriptor
                    .param_str("message")
                    .unwrap_or("scripted failure")
                    .to_string(),
                log: Arc::clone(&log),
            }) as Box<dyn Processor>)
        });
    }

    {
        let log = Arc::clone(log);
        registry.register("hang", move |descriptor, _ctx| {
            Ok(Box::new(HangProcessor {
                name: descriptor.name.clone(),
                log: Arc::clone(&log),
            }) as Box<dyn Processor>)
        });
    }

    registry
}

pub struct ConstProcessor {
    name: String,
    value: Value,
    log: ProduceLog,
}

impl Processor for ConstProcessor {
    fn processor_type(&self) -> &str {
        "const"
    }

    fn produce<'a>(&'a mut self, _input: Option<&'a OutputValue>) -> ProduceFuture<'a> {
        Box::pin(async move {
            self.log.lock().unwrap().push(self.name.clone());
            Ok(self.value.clone())
        })
    }
}

pub struct UpperProcessor {
    name: String,
    log: ProduceLog,
}

impl Processor for UpperProcessor {
    fn processor_type(&self) -> &str {
        "upper"
    }

    fn produce<'a>(&'a mut self, input: Option<&'a OutputValue>) -> ProduceFuture<'a> {
        Box::pin(async move {
            self.log.lock().unwrap().push(self.name.clone());
            let upper = input
                .and_then(Value::as_str)
                .map(|s| Value::String(s.to_uppercase()))
                .unwrap_or(Value::Null);
            Ok(upper)
        })
    }
}

pub struct FailProcessor {
    name: String,
    message: String,
    log: ProduceLog,
}

impl Processor for FailProcessor {
    fn processor_type(&self) -> &str {
        "fail"
    }

    fn produce<'a>(&'a mut self, _input: Option<&'a OutputValue>) -> ProduceFuture<'a> {
        Box::pin(async move {
            self.log.lock().unwrap().push(self.name.clone());
            Err(anyhow!("{}", self.message))
        })
    }
}

pub struct HangProcessor {
    name: String,
    log: ProduceLog,
}

impl Processor for HangProcessor {
    fn processor_type(&self) -> &str {
        "hang"
    }

    fn produce<'a>(&'a mut self, _input: Option<&'a OutputValue>) -> ProduceFuture<'a> {
        Box::pin(async move {
            self.log.lock().unwrap().push(self.name.clone());
            std::future::pending::<()>().await;
            unreachable!("hang processor never completes")
        })
    }

    fn cancel(&mut self) {
        self.log.lock().unwrap().push(format!("{}:cancelled", self.name));
    }
}
