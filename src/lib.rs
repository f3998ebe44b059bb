// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod proc;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::FlowConfig;
use crate::engine::observer::{ObserverSet, StdoutObserver};
use crate::engine::{Launcher, SessionStore};
use crate::proc::Registry;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the built-in registry
/// - a session store and a stdout event sink
/// - a full or targeted launch
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let registry = Registry::with_builtins();
    let store = Arc::new(SessionStore::new());
    let observers = ObserverSet::new(vec![Box::new(StdoutObserver)]);
    let launcher = Launcher::new(registry, store, observers);

    match &args.target {
        Some(target) => launcher.run_targeted(&cfg, &args.session, target).await?,
        None => launcher.run_full(&cfg, &args.session).await?,
    }

    Ok(())
}

/// Simple dry-run output: print nodes, types, inputs and leaves.
fn print_dry_run(cfg: &FlowConfig) {
    println!("flowdag dry-run");
    println!();

    println!("nodes ({}):", cfg.len());
    for descriptor in cfg.nodes() {
        println!("  - {}", descriptor.name);
        println!("      type: {}", descriptor.processor_type);
        if let Some(ref input) = descriptor.input {
            println!("      input: {input}");
        }
        if !descriptor.params.is_empty() {
            let keys: Vec<&str> = descriptor.params.keys().map(String::as_str).collect();
            println!("      params: {keys:?}");
        }
    }

    let leaves = cfg.leaf_names();
    if !leaves.is_empty() {
        println!();
        println!("leaves: {leaves:?}");
    }

    debug!("dry-run complete (no execution)");
}
