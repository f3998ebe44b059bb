// src/config/mod.rs

//! Flow configuration: the ordered node descriptor list a client submits.
//!
//! - [`model`] holds the serde data model (raw and validated forms).
//! - [`loader`] parses JSON from strings or files.
//! - [`validate`] checks the raw form (unique names, non-empty).

pub mod loader;
pub mod model;
pub mod validate;

pub use model::{FlowConfig, NodeDescriptor, RawFlowConfig};
