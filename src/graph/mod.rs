// src/graph/mod.rs

//! Node instances and the wiring between them.
//!
//! - [`node`] holds the engine-owned `Node` wrapper around a processor,
//!   shared handles, and the ordered `NodeSet` for one batch.
//! - [`linker`] resolves named input references within a batch into direct
//!   handles.

pub mod linker;
pub mod node;

pub use linker::link;
pub use node::{Node, NodeHandle, NodeSet};
