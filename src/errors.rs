// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowdagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown processor type: {0}")]
    UnknownType(String),

    #[error("Node '{referrer}' references missing input '{missing}'")]
    DanglingReference { referrer: String, missing: String },

    #[error("Target node not found: {0}")]
    TargetNotFound(String),

    #[error("Node '{node}' failed: {message}")]
    Production { node: String, message: String },

    #[error("Launch cancelled while node '{node}' was running")]
    Cancelled { node: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FlowdagError>;
