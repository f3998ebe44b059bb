// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{FlowConfig, RawFlowConfig};
use crate::errors::Result;

/// Parse a flow from a JSON string and return the raw `RawFlowConfig`.
///
/// This only performs JSON deserialization; it does **not** perform semantic
/// validation (name uniqueness, etc.). Use [`parse_and_validate`] for that.
pub fn parse_flow(json: &str) -> Result<RawFlowConfig> {
    let raw: RawFlowConfig = serde_json::from_str(json)?;
    Ok(raw)
}

/// Parse a flow from a JSON string and run validation.
///
/// This is the entry point a transport layer should use on a client-submitted
/// flow payload.
pub fn parse_and_validate(json: &str) -> Result<FlowConfig> {
    let raw = parse_flow(json)?;
    let config = FlowConfig::try_from(raw)?;
    Ok(config)
}

/// Load a flow from a JSON file and run validation.
///
/// Used by the CLI; transports normally receive the JSON in-band and go
/// through [`parse_and_validate`] instead.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<FlowConfig> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_and_validate(&contents)
}
