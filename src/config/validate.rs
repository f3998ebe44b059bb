// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{FlowConfig, RawFlowConfig};
use crate::errors::{FlowdagError, Result};

impl TryFrom<RawFlowConfig> for FlowConfig {
    type Error = crate::errors::FlowdagError;

    fn try_from(raw: RawFlowConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(FlowConfig::new_unchecked(raw.nodes))
    }
}

fn validate_raw_config(raw: &RawFlowConfig) -> Result<()> {
    ensure_has_nodes(raw)?;
    ensure_unique_names(raw)?;
    Ok(())
}

fn ensure_has_nodes(raw: &RawFlowConfig) -> Result<()> {
    if raw.nodes.is_empty() {
        return Err(FlowdagError::ConfigError(
            "flow must contain at least one node".to_string(),
        ));
    }
    Ok(())
}

// Input references are deliberately NOT checked here: a dangling reference is
// a link-time error (DanglingReference), and cycles are not detected at all.
fn ensure_unique_names(raw: &RawFlowConfig) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();

    for descriptor in raw.nodes.iter() {
        if descriptor.name.is_empty() {
            return Err(FlowdagError::ConfigError(
                "node name must not be empty".to_string(),
            ));
        }
        if !seen.insert(descriptor.name.as_str()) {
            return Err(FlowdagError::ConfigError(format!(
                "duplicate node name '{}' in flow",
                descriptor.name
            )));
        }
    }

    Ok(())
}
