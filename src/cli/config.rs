//! Engine configuration files for CLI commands

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};

use crate::EngineConfig;

/// Read an [`EngineConfig`] from a JSON file; absent fields keep their
/// defaults.
pub fn read_engine_config(path: &Path) -> Result<EngineConfig> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open config file: {}", path.display()))?;
    let config: EngineConfig = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid engine config in {}", path.display()))?;
    Ok(config)
}

/// Split a comma-separated label list, dropping empty entries.
pub fn parse_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}
