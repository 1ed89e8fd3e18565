use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Engine configuration.
///
/// The defaults reproduce the historical behavior: `<...>` includes
/// resolve under `/usr/include/` and completion offers `.h`/`.hh` files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Roots searched for `<...>` includes; the first entry wins.
    pub system_include_roots: Vec<PathBuf>,
    /// File extensions offered by include completion.
    pub header_extensions: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            system_include_roots: vec![PathBuf::from("/usr/include/")],
            header_extensions: vec![".h".to_string(), ".hh".to_string()],
        }
    }
}

impl EngineConfig {
    /// Build a config from a JSON payload, falling back to defaults on
    /// malformed input.
    pub fn from_json(value: serde_json::Value) -> Self {
        match serde_json::from_value(value) {
            Ok(config) => config,
            Err(error) => {
                warn!(%error, "invalid engine configuration, using defaults");
                Self::default()
            },
        }
    }
}
