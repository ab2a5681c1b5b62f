//! Manifest locations from TOML (`[manifests]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Paths of the two JSON manifests
///
/// # Example
///
/// ```toml
/// [manifests]
/// tools = "config/tools.json"
/// agents = "config/agents.json"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileManifestsConfig {
    pub tools: PathBuf,
    pub agents: PathBuf,
}

impl Default for FileManifestsConfig {
    fn default() -> Self {
        Self {
            tools: PathBuf::from("tools.json"),
            agents: PathBuf::from("agents.json"),
        }
    }
}
