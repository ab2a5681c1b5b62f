//! Knowledge base configuration from TOML (`[knowledge]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Documents searched by the knowledge lookup tools
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileKnowledgeConfig {
    /// Directory of `.txt` / `.md` documents; knowledge tools report
    /// themselves unavailable when unset
    pub directory: Option<PathBuf>,
}
