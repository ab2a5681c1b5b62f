//! Hot-reload configuration from TOML (`[reload]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use switchyard_application::ReloadParams;

/// Raw reload configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReloadConfig {
    /// Reload requests within this window of the previous one are skipped
    pub cooldown_ms: u64,
    /// Poll the manifest files in the background during `chat`
    pub watch: bool,
    pub poll_interval_ms: u64,
}

impl Default for FileReloadConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 2000,
            watch: false,
            poll_interval_ms: 1000,
        }
    }
}

impl FileReloadConfig {
    pub fn to_params(&self) -> ReloadParams {
        ReloadParams {
            cooldown: Duration::from_millis(self.cooldown_ms),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(100))
    }
}
