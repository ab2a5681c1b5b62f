//! Configuration file loading for switchyard
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SWITCHYARD_` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./switchyard.toml` or `./.switchyard.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/switchyard/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileCategory, FileConfig, FileDecisionConfig, FileDispatchConfig, FileKnowledgeConfig,
    FileLoggingConfig, FileManifestsConfig, FileOutputConfig, FileOutputFormat, FileReloadConfig,
    FileReplConfig, FileRoutingConfig,
};
pub use loader::ConfigLoader;
