//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to application parameters
//! with the issues found along the way.

mod decision;
mod dispatch;
mod knowledge;
mod logging;
mod manifests;
mod output;
mod reload;
mod repl;
mod routing;

pub use decision::FileDecisionConfig;
pub use dispatch::FileDispatchConfig;
pub use knowledge::FileKnowledgeConfig;
pub use logging::FileLoggingConfig;
pub use manifests::FileManifestsConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use reload::FileReloadConfig;
pub use repl::FileReplConfig;
pub use routing::{FileCategory, FileRoutingConfig};

use serde::{Deserialize, Serialize};
use switchyard_application::DispatchParams;
use switchyard_domain::{ConfigIssue, ConfigIssueCode, RoutingRules};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Tool and agent manifest locations
    pub manifests: FileManifestsConfig,
    /// Router and agent loop settings
    pub dispatch: FileDispatchConfig,
    /// Comparison-mode detection
    pub routing: FileRoutingConfig,
    /// Hot reload
    pub reload: FileReloadConfig,
    /// Decision service connection
    pub decision: FileDecisionConfig,
    /// Execution-trace log
    pub logging: FileLoggingConfig,
    /// Knowledge base documents
    pub knowledge: FileKnowledgeConfig,
    pub output: FileOutputConfig,
    pub repl: FileReplConfig,
}

impl FileConfig {
    pub fn dispatch_params(&self) -> (DispatchParams, Vec<ConfigIssue>) {
        self.dispatch.to_params(&self.decision.default_model)
    }

    pub fn routing_rules(&self) -> (RoutingRules, Vec<ConfigIssue>) {
        self.routing.to_rules()
    }

    /// Render the effective configuration as TOML (for `--show-config`).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks dispatch limits, routing rules, the decision model name, the
    /// API key variable and that both manifest files exist.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.dispatch_params().1);
        issues.extend(self.routing_rules().1);

        if self.decision.default_model.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyModelName,
                "decision.default_model: model name cannot be empty",
            ));
        }

        if self.decision.api_key().is_none() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::MissingApiKey,
                format!(
                    "decision.api_key_env: environment variable {} is not set",
                    self.decision.api_key_env
                ),
            ));
        }

        for (field, path) in [
            ("tools", &self.manifests.tools),
            ("agents", &self.manifests.agents),
        ] {
            if !path.is_file() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::MissingManifestFile,
                    format!("manifests.{}: {} does not exist", field, path.display()),
                ));
            }
        }

        issues
    }
}
