//! Static validation of agent definitions against a tool manifest.
//!
//! Assembly never fails for partially-satisfiable agents; it skips what it
//! cannot resolve. This module reports the same problems up front (for the
//! `check` command and for reload diagnostics) as structured issues.

use super::entities::AgentDefinition;
use crate::core::identifier::sanitize_identifier;
use crate::tool::ToolManifest;
use std::collections::HashSet;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// An agent references a tool id that is not in the manifest.
    UnknownToolReference,
    /// None of an agent's tool ids resolve; the agent will be skipped.
    AgentWithoutTools,
    /// A tool config sets a parameter the tool does not declare.
    UndeclaredToolParameter,
    /// A required credential is missing from the agent's tool config.
    MissingCredential,
    /// Sanitization changed the agent name.
    NameSanitized,
    /// Two agents sanitize to the same name; the later one is dropped.
    DuplicateAgentName,
    /// No comparison phrases are configured, so comparison mode never triggers.
    NoComparisonPhrases,
    /// A routing category has no aliases.
    CategoryWithoutAliases,
    /// A numeric dispatch setting is zero.
    ZeroDispatchLimit,
    /// A configured model name is blank.
    EmptyModelName,
    /// A manifest path does not point at an existing file.
    MissingManifestFile,
    /// The environment variable holding the decision-service key is unset.
    MissingApiKey,
}

/// A detected configuration issue.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}

/// Report every problem assembly would silently work around.
pub fn validate_agents(agents: &[AgentDefinition], manifest: &ToolManifest) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    let mut names = HashSet::new();

    for agent in agents {
        let sanitized = sanitize_identifier(&agent.name);
        if sanitized != agent.name {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NameSanitized,
                format!("Agent '{}' will be exposed as '{}'", agent.name, sanitized),
            ));
        }
        if !names.insert(sanitized.clone()) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::DuplicateAgentName,
                format!("Agent '{}' collides with another agent named '{}'", agent.name, sanitized),
            ));
        }

        let mut resolved = 0;
        for tool_id in agent.unique_tool_ids() {
            let Some(tool) = manifest.get(tool_id) else {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::UnknownToolReference,
                    format!("Agent '{}' references unknown tool '{}'", agent.name, tool_id),
                ));
                continue;
            };
            resolved += 1;

            let config = agent.tool_configs.get(tool_id);
            if let Some(config) = config {
                for key in config.keys().filter(|k| tool.parameter(k).is_none()) {
                    issues.push(ConfigIssue::warning(
                        ConfigIssueCode::UndeclaredToolParameter,
                        format!(
                            "Agent '{}' sets '{}' on tool '{}', which does not declare it",
                            agent.name, key, tool_id
                        ),
                    ));
                }
            }

            for (name, spec) in tool.credential_parameters() {
                let blank = |v: &serde_json::Value| v.as_str().is_some_and(|s| s.trim().is_empty());
                let supplied =
                    config.is_some_and(|c| c.get(name).is_some_and(|v| !v.is_null() && !blank(v)));
                if spec.required && !supplied && spec.default_value().is_none() {
                    issues.push(ConfigIssue::warning(
                        ConfigIssueCode::MissingCredential,
                        format!(
                            "Agent '{}' has no value for credential '{}' of tool '{}'",
                            agent.name, name, tool_id
                        ),
                    ));
                }
            }
        }

        if resolved == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::AgentWithoutTools,
                format!("Agent '{}' has no resolvable tools and will be skipped", agent.name),
            ));
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{Arguments, ParameterSpec, ToolDefinition};
    use serde_json::json;

    fn manifest() -> ToolManifest {
        ToolManifest::new(vec![
            ToolDefinition::new("jira_tool", "Jira")
                .with_parameter("summary", ParameterSpec::string())
                .with_parameter("api_key", ParameterSpec::string().required().credential()),
            ToolDefinition::new("web_search", "Search"),
        ])
        .unwrap()
    }

    fn codes(issues: &[ConfigIssue]) -> Vec<ConfigIssueCode> {
        issues.iter().map(|i| i.code).collect()
    }

    #[test]
    fn clean_agent_has_no_issues() {
        let mut config = Arguments::new();
        config.insert("api_key".into(), json!("k"));
        let agent = AgentDefinition::new("PE_Agent", "")
            .with_tool("jira_tool")
            .with_tool_config("jira_tool", config);
        assert!(validate_agents(&[agent], &manifest()).is_empty());
    }

    #[test]
    fn unknown_tool_and_missing_credential_warn() {
        let agent = AgentDefinition::new("PE_Agent", "")
            .with_tool("jira_tool")
            .with_tool("ghost_tool");
        let issues = validate_agents(&[agent], &manifest());
        assert_eq!(
            codes(&issues),
            vec![
                ConfigIssueCode::MissingCredential,
                ConfigIssueCode::UnknownToolReference
            ]
        );
        assert!(!ConfigIssue::has_errors(&issues));
    }

    #[test]
    fn agent_without_tools_is_error() {
        let agent = AgentDefinition::new("Ghost", "").with_tool("ghost_tool");
        let issues = validate_agents(&[agent], &manifest());
        assert!(ConfigIssue::has_errors(&issues));
        assert!(codes(&issues).contains(&ConfigIssueCode::AgentWithoutTools));
    }

    #[test]
    fn sanitized_and_duplicate_names_warn() {
        let a = AgentDefinition::new("HR Agent", "").with_tool("web_search");
        let b = AgentDefinition::new("HR_Agent", "").with_tool("web_search");
        let issues = validate_agents(&[a, b], &manifest());
        assert_eq!(
            codes(&issues),
            vec![
                ConfigIssueCode::NameSanitized,
                ConfigIssueCode::DuplicateAgentName
            ]
        );
    }

    #[test]
    fn blank_credential_warns_as_missing() {
        let mut config = Arguments::new();
        config.insert("api_key".into(), json!(""));
        let agent = AgentDefinition::new("PE_Agent", "")
            .with_tool("jira_tool")
            .with_tool_config("jira_tool", config);
        let issues = validate_agents(&[agent], &manifest());
        assert_eq!(codes(&issues), vec![ConfigIssueCode::MissingCredential]);
    }

    #[test]
    fn undeclared_config_key_warns() {
        let mut config = Arguments::new();
        config.insert("api_key".into(), json!("k"));
        config.insert("region".into(), json!("vn"));
        let agent = AgentDefinition::new("PE_Agent", "")
            .with_tool("jira_tool")
            .with_tool_config("jira_tool", config);
        let issues = validate_agents(&[agent], &manifest());
        assert_eq!(codes(&issues), vec![ConfigIssueCode::UndeclaredToolParameter]);
    }
}
