//! Console output formatter for dispatch results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use switchyard_application::{AgentInfo, ToolSummary};
use switchyard_domain::{ConfigIssue, ExecutionResult, RoutingMode, Severity};

/// Formats dispatch results and listings for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Response with a routing summary line
    pub fn format(result: &ExecutionResult) -> String {
        let mut output = String::new();
        output.push_str(&Self::route_line(result));
        output.push_str("\n\n");
        output.push_str(&result.response);
        output.push('\n');
        if let Some(error) = &result.error {
            output.push_str(&format!("\n{} {}\n", "Error:".red().bold(), error));
        }
        output
    }

    /// Response followed by every execution step
    pub fn format_detailed(result: &ExecutionResult) -> String {
        let mut output = Self::format(result);

        output.push_str(&Self::section_header(&format!(
            "Execution trace ({} steps)",
            result.total_steps
        )));
        for step in &result.steps {
            output.push_str(&format!(
                "\n{} {}\n",
                format!("#{}", step.position).dimmed(),
                step.actor_name.yellow().bold()
            ));
            output.push_str(&format!("{}\n", Self::indent(&step.input, "  > ")));
            output.push_str(&format!("{}\n", Self::indent(&step.observation, "    ")));
        }

        if !result.tools_used.is_empty() {
            output.push_str(&format!(
                "\n{} {}\n",
                "Tools used:".cyan().bold(),
                result.tools_used.iter().cloned().collect::<Vec<_>>().join(", ")
            ));
        }
        output
    }

    /// Format as JSON
    pub fn format_json(result: &ExecutionResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn format_agents(info: &AgentInfo) -> String {
        let mut output = Self::header(&format!("Agents ({})", info.total_agents));
        output.push('\n');
        if info.agents.is_empty() {
            output.push_str(&format!("\n{}\n", "No agents assembled.".dimmed()));
        }
        for agent in &info.agents {
            output.push_str(&format!("\n{}\n", agent.name.yellow().bold()));
            if !agent.description.is_empty() {
                output.push_str(&format!("{}\n", Self::indent(&agent.description, "  ")));
            }
            output.push_str(&format!(
                "  {} {}\n",
                "tools:".dimmed(),
                agent.tools.join(", ")
            ));
        }
        output.push_str(&Self::footer());
        output
    }

    pub fn format_tools(tools: &[ToolSummary]) -> String {
        let mut output = Self::header(&format!("Tools ({})", tools.len()));
        output.push('\n');
        for tool in tools {
            let title = if tool.name != tool.id {
                format!("{} ({})", tool.id, tool.name)
            } else {
                tool.id.clone()
            };
            output.push_str(&format!("\n{}\n", title.yellow().bold()));
            if !tool.description.is_empty() {
                output.push_str(&format!("{}\n", Self::indent(&tool.description, "  ")));
            }
            if !tool.file.is_empty() {
                output.push_str(&format!("  {} {}\n", "file:".dimmed(), tool.file));
            }
            if let Some(params) = tool.parameters.as_object()
                && !params.is_empty()
            {
                let names: Vec<String> = params
                    .iter()
                    .map(|(name, spec)| {
                        if spec["is_credential"].as_bool().unwrap_or(false) {
                            format!("{} (credential)", name)
                        } else {
                            name.clone()
                        }
                    })
                    .collect();
                output.push_str(&format!("  {} {}\n", "parameters:".dimmed(), names.join(", ")));
            }
        }
        output.push_str(&Self::footer());
        output
    }

    /// One line per issue; a closing summary line
    pub fn format_issues(issues: &[ConfigIssue]) -> String {
        let mut output = String::new();
        for issue in issues {
            let label = match issue.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow().bold(),
            };
            output.push_str(&format!("{}: {}\n", label, issue.message));
        }

        let errors = issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count();
        let warnings = issues.len() - errors;
        let summary = format!("{} error(s), {} warning(s)", errors, warnings);
        if errors > 0 {
            output.push_str(&format!("{}\n", summary.red()));
        } else {
            output.push_str(&format!("{} {}\n", "OK".green().bold(), summary));
        }
        output
    }

    fn route_line(result: &ExecutionResult) -> String {
        let mode = match result.mode {
            RoutingMode::Single => "single".cyan(),
            RoutingMode::Comparison => "comparison".magenta(),
        };
        let agents = if result.agents_used.is_empty() {
            "-".to_string()
        } else {
            result.agents_used.iter().cloned().collect::<Vec<_>>().join(", ")
        };
        format!(
            "{} {}  {} {}",
            "mode:".dimmed(),
            mode,
            "agents:".dimmed(),
            agents
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, result: &ExecutionResult) -> String {
        Self::format(result)
    }

    fn format_detailed(&self, result: &ExecutionResult) -> String {
        Self::format_detailed(result)
    }

    fn format_json(&self, result: &ExecutionResult) -> String {
        Self::format_json(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use switchyard_application::AgentSummary;
    use switchyard_domain::{ConfigIssueCode, ObservationLimit, RawStep};

    fn result() -> ExecutionResult {
        let agents: HashSet<String> = ["HR_Agent".to_string()].into();
        ExecutionResult::from_steps(
            "Bạn có 12 ngày phép mỗi năm.",
            RoutingMode::Single,
            vec![
                RawStep::new("knowledge_search_tool", "{\"query\":\"nghỉ phép\"}", "12 ngày phép/năm"),
                RawStep::new("HR_Agent", "{\"input_query\":\"nghỉ phép\"}", "12 ngày"),
            ],
            &agents,
            ObservationLimit::Unbounded,
        )
    }

    #[test]
    fn test_format_contains_response_and_route() {
        colored::control::set_override(false);
        let out = ConsoleFormatter::format(&result());
        assert!(out.contains("mode: single"));
        assert!(out.contains("agents: HR_Agent"));
        assert!(out.contains("Bạn có 12 ngày phép mỗi năm."));
        assert!(!out.contains("Error:"));
    }

    #[test]
    fn test_format_detailed_lists_steps() {
        colored::control::set_override(false);
        let out = ConsoleFormatter::format_detailed(&result());
        assert!(out.contains("Execution trace (2 steps)"));
        assert!(out.contains("#1 knowledge_search_tool"));
        assert!(out.contains("    12 ngày phép/năm"));
    }

    #[test]
    fn test_format_json_uses_wire_names() {
        let json: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&result())).unwrap();
        assert_eq!(json["total_steps"], 2);
        assert_eq!(json["mode"], "single");
        assert_eq!(json["execution_steps"][1]["actor_name"], "HR_Agent");
    }

    #[test]
    fn test_format_agents_and_issues() {
        colored::control::set_override(false);
        let info = AgentInfo {
            total_agents: 1,
            agents: vec![AgentSummary {
                name: "HR_Agent".into(),
                description: "HR policies".into(),
                tools: vec!["knowledge_search_tool".into()],
            }],
        };
        let out = ConsoleFormatter::format_agents(&info);
        assert!(out.contains("Agents (1)"));
        assert!(out.contains("tools: knowledge_search_tool"));

        let issues = vec![
            ConfigIssue::warning(ConfigIssueCode::MissingApiKey, "GEMINI_API_KEY is not set"),
            ConfigIssue::error(ConfigIssueCode::UnknownToolReference, "unknown tool 'x'"),
        ];
        let out = ConsoleFormatter::format_issues(&issues);
        assert!(out.contains("warning: GEMINI_API_KEY is not set"));
        assert!(out.contains("1 error(s), 1 warning(s)"));
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "> "), "> a\n> b");
    }
}
