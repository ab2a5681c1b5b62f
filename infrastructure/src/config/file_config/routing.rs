//! Routing rules from TOML (`[routing]` section)

use serde::{Deserialize, Serialize};
use switchyard_domain::{Category, ConfigIssue, ConfigIssueCode, RoutingRules};

/// A routing category and the aliases that detect it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCategory {
    pub id: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Comparison-mode detection rules
///
/// Omitted keys keep the built-in phrases and categories.
///
/// # Example
///
/// ```toml
/// [routing]
/// comparison_phrases = ["so sánh", "compare", " vs "]
///
/// [[routing.categories]]
/// id = "fnb"
/// aliases = ["fnb", "f&b", "nhà hàng"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRoutingConfig {
    pub comparison_phrases: Option<Vec<String>>,
    pub categories: Option<Vec<FileCategory>>,
}

impl FileRoutingConfig {
    pub fn to_rules(&self) -> (RoutingRules, Vec<ConfigIssue>) {
        let mut rules = RoutingRules::default();
        let mut issues = Vec::new();

        if let Some(phrases) = &self.comparison_phrases {
            rules.comparison_phrases = phrases
                .iter()
                .filter(|p| !p.trim().is_empty())
                .map(|p| p.to_lowercase())
                .collect();
            if rules.comparison_phrases.is_empty() {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::NoComparisonPhrases,
                    "routing.comparison_phrases is empty; comparison mode will never trigger",
                ));
            }
        }

        if let Some(categories) = &self.categories {
            rules.categories = categories
                .iter()
                .filter_map(|c| {
                    let aliases: Vec<&str> = c
                        .aliases
                        .iter()
                        .map(String::as_str)
                        .filter(|a| !a.trim().is_empty())
                        .collect();
                    if aliases.is_empty() {
                        issues.push(ConfigIssue::warning(
                            ConfigIssueCode::CategoryWithoutAliases,
                            format!("routing.categories: '{}' has no aliases and is ignored", c.id),
                        ));
                        return None;
                    }
                    Some(Category::new(c.id.to_lowercase(), &aliases))
                })
                .collect();
        }

        (rules, issues)
    }
}
