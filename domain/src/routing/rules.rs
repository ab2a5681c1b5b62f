//! Routing rules: comparison phrases and business categories.

use serde::{Deserialize, Serialize};

/// A business category recognised in user text (e.g. `fnb`, `booking`).
///
/// `id` doubles as the token searched for in agent names when an agent
/// declares no explicit category tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Category {
    pub fn new(id: impl Into<String>, aliases: &[&str]) -> Self {
        Self {
            id: id.into(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Number of distinct aliases present in already-lowercased text.
    pub fn match_count(&self, lowered: &str) -> usize {
        self.aliases
            .iter()
            .filter(|alias| !alias.is_empty() && lowered.contains(&alias.to_lowercase()))
            .count()
    }

    pub fn matches(&self, lowered: &str) -> bool {
        self.match_count(lowered) > 0
    }
}

/// Phrases and categories driving the comparison heuristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingRules {
    pub comparison_phrases: Vec<String>,
    pub categories: Vec<Category>,
}

impl Default for RoutingRules {
    fn default() -> Self {
        Self {
            comparison_phrases: [
                "so sánh",
                "khác nhau",
                "khác biệt",
                "nên chọn",
                "tốt hơn",
                "compare",
                "comparison",
                "difference",
                "versus",
                " vs ",
                "which is better",
                "choose between",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
            categories: vec![
                Category::new(
                    "fnb",
                    &["fnb", "f&b", "nhà hàng", "quán ăn", "cafe", "cà phê", "restaurant"],
                ),
                Category::new(
                    "booking",
                    &["booking", "đặt lịch", "đặt chỗ", "spa", "salon", "appointment"],
                ),
                Category::new(
                    "retail",
                    &["retail", "bán lẻ", "cửa hàng", "siêu thị", "store"],
                ),
            ],
        }
    }
}

impl RoutingRules {
    pub fn is_comparison_phrase(&self, lowered: &str) -> bool {
        self.comparison_phrases
            .iter()
            .any(|p| !p.is_empty() && lowered.contains(&p.to_lowercase()))
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id.eq_ignore_ascii_case(id))
    }
}
