//! Comparison-mode analysis and target resolution.
//!
//! The heuristic is advisory: it only decides whether a request is worth a
//! fan-out. Comparison mode needs a comparison phrase, at least two detected
//! categories, and at least two distinct agents resolvable for them. Anything
//! less falls back to single delegation.

use super::rules::RoutingRules;
use serde::{Deserialize, Serialize};

/// Dispatch mode chosen for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    #[default]
    Single,
    Comparison,
}

impl RoutingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingMode::Single => "single",
            RoutingMode::Comparison => "comparison",
        }
    }
}

impl std::fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword score of one category (diagnostic only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordScore {
    pub category: String,
    pub matches: usize,
    pub confidence: f64,
}

/// `min(matches / 3, 1.0)` rounded to two decimals.
pub fn keyword_confidence(matches: usize) -> f64 {
    let raw = (matches as f64 / 3.0).min(1.0);
    (raw * 100.0).round() / 100.0
}

/// What the heuristic saw in the raw user text
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoutingAnalysis {
    pub is_comparison_phrase: bool,
    pub detected_categories: Vec<String>,
    pub keyword_scores: Vec<KeywordScore>,
}

impl RoutingAnalysis {
    pub fn analyze(rules: &RoutingRules, text: &str) -> Self {
        let lowered = text.to_lowercase();
        let mut detected_categories = Vec::new();
        let mut keyword_scores = Vec::new();

        for category in &rules.categories {
            let matches = category.match_count(&lowered);
            if matches > 0 {
                detected_categories.push(category.id.clone());
                keyword_scores.push(KeywordScore {
                    category: category.id.clone(),
                    matches,
                    confidence: keyword_confidence(matches),
                });
            }
        }

        Self {
            is_comparison_phrase: rules.is_comparison_phrase(&lowered),
            detected_categories,
            keyword_scores,
        }
    }

    /// Phrase present and at least two categories detected.
    pub fn wants_comparison(&self) -> bool {
        self.is_comparison_phrase && self.detected_categories.len() >= 2
    }

    /// Highest-scoring category, if any matched.
    pub fn best_category(&self) -> Option<&KeywordScore> {
        self.keyword_scores
            .iter()
            .max_by(|a, b| a.matches.cmp(&b.matches).then_with(|| b.category.cmp(&a.category)))
    }
}

/// Anything the router can resolve a category to.
pub trait RoutingCandidate {
    /// Sanitized, unique name of the candidate.
    fn routing_name(&self) -> &str;
    /// Explicit category tags; empty means "match by name".
    fn category_tags(&self) -> &[String];

    fn serves_category(&self, category: &str) -> bool {
        let tags = self.category_tags();
        if tags.is_empty() {
            self.routing_name()
                .to_lowercase()
                .contains(&category.to_lowercase())
        } else {
            tags.iter().any(|t| t.eq_ignore_ascii_case(category))
        }
    }
}

impl<T: RoutingCandidate + ?Sized> RoutingCandidate for std::sync::Arc<T> {
    fn routing_name(&self) -> &str {
        (**self).routing_name()
    }

    fn category_tags(&self) -> &[String] {
        (**self).category_tags()
    }
}

/// Outcome of routing analysis for one request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoutingDecision {
    pub mode: RoutingMode,
    /// Sanitized names of the fan-out targets (empty in single mode)
    pub targets: Vec<String>,
    pub detected_categories: Vec<String>,
    pub keyword_scores: Vec<KeywordScore>,
    /// Comparison was wanted but fewer than two targets resolved
    pub fell_back: bool,
}

impl RoutingDecision {
    /// Decide the dispatch mode against the currently assembled candidates.
    pub fn decide<T: RoutingCandidate>(analysis: RoutingAnalysis, candidates: &[T]) -> Self {
        let mut decision = Self {
            mode: RoutingMode::Single,
            targets: Vec::new(),
            detected_categories: analysis.detected_categories.clone(),
            keyword_scores: analysis.keyword_scores.clone(),
            fell_back: false,
        };

        if !analysis.wants_comparison() {
            return decision;
        }

        let targets = resolve_targets(&analysis.detected_categories, candidates);
        if targets.len() >= 2 {
            decision.mode = RoutingMode::Comparison;
            decision.targets = targets;
        } else {
            decision.fell_back = true;
        }
        decision
    }
}

/// First unused candidate serving each category, in category order.
pub fn resolve_targets<T: RoutingCandidate>(categories: &[String], candidates: &[T]) -> Vec<String> {
    let mut targets: Vec<String> = Vec::new();
    for category in categories {
        let found = candidates.iter().find(|c| {
            c.serves_category(category) && !targets.iter().any(|t| t == c.routing_name())
        });
        if let Some(candidate) = found {
            targets.push(candidate.routing_name().to_string());
        }
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Candidate {
        name: String,
        tags: Vec<String>,
    }

    impl Candidate {
        fn named(name: &str) -> Self {
            Self {
                name: name.to_string(),
                tags: Vec::new(),
            }
        }

        fn tagged(name: &str, tags: &[&str]) -> Self {
            Self {
                name: name.to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            }
        }
    }

    impl RoutingCandidate for Candidate {
        fn routing_name(&self) -> &str {
            &self.name
        }

        fn category_tags(&self) -> &[String] {
            &self.tags
        }
    }

    const COMPARE: &str = "So sánh mô hình FNB và Booking";

    #[test]
    fn test_keyword_confidence() {
        assert_eq!(keyword_confidence(0), 0.0);
        assert_eq!(keyword_confidence(1), 0.33);
        assert_eq!(keyword_confidence(2), 0.67);
        assert_eq!(keyword_confidence(3), 1.0);
        assert_eq!(keyword_confidence(7), 1.0);
    }

    #[test]
    fn test_analysis_detects_phrase_and_categories() {
        let analysis = RoutingAnalysis::analyze(&RoutingRules::default(), COMPARE);
        assert!(analysis.is_comparison_phrase);
        assert_eq!(analysis.detected_categories, vec!["fnb", "booking"]);
        assert!(analysis.wants_comparison());
    }

    #[test]
    fn test_two_resolvable_agents_select_comparison() {
        let agents = vec![
            Candidate::named("HR_Agent"),
            Candidate::named("FNB_Agent"),
            Candidate::named("Booking_Agent"),
        ];
        let analysis = RoutingAnalysis::analyze(&RoutingRules::default(), COMPARE);
        let decision = RoutingDecision::decide(analysis, &agents);
        assert_eq!(decision.mode, RoutingMode::Comparison);
        assert_eq!(decision.targets, vec!["FNB_Agent", "Booking_Agent"]);
        assert!(!decision.fell_back);
    }

    #[test]
    fn test_one_resolvable_agent_falls_back_to_single() {
        let agents = vec![Candidate::named("HR_Agent"), Candidate::named("FNB_Agent")];
        let analysis = RoutingAnalysis::analyze(&RoutingRules::default(), COMPARE);
        let decision = RoutingDecision::decide(analysis, &agents);
        assert_eq!(decision.mode, RoutingMode::Single);
        assert!(decision.targets.is_empty());
        assert!(decision.fell_back);
    }

    #[test]
    fn test_no_phrase_is_single_regardless_of_categories() {
        let agents = vec![Candidate::named("FNB_Agent"), Candidate::named("Booking_Agent")];
        let analysis =
            RoutingAnalysis::analyze(&RoutingRules::default(), "Mô hình FNB và Booking, retail");
        assert_eq!(analysis.detected_categories.len(), 3);
        let decision = RoutingDecision::decide(analysis, &agents);
        assert_eq!(decision.mode, RoutingMode::Single);
        assert!(!decision.fell_back);
    }

    #[test]
    fn test_explicit_tags_override_name_matching() {
        // Tagged agent whose name contains "booking" but serves only retail.
        let agents = vec![
            Candidate::tagged("Rebooking_Desk", &["retail"]),
            Candidate::named("Cafe_FNB"),
            Candidate::tagged("Scheduler", &["booking"]),
        ];
        let targets = resolve_targets(&["fnb".to_string(), "booking".to_string()], &agents);
        assert_eq!(targets, vec!["Cafe_FNB", "Scheduler"]);
    }

    #[test]
    fn test_each_agent_used_once() {
        let agents = vec![Candidate::tagged("Generalist", &["fnb", "booking"])];
        let targets = resolve_targets(&["fnb".to_string(), "booking".to_string()], &agents);
        assert_eq!(targets, vec!["Generalist"]);
    }

    #[test]
    fn test_best_category() {
        let analysis =
            RoutingAnalysis::analyze(&RoutingRules::default(), "nhà hàng fnb hay spa booking cafe");
        let best = analysis.best_category().unwrap();
        assert_eq!(best.category, "fnb");
        assert_eq!(best.matches, 3);
        assert_eq!(best.confidence, 1.0);
    }
}
