//! Routing domain module
//!
//! Pure decision procedure for single delegation versus comparison fan-out.
//! The actual dispatch (decision-service calls, concurrency) lives in the
//! application layer.

pub mod analysis;
pub mod rules;

pub use analysis::{
    KeywordScore, RoutingAnalysis, RoutingCandidate, RoutingDecision, RoutingMode,
    keyword_confidence, resolve_targets,
};
pub use rules::{Category, RoutingRules};
