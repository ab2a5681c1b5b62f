//! Execution trace domain module
//!
//! An [`ExecutionResult`] is the per-request record of what the router did:
//! the final response, which actors were invoked in which order, and what they
//! returned (bounded by an [`ObservationLimit`]).

use crate::core::string::truncate;
use crate::routing::RoutingMode;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Bound applied to step observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationLimit {
    Chars(usize),
    Unbounded,
}

impl ObservationLimit {
    /// Bound used by the simple (response-only) API.
    pub const SIMPLE: ObservationLimit = ObservationLimit::Chars(200);

    pub fn apply(&self, observation: &str) -> String {
        match self {
            ObservationLimit::Chars(max) => truncate(observation, *max),
            ObservationLimit::Unbounded => observation.to_string(),
        }
    }
}

/// One raw `(actor, input, output)` triple as observed during dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStep {
    pub actor_name: String,
    pub input: String,
    pub output: String,
}

impl RawStep {
    pub fn new(
        actor_name: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            actor_name: actor_name.into(),
            input: input.into(),
            output: output.into(),
        }
    }
}

/// A recorded invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStep {
    pub actor_name: String,
    pub input: String,
    pub observation: String,
    /// 1-based ordinal in call order
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub response: String,
    pub agents_used: BTreeSet<String>,
    pub tools_used: BTreeSet<String>,
    #[serde(rename = "execution_steps")]
    pub steps: Vec<ExecutionStep>,
    pub total_steps: usize,
    pub mode: RoutingMode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detected_categories: Vec<String>,
    /// Diagnostic channel; never shown in place of `response`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    /// Build a result from raw steps.
    ///
    /// `agents_used` is every actor whose name is one of `agent_names`, so it
    /// is always a subset of `tools_used`.
    pub fn from_steps(
        response: impl Into<String>,
        mode: RoutingMode,
        raw_steps: Vec<RawStep>,
        agent_names: &HashSet<String>,
        limit: ObservationLimit,
    ) -> Self {
        let tools_used: BTreeSet<String> =
            raw_steps.iter().map(|s| s.actor_name.clone()).collect();
        let agents_used = tools_used
            .iter()
            .filter(|name| agent_names.contains(*name))
            .cloned()
            .collect();
        let steps: Vec<ExecutionStep> = raw_steps
            .into_iter()
            .enumerate()
            .map(|(i, raw)| ExecutionStep {
                observation: limit.apply(&raw.output),
                actor_name: raw.actor_name,
                input: raw.input,
                position: i + 1,
            })
            .collect();

        Self {
            response: response.into(),
            agents_used,
            tools_used,
            total_steps: steps.len(),
            steps,
            mode,
            detected_categories: Vec::new(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_detected_categories(mut self, categories: Vec<String>) -> Self {
        self.detected_categories = categories;
        self
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
