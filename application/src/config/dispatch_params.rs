//! Dispatch parameters: router and agent loop control.
//!
//! [`DispatchParams`] groups the static parameters that control the router
//! loop, each agent's tool loop, comparison fan-out and observation bounds.
//! They are read from the `[dispatch]` config section at startup.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use switchyard_domain::{GenerationParams, ObservationLimit};

/// Language used when none is configured.
pub const DEFAULT_RESPONSE_LANGUAGE: &str = "Vietnamese";

/// Router and agent loop control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchParams {
    /// Maximum decision rounds of the router in single mode.
    pub max_router_iterations: usize,
    /// Maximum tool rounds inside one agent invocation.
    pub max_agent_iterations: usize,
    /// Bound on each comparison target.
    pub target_timeout: Duration,
    /// Observation bound used by the simple API.
    pub simple_observation_limit: ObservationLimit,
    /// Language every final answer must be written in.
    pub response_language: String,
    /// Generation parameters for routing, synthesis and titles.
    pub router_generation: GenerationParams,
}

impl Default for DispatchParams {
    fn default() -> Self {
        Self {
            max_router_iterations: 5,
            max_agent_iterations: 3,
            target_timeout: Duration::from_secs(60),
            simple_observation_limit: ObservationLimit::SIMPLE,
            response_language: DEFAULT_RESPONSE_LANGUAGE.to_string(),
            router_generation: GenerationParams::new("gemini-2.0-flash", 0.1),
        }
    }
}

impl DispatchParams {
    // ==================== Builder Methods ====================

    pub fn with_max_router_iterations(mut self, max: usize) -> Self {
        self.max_router_iterations = max;
        self
    }

    pub fn with_max_agent_iterations(mut self, max: usize) -> Self {
        self.max_agent_iterations = max;
        self
    }

    pub fn with_target_timeout(mut self, timeout: Duration) -> Self {
        self.target_timeout = timeout;
        self
    }

    pub fn with_simple_observation_limit(mut self, limit: ObservationLimit) -> Self {
        self.simple_observation_limit = limit;
        self
    }

    pub fn with_response_language(mut self, language: impl Into<String>) -> Self {
        self.response_language = language.into();
        self
    }

    pub fn with_router_generation(mut self, generation: GenerationParams) -> Self {
        self.router_generation = generation;
        self
    }
}
