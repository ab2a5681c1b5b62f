//! Dispatch configuration from TOML (`[dispatch]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use switchyard_application::DispatchParams;
use switchyard_domain::{ConfigIssue, ConfigIssueCode, GenerationParams, ObservationLimit};

/// Router and agent loop settings
///
/// # Example
///
/// ```toml
/// [dispatch]
/// max_router_iterations = 5
/// max_agent_iterations = 3
/// target_timeout_secs = 60
/// simple_observation_limit = 200   # 0 keeps full observations
/// response_language = "Vietnamese"
/// router_temperature = 0.1
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDispatchConfig {
    pub max_router_iterations: usize,
    pub max_agent_iterations: usize,
    pub target_timeout_secs: u64,
    pub simple_observation_limit: usize,
    pub response_language: String,
    pub router_temperature: f32,
}

impl Default for FileDispatchConfig {
    fn default() -> Self {
        let params = DispatchParams::default();
        Self {
            max_router_iterations: params.max_router_iterations,
            max_agent_iterations: params.max_agent_iterations,
            target_timeout_secs: params.target_timeout.as_secs(),
            simple_observation_limit: match params.simple_observation_limit {
                ObservationLimit::Chars(n) => n,
                ObservationLimit::Unbounded => 0,
            },
            response_language: params.response_language,
            router_temperature: params.router_generation.temperature,
        }
    }
}

impl FileDispatchConfig {
    /// Convert to [`DispatchParams`], routing with `router_model`.
    ///
    /// Zero limits are reported and replaced by the defaults.
    pub fn to_params(&self, router_model: &str) -> (DispatchParams, Vec<ConfigIssue>) {
        let defaults = DispatchParams::default();
        let mut issues = Vec::new();

        let mut nonzero = |field: &str, value: u64, default: u64| -> u64 {
            if value == 0 {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::ZeroDispatchLimit,
                    format!("dispatch.{}: must be greater than 0, using {}", field, default),
                ));
                default
            } else {
                value
            }
        };

        let max_router_iterations = nonzero(
            "max_router_iterations",
            self.max_router_iterations as u64,
            defaults.max_router_iterations as u64,
        ) as usize;
        let max_agent_iterations = nonzero(
            "max_agent_iterations",
            self.max_agent_iterations as u64,
            defaults.max_agent_iterations as u64,
        ) as usize;
        let target_timeout_secs = nonzero(
            "target_timeout_secs",
            self.target_timeout_secs,
            defaults.target_timeout.as_secs(),
        );

        let limit = match self.simple_observation_limit {
            0 => ObservationLimit::Unbounded,
            n => ObservationLimit::Chars(n),
        };

        let params = defaults
            .with_max_router_iterations(max_router_iterations)
            .with_max_agent_iterations(max_agent_iterations)
            .with_target_timeout(Duration::from_secs(target_timeout_secs))
            .with_simple_observation_limit(limit)
            .with_response_language(self.response_language.clone())
            .with_router_generation(GenerationParams::new(router_model, self.router_temperature));

        (params, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip_to_params() {
        let (params, issues) = FileDispatchConfig::default().to_params("gemini-2.0-flash");
        assert!(issues.is_empty());
        assert_eq!(params.max_router_iterations, 5);
        assert_eq!(params.max_agent_iterations, 3);
        assert_eq!(params.target_timeout, Duration::from_secs(60));
        assert_eq!(params.simple_observation_limit, ObservationLimit::Chars(200));
        assert_eq!(params.router_generation.temperature, 0.1);
    }

    #[test]
    fn test_zero_limits_reported() {
        let config = FileDispatchConfig {
            max_router_iterations: 0,
            target_timeout_secs: 0,
            simple_observation_limit: 0,
            ..Default::default()
        };
        let (params, issues) = config.to_params("m");
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.code == ConfigIssueCode::ZeroDispatchLimit));
        assert_eq!(params.max_router_iterations, 5);
        assert_eq!(params.simple_observation_limit, ObservationLimit::Unbounded);
    }
}
