//! Agent domain entities

use crate::core::error::ManifestError;
use crate::tool::Arguments;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Default model used when an agent omits `llm_config.model_name`
pub const DEFAULT_MODEL_NAME: &str = "gemini-2.0-flash";
/// Default temperature used when an agent omits `llm_config.temperature`
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Generation parameters handed to the decision service untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub model_name: String,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL_NAME.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl GenerationParams {
    pub fn new(model_name: impl Into<String>, temperature: f32) -> Self {
        Self {
            model_name: model_name.into(),
            temperature,
        }
    }
}

/// Declarative agent entry from the agent manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDefinition {
    /// Human label, before sanitization
    pub name: String,
    pub description: String,
    /// Tool ids in declaration order (duplicates are ignored at assembly)
    pub tool_ids: Vec<String>,
    /// Per-tool credentials and fixed parameters
    #[serde(default)]
    pub tool_configs: HashMap<String, Arguments>,
    #[serde(default)]
    pub generation: GenerationParams,
    /// Explicit category tags used by comparison routing
    #[serde(default)]
    pub categories: Vec<String>,
}

impl AgentDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            tool_ids: Vec::new(),
            tool_configs: HashMap::new(),
            generation: GenerationParams::default(),
            categories: Vec::new(),
        }
    }

    pub fn with_tool(mut self, tool_id: impl Into<String>) -> Self {
        self.tool_ids.push(tool_id.into());
        self
    }

    pub fn with_tool_config(mut self, tool_id: impl Into<String>, config: Arguments) -> Self {
        self.tool_configs.insert(tool_id.into(), config);
        self
    }

    pub fn with_generation(mut self, generation: GenerationParams) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// Tool ids with duplicates removed, first occurrence wins.
    pub fn unique_tool_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.tool_ids
            .iter()
            .map(String::as_str)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Agent config for one tool; missing entries behave like `{}`.
    pub fn tool_config(&self, tool_id: &str) -> Arguments {
        self.tool_configs.get(tool_id).cloned().unwrap_or_default()
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(category))
    }
}

/// Check the structural rules every agent manifest must satisfy.
pub fn validate_agent_definitions(agents: &[AgentDefinition]) -> Result<(), ManifestError> {
    if agents.is_empty() {
        return Err(ManifestError::EmptyAgentManifest);
    }
    if let Some(index) = agents.iter().position(|a| a.name.trim().is_empty()) {
        return Err(ManifestError::MissingAgentName { index });
    }
    Ok(())
}
