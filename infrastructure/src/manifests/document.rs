//! JSON manifest documents
//!
//! Wire shapes of `tools.json` and `agents.json`. These are parsed leniently
//! (unknown fields ignored, most fields optional) and converted into domain
//! definitions; structural validation happens later, on reload.

use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use switchyard_application::ConfigLoadError;
use switchyard_domain::{
    AgentDefinition, Arguments, DEFAULT_MODEL_NAME, DEFAULT_TEMPERATURE, GenerationParams,
    ParameterKind, ParameterSpec, ToolDefinition,
};

#[derive(Debug, Deserialize)]
struct ToolDocument {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    file: String,
    #[serde(default)]
    parameters: BTreeMap<String, ParameterDocument>,
}

#[derive(Debug, Deserialize)]
struct ParameterDocument {
    #[serde(rename = "type", default)]
    type_name: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    default: Option<Value>,
    #[serde(default)]
    is_credential: bool,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct AgentDocument {
    #[serde(default)]
    agent_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tools: Vec<String>,
    #[serde(default)]
    tool_configs: HashMap<String, Arguments>,
    #[serde(default)]
    llm_config: LlmConfigDocument,
    #[serde(default)]
    categories: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmConfigDocument {
    model_name: Option<String>,
    temperature: Option<f32>,
}

impl From<ParameterDocument> for ParameterSpec {
    fn from(doc: ParameterDocument) -> Self {
        let kind = doc
            .type_name
            .as_deref()
            .map(ParameterKind::from_type_name)
            .unwrap_or_default();
        ParameterSpec {
            kind,
            required: doc.required,
            default: doc.default,
            is_credential: doc.is_credential,
            description: doc.description,
        }
    }
}

impl From<ToolDocument> for ToolDefinition {
    fn from(doc: ToolDocument) -> Self {
        let display_name = doc
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| doc.id.clone());
        ToolDefinition {
            id: doc.id,
            display_name,
            description: doc.description,
            file: doc.file,
            parameters: doc
                .parameters
                .into_iter()
                .map(|(name, p)| (name, p.into()))
                .collect(),
        }
    }
}

impl From<AgentDocument> for AgentDefinition {
    fn from(doc: AgentDocument) -> Self {
        AgentDefinition {
            name: doc.agent_name,
            description: doc.description,
            tool_ids: doc.tools,
            tool_configs: doc.tool_configs,
            generation: GenerationParams::new(
                doc.llm_config
                    .model_name
                    .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
                doc.llm_config.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            ),
            categories: doc.categories,
        }
    }
}

/// Parse a tool manifest (a JSON array of tool entries).
pub fn parse_tool_manifest(document: &str, json: &str) -> Result<Vec<ToolDefinition>, ConfigLoadError> {
    let docs: Vec<ToolDocument> = serde_json::from_str(json).map_err(|e| ConfigLoadError::Parse {
        document: document.to_string(),
        message: e.to_string(),
    })?;
    Ok(docs.into_iter().map(ToolDefinition::from).collect())
}

/// Parse an agent manifest (a JSON array of agent entries).
pub fn parse_agent_manifest(
    document: &str,
    json: &str,
) -> Result<Vec<AgentDefinition>, ConfigLoadError> {
    let docs: Vec<AgentDocument> = serde_json::from_str(json).map_err(|e| ConfigLoadError::Parse {
        document: document.to_string(),
        message: e.to_string(),
    })?;
    Ok(docs.into_iter().map(AgentDefinition::from).collect())
}
