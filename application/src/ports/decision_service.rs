//! Decision service port
//!
//! The decision service is the text-generation / function-calling backend.
//! Given a system prompt, the user input, a manifest of callable tools and
//! the calls made so far, it answers either with plain text or with a single
//! tool call. This core builds the manifest and interprets the answer; it
//! never performs generation itself.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use switchyard_domain::{Arguments, GenerationParams, ParameterSchema};
use thiserror::Error;

/// Errors that can occur while talking to the decision service
#[derive(Error, Debug)]
pub enum DecisionError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// One callable entry in the manifest sent with a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolManifestEntry {
    /// Sanitized function name
    pub name: String,
    pub description: String,
    /// JSON Schema of the arguments
    pub parameters: Value,
}

impl ToolManifestEntry {
    pub fn new(name: impl Into<String>, description: impl Into<String>, schema: &ParameterSchema) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: schema.to_json_schema(),
        }
    }
}

/// A tool call already made in this request, with what it returned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScratchpadEntry {
    pub tool_name: String,
    pub arguments: Arguments,
    pub observation: String,
}

/// Everything the decision service needs for one decision
#[derive(Debug, Clone)]
pub struct DecisionRequest {
    pub system_prompt: String,
    pub user_input: String,
    pub tools: Vec<ToolManifestEntry>,
    pub scratchpad: Vec<ScratchpadEntry>,
    pub generation: GenerationParams,
}

impl DecisionRequest {
    pub fn new(
        system_prompt: impl Into<String>,
        user_input: impl Into<String>,
        generation: GenerationParams,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_input: user_input.into(),
            tools: Vec::new(),
            scratchpad: Vec::new(),
            generation,
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolManifestEntry>) -> Self {
        self.tools = tools;
        self
    }
}

/// What the decision service chose to do
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Text(String),
    ToolCall { name: String, arguments: Arguments },
}

/// Port for the function-calling backend.
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait DecisionService: Send + Sync {
    /// Decide the next step for the request.
    async fn decide(&self, request: &DecisionRequest) -> Result<Decision, DecisionError>;

    /// Plain generation without tools (synthesis, titles).
    async fn generate(
        &self,
        system_prompt: &str,
        user_input: &str,
        generation: &GenerationParams,
    ) -> Result<String, DecisionError> {
        let request = DecisionRequest::new(system_prompt, user_input, generation.clone());
        match self.decide(&request).await? {
            Decision::Text(text) => Ok(text),
            Decision::ToolCall { name, .. } => Err(DecisionError::InvalidResponse(format!(
                "tool call '{}' returned for a request without tools",
                name
            ))),
        }
    }
}
