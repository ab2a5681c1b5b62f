//! Agent assembler and the agent tool loop
//!
//! An [`Agent`] is an assembled [`AgentDefinition`]: a sanitized name, a
//! system prompt, and the tool instances its config could satisfy. The
//! router sees every agent as a single callable target taking one
//! `input_query` string.

use crate::config::DispatchParams;
use crate::ports::decision_service::{
    Decision, DecisionError, DecisionRequest, DecisionService, ScratchpadEntry, ToolManifestEntry,
};
use crate::ports::progress::DispatchProgress;
use crate::use_cases::build_tool::{ToolFactory, ToolInstance};
use crate::use_cases::trace_recorder::TraceRecorder;
use serde_json::Value;
use std::collections::HashSet;
use switchyard_domain::{
    AgentAssemblyError, AgentDefinition, GenerationParams, ParameterSchema, PromptTemplate,
    RoutingCandidate, SanitizedName, ToolManifest,
};
use tracing::{debug, info, warn};

/// The single parameter of every agent exposed to the router
pub const AGENT_INPUT_PARAM: &str = "input_query";

/// Returned when an agent hits its iteration limit without a final answer
const ITERATION_LIMIT_NOTICE: &str = "Agent stopped due to iteration limit.";

/// An assembled specialist agent
#[derive(Debug, Clone)]
pub struct Agent {
    name: String,
    original_name: String,
    description: String,
    tools: Vec<ToolInstance>,
    generation: GenerationParams,
    system_prompt: String,
    categories: Vec<String>,
    max_iterations: usize,
}

impl Agent {
    /// Sanitized name, unique within a snapshot
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name as written in the agent manifest
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tools(&self) -> &[ToolInstance] {
        &self.tools
    }

    pub fn generation(&self) -> &GenerationParams {
        &self.generation
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn tool(&self, name: &str) -> Option<&ToolInstance> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// How the router sees this agent.
    pub fn manifest_entry(&self) -> ToolManifestEntry {
        ToolManifestEntry::new(
            &self.name,
            &self.description,
            &ParameterSchema::single_string(
                AGENT_INPUT_PARAM,
                "The complete user request, including any relevant context",
            ),
        )
    }

    fn tool_entries(&self) -> Vec<ToolManifestEntry> {
        self.tools
            .iter()
            .map(|t| ToolManifestEntry::new(t.name(), t.description(), t.schema()))
            .collect()
    }

    /// Run the agent's tool loop on one input.
    ///
    /// Every tool call is recorded on `recorder`. Tool failures come back as
    /// observations; only decision-service errors are returned as `Err`.
    pub async fn run(
        &self,
        service: &dyn DecisionService,
        input: &str,
        recorder: &TraceRecorder,
        progress: &dyn DispatchProgress,
    ) -> Result<String, DecisionError> {
        let mut request = DecisionRequest::new(&self.system_prompt, input, self.generation.clone())
            .with_tools(self.tool_entries());

        for iteration in 0..self.max_iterations {
            let (name, arguments) = match service.decide(&request).await? {
                Decision::Text(text) => return Ok(text),
                Decision::ToolCall { name, arguments } => (name, arguments),
            };
            debug!(agent = %self.name, tool = %name, iteration, "Agent called tool");
            progress.on_tool_call(&self.name, &name);

            let observation = match self.tool(&name) {
                Some(tool) => {
                    let result = tool.invoke(arguments.clone()).await;
                    let observation = result.observation();
                    recorder.record(
                        tool.name(),
                        Value::Object(arguments.clone()).to_string(),
                        &observation,
                    );
                    observation
                }
                None => {
                    let available: Vec<&str> = self.tools.iter().map(|t| t.name()).collect();
                    PromptTemplate::unknown_tool(&name, &available)
                }
            };

            request.scratchpad.push(ScratchpadEntry {
                tool_name: name,
                arguments,
                observation,
            });
        }

        warn!(agent = %self.name, limit = self.max_iterations, "Agent reached iteration limit");
        request.tools.clear();
        match service.decide(&request).await? {
            Decision::Text(text) => Ok(text),
            Decision::ToolCall { .. } => Ok(request
                .scratchpad
                .last()
                .map(|entry| entry.observation.clone())
                .unwrap_or_else(|| ITERATION_LIMIT_NOTICE.to_string())),
        }
    }
}

impl RoutingCandidate for Agent {
    fn routing_name(&self) -> &str {
        &self.name
    }

    fn category_tags(&self) -> &[String] {
        &self.categories
    }
}

/// Turns agent definitions into [`Agent`]s
#[derive(Clone)]
pub struct AgentAssembler {
    factory: ToolFactory,
    language: String,
    max_iterations: usize,
}

impl AgentAssembler {
    pub fn new(factory: ToolFactory, params: &DispatchParams) -> Self {
        Self {
            factory,
            language: params.response_language.clone(),
            max_iterations: params.max_agent_iterations,
        }
    }

    pub fn factory(&self) -> &ToolFactory {
        &self.factory
    }

    /// Assemble one agent.
    ///
    /// Unknown tool ids and tools that fail to build are skipped with a
    /// warning; only an empty resulting tool list is an error.
    pub fn assemble(
        &self,
        definition: &AgentDefinition,
        manifest: &ToolManifest,
    ) -> Result<Agent, AgentAssemblyError> {
        let name = SanitizedName::new(&definition.name);
        if name.was_changed() {
            warn!(
                original = %name.original,
                sanitized = %name.sanitized,
                "Agent name sanitized for the decision service"
            );
        }

        let mut tools: Vec<ToolInstance> = Vec::new();
        let mut display_names = HashSet::new();

        for tool_id in definition.unique_tool_ids() {
            let Some(tool_definition) = manifest.get(tool_id) else {
                warn!(agent = %definition.name, tool = tool_id, "Tool not found in manifest, skipping");
                continue;
            };

            match self
                .factory
                .build(tool_definition, &definition.tool_config(tool_id))
            {
                Ok(tool) => {
                    if !display_names.insert(tool.display_name().to_string()) {
                        debug!(
                            agent = %definition.name,
                            tool = tool_id,
                            display_name = tool.display_name(),
                            "Tool already attached under this display name, skipping"
                        );
                        continue;
                    }
                    tools.push(tool);
                }
                Err(e) => {
                    warn!(agent = %definition.name, tool = tool_id, error = %e, "Failed to build tool, skipping");
                }
            }
        }

        if tools.is_empty() {
            return Err(AgentAssemblyError::NoTools(definition.name.clone()));
        }

        let system_prompt =
            PromptTemplate::agent_system(&name.sanitized, &definition.description, &self.language);

        Ok(Agent {
            name: name.sanitized,
            original_name: definition.name.clone(),
            description: definition.description.clone(),
            tools,
            generation: definition.generation.clone(),
            system_prompt,
            categories: definition.categories.clone(),
            max_iterations: self.max_iterations,
        })
    }

    /// Assemble every definition, skipping failures and name collisions.
    pub fn assemble_all(&self, definitions: &[AgentDefinition], manifest: &ToolManifest) -> Vec<Agent> {
        let mut agents: Vec<Agent> = Vec::with_capacity(definitions.len());

        for definition in definitions {
            let agent = match self.assemble(definition, manifest) {
                Ok(agent) => agent,
                Err(e) => {
                    warn!(error = %e, "Skipping agent");
                    continue;
                }
            };

            if agents.iter().any(|a| a.name == agent.name) {
                let e = AgentAssemblyError::DuplicateName(agent.name.clone());
                warn!(error = %e, "Skipping agent");
                continue;
            }

            info!(agent = %agent.name, tools = agent.tools.len(), "Assembled agent");
            agents.push(agent);
        }

        agents
    }
}
