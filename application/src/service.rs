//! The dispatcher service
//!
//! [`Switchyard`] is constructed once at process start and shared by every
//! front door (CLI, REPL, watcher). It owns the reload manager holding the
//! live agent snapshot and the dispatch use case that routes requests
//! against it.

use crate::config::{DispatchParams, ReloadParams};
use crate::ports::decision_service::DecisionService;
use crate::ports::manifest_source::{ConfigLoadError, ManifestSource};
use crate::ports::progress::{DispatchProgress, NoProgress};
use crate::ports::tool_handler::HandlerRegistry;
use crate::ports::trace_logger::{NoTraceLogger, TraceEvent, TraceLogger};
use crate::use_cases::assemble_agents::AgentAssembler;
use crate::use_cases::build_tool::ToolFactory;
use crate::use_cases::dispatch::{DispatchInput, DispatchUseCase};
use crate::use_cases::reload::{AgentSnapshot, ReloadError, ReloadManager, ReloadOutcome};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use switchyard_domain::{
    ConfigIssue, DEFAULT_TITLE, ExecutionResult, Message, ObservationLimit, PromptTemplate,
    RoutingRules, ToolManifest, format_history, validate_agents,
};
use tracing::{info, warn};

/// Agent listing returned by [`Switchyard::agent_info`]
#[derive(Debug, Clone, Serialize)]
pub struct AgentInfo {
    pub total_agents: usize,
    pub agents: Vec<AgentSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentSummary {
    pub name: String,
    pub description: String,
    pub tools: Vec<String>,
}

/// One entry of [`Switchyard::available_tools`]
#[derive(Debug, Clone, Serialize)]
pub struct ToolSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub file: String,
    pub parameters: Value,
}

/// Builder for [`Switchyard`]
pub struct SwitchyardBuilder {
    service: Arc<dyn DecisionService>,
    source: Arc<dyn ManifestSource>,
    registry: HandlerRegistry,
    dispatch: DispatchParams,
    reload: ReloadParams,
    rules: RoutingRules,
    trace_logger: Arc<dyn TraceLogger>,
}

impl SwitchyardBuilder {
    pub fn with_registry(mut self, registry: HandlerRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_dispatch_params(mut self, params: DispatchParams) -> Self {
        self.dispatch = params;
        self
    }

    pub fn with_reload_params(mut self, params: ReloadParams) -> Self {
        self.reload = params;
        self
    }

    pub fn with_rules(mut self, rules: RoutingRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_trace_logger(mut self, logger: Arc<dyn TraceLogger>) -> Self {
        self.trace_logger = logger;
        self
    }

    /// Build the service. No manifests are loaded until the first reload.
    pub fn build(self) -> Switchyard {
        let assembler = AgentAssembler::new(ToolFactory::new(self.registry), &self.dispatch);
        Switchyard {
            reloads: ReloadManager::new(assembler, &self.reload),
            dispatch: DispatchUseCase::new(Arc::clone(&self.service), self.dispatch, self.rules),
            service: self.service,
            source: self.source,
            trace_logger: self.trace_logger,
        }
    }
}

/// Configuration-driven multi-agent dispatcher
pub struct Switchyard {
    service: Arc<dyn DecisionService>,
    source: Arc<dyn ManifestSource>,
    reloads: ReloadManager,
    dispatch: DispatchUseCase,
    trace_logger: Arc<dyn TraceLogger>,
}

impl Switchyard {
    pub fn builder(
        service: Arc<dyn DecisionService>,
        source: Arc<dyn ManifestSource>,
    ) -> SwitchyardBuilder {
        SwitchyardBuilder {
            service,
            source,
            registry: HandlerRegistry::new(),
            dispatch: DispatchParams::default(),
            reload: ReloadParams::default(),
            rules: RoutingRules::default(),
            trace_logger: Arc::new(NoTraceLogger),
        }
    }

    pub fn params(&self) -> &DispatchParams {
        self.dispatch.params()
    }

    pub fn rules(&self) -> &RoutingRules {
        self.dispatch.rules()
    }

    pub fn source(&self) -> &dyn ManifestSource {
        self.source.as_ref()
    }

    pub fn snapshot(&self) -> Arc<AgentSnapshot> {
        self.reloads.snapshot()
    }

    /// Dispatch with observations bounded for the simple API.
    pub async fn dispatch(&self, message: &str, history: &[Message]) -> ExecutionResult {
        let input = DispatchInput::new(message)
            .with_history(history.to_vec())
            .with_limit(self.params().simple_observation_limit);
        self.dispatch_with(input, &NoProgress).await
    }

    /// Dispatch keeping full observations.
    pub async fn dispatch_detailed(&self, message: &str, history: &[Message]) -> ExecutionResult {
        let input = DispatchInput::new(message)
            .with_history(history.to_vec())
            .with_limit(ObservationLimit::Unbounded);
        self.dispatch_with(input, &NoProgress).await
    }

    /// Dispatch with explicit input (limit, cancellation) and progress.
    pub async fn dispatch_with(
        &self,
        input: DispatchInput,
        progress: &dyn DispatchProgress,
    ) -> ExecutionResult {
        let snapshot = self.reloads.snapshot();
        let message = input.message.clone();
        let generation = snapshot.generation();

        let result = self
            .dispatch
            .execute_with_progress(snapshot, input, progress)
            .await;

        self.trace_logger.log(TraceEvent::new(
            "dispatch",
            json!({
                "message": message,
                "snapshot_generation": generation,
                "result": result,
            }),
        ));
        result
    }

    /// Reload both manifests from the configured source.
    pub async fn reload(&self) -> Result<usize, ReloadError> {
        let result = self.reloads.reload(self.source.as_ref()).await;
        self.log_reload(&result.as_ref().map(|agents| *agents));
        result
    }

    /// Reload unless another reload happened within the cooldown.
    pub async fn reload_debounced(&self) -> Result<ReloadOutcome, ReloadError> {
        let outcome = self.reloads.reload_debounced(self.source.as_ref()).await;
        match &outcome {
            Ok(ReloadOutcome::Reloaded { agents, .. }) => self.log_reload(&Ok(*agents)),
            Ok(ReloadOutcome::Skipped) => {}
            Err(e) => self.log_reload(&Err(e)),
        }
        outcome
    }

    fn log_reload(&self, result: &Result<usize, &ReloadError>) {
        let snapshot = self.reloads.snapshot();
        let payload = match result {
            Ok(agents) => json!({
                "success": true,
                "agents": agents,
                "generation": snapshot.generation(),
            }),
            Err(e) => json!({
                "success": false,
                "error": e.to_string(),
                "generation": snapshot.generation(),
            }),
        };
        self.trace_logger.log(TraceEvent::new("reload", payload));
    }

    /// Load and validate the manifests without publishing anything.
    pub async fn check(&self) -> Result<Vec<ConfigIssue>, ConfigLoadError> {
        let documents = self.source.load().await?;
        let manifest = ToolManifest::new(documents.tools)?;
        switchyard_domain::validate_agent_definitions(&documents.agents)?;
        Ok(validate_agents(&documents.agents, &manifest))
    }

    pub fn agent_info(&self) -> AgentInfo {
        let snapshot = self.reloads.snapshot();
        let agents: Vec<AgentSummary> = snapshot
            .agents()
            .iter()
            .map(|agent| AgentSummary {
                name: agent.name().to_string(),
                description: agent.description().to_string(),
                tools: agent.tools().iter().map(|t| t.name().to_string()).collect(),
            })
            .collect();
        AgentInfo {
            total_agents: agents.len(),
            agents,
        }
    }

    pub fn available_tools(&self) -> Vec<ToolSummary> {
        let snapshot = self.reloads.snapshot();
        snapshot
            .manifest()
            .iter()
            .map(|tool| ToolSummary {
                id: tool.id.clone(),
                name: tool.display_name.clone(),
                description: tool.description.clone(),
                file: tool.file.clone(),
                parameters: serde_json::to_value(&tool.parameters).unwrap_or(Value::Null),
            })
            .collect()
    }

    /// Short conversation title; `"New Chat"` when generation fails.
    pub async fn summarize_title(&self, history: &[Message]) -> String {
        if history.is_empty() {
            return DEFAULT_TITLE.to_string();
        }
        let generation = &self.params().router_generation;
        match self
            .service
            .generate(PromptTemplate::title_system(), &format_history(history), generation)
            .await
        {
            Ok(raw) => {
                let title = PromptTemplate::clean_title(&raw);
                info!(title = %title, "Summarized conversation title");
                title
            }
            Err(e) => {
                warn!(error = %e, "Title summarization failed");
                DEFAULT_TITLE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::manifest_source::ManifestDocuments;
    use crate::use_cases::testing::{ROUTER, ScriptedDecisionService, StaticHandler, TITLE};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use switchyard_domain::{AgentDefinition, ParameterSpec, ToolDefinition};

    struct FixedSource(ManifestDocuments);

    #[async_trait]
    impl ManifestSource for FixedSource {
        async fn load(&self) -> Result<ManifestDocuments, ConfigLoadError> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "fixed".into()
        }
    }

    #[derive(Default)]
    struct MemoryTraceLogger {
        events: Mutex<Vec<(&'static str, Value)>>,
    }

    impl TraceLogger for MemoryTraceLogger {
        fn log(&self, event: TraceEvent) {
            self.events
                .lock()
                .unwrap()
                .push((event.event_type, event.payload));
        }
    }

    fn documents() -> ManifestDocuments {
        ManifestDocuments {
            tools: vec![
                ToolDefinition::new("calendar", "Calendar")
                    .with_display_name("Lịch")
                    .with_file("utility_tools.py")
                    .with_parameter("date", ParameterSpec::string()),
                ToolDefinition::new("jira_tool", "Jira")
                    .with_parameter("api_key", ParameterSpec::string().required().credential()),
            ],
            agents: vec![
                AgentDefinition::new("HR Agent", "HR policies").with_tool("calendar"),
                AgentDefinition::new("PE_Agent", "Engineering").with_tool("jira_tool"),
            ],
        }
    }

    fn switchyard(service: ScriptedDecisionService) -> (Switchyard, Arc<MemoryTraceLogger>) {
        let logger = Arc::new(MemoryTraceLogger::default());
        let switchyard = Switchyard::builder(Arc::new(service), Arc::new(FixedSource(documents())))
            .with_registry(HandlerRegistry::new().register(StaticHandler::new("calendar", "trống")))
            .with_trace_logger(logger.clone())
            .build();
        (switchyard, logger)
    }

    #[tokio::test]
    async fn test_agent_info_and_tools() {
        let (switchyard, _) = switchyard(ScriptedDecisionService::new());
        assert_eq!(switchyard.agent_info().total_agents, 0);
        switchyard.reload().await.unwrap();

        let info = switchyard.agent_info();
        assert_eq!(info.total_agents, 2);
        assert_eq!(info.agents[0].name, "HR_Agent");
        assert_eq!(info.agents[0].tools, vec!["calendar"]);

        let tools = switchyard.available_tools();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "Lịch");
        assert_eq!(tools[0].file, "utility_tools.py");
        assert_eq!(tools[0].parameters["date"]["type"], "string");
    }

    #[tokio::test]
    async fn test_dispatch_is_trace_logged() {
        let (switchyard, logger) =
            switchyard(ScriptedDecisionService::new().text_on(ROUTER, "Xin chào"));
        switchyard.reload().await.unwrap();
        let result = switchyard.dispatch("hi", &[]).await;
        assert_eq!(result.response, "Xin chào");

        let events = logger.events.lock().unwrap();
        assert_eq!(events[0].0, "reload");
        assert_eq!(events[1].0, "dispatch");
        assert_eq!(events[1].1["result"]["response"], "Xin chào");
        assert_eq!(events[1].1["snapshot_generation"], 1);
    }

    #[tokio::test]
    async fn test_check_reports_missing_credentials() {
        let (switchyard, _) = switchyard(ScriptedDecisionService::new());
        let issues = switchyard.check().await.unwrap();
        assert!(issues.iter().any(|i| i.message.contains("api_key")));
        assert!(issues.iter().any(|i| i.message.contains("HR Agent")));
    }

    #[tokio::test]
    async fn test_summarize_title() {
        let history = vec![Message::user("Chính sách nghỉ phép năm nay thế nào?")];

        let service = ScriptedDecisionService::new()
            .text_on(TITLE, "\"Chính sách nghỉ phép năm nay của công ty\"");
        let (titled, _) = switchyard(service);
        assert_eq!(
            titled.summarize_title(&history).await,
            "Chính sách nghỉ phép năm"
        );

        let (failing, _) = switchyard(ScriptedDecisionService::new().fail_on(TITLE, "down"));
        assert_eq!(failing.summarize_title(&history).await, DEFAULT_TITLE);
        assert_eq!(failing.summarize_title(&[]).await, DEFAULT_TITLE);
    }
}
