//! Dispatch use case
//!
//! Routes one request against an [`AgentSnapshot`]:
//!
//! - **Single mode**: the agents form the tool manifest of a router
//!   conversation; the decision service delegates to zero or more agents
//!   and finally answers in text.
//! - **Comparison mode**: every resolved target answers an elaborated query
//!   concurrently, then the answers are synthesized into one comparison.
//!
//! Every path ends in an [`ExecutionResult`] with a non-empty response.

use crate::config::DispatchParams;
use crate::ports::decision_service::{Decision, DecisionRequest, DecisionService, ScratchpadEntry};
use crate::ports::progress::{DispatchProgress, NoProgress};
use crate::use_cases::assemble_agents::AGENT_INPUT_PARAM;
use crate::use_cases::reload::AgentSnapshot;
use crate::use_cases::trace_recorder::TraceRecorder;
use serde_json::Value;
use std::sync::Arc;
use switchyard_domain::{
    APOLOGY, CANCELLED_NOTICE, ExecutionResult, Message, ObservationLimit, PromptTemplate,
    RoutingAnalysis, RoutingDecision, RoutingMode, RoutingRules, with_history,
};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Error string carried by a cancelled request's result
pub const CANCELLED_ERROR: &str = "cancelled";

/// Input for the dispatch use case
#[derive(Debug, Clone)]
pub struct DispatchInput {
    pub message: String,
    pub history: Vec<Message>,
    /// Observation bound applied to the returned steps
    pub limit: ObservationLimit,
    pub cancellation: Option<CancellationToken>,
}

impl DispatchInput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            history: Vec::new(),
            limit: ObservationLimit::SIMPLE,
            cancellation: None,
        }
    }

    pub fn with_history(mut self, history: Vec<Message>) -> Self {
        self.history = history;
        self
    }

    pub fn with_limit(mut self, limit: ObservationLimit) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Response text plus the diagnostic error, before the trace is attached
struct Outcome {
    response: String,
    error: Option<String>,
}

impl Outcome {
    fn answered(response: String) -> Self {
        Self {
            response,
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            response: APOLOGY.to_string(),
            error: Some(error),
        }
    }
}

/// Use case for dispatching one request
pub struct DispatchUseCase {
    service: Arc<dyn DecisionService>,
    params: DispatchParams,
    rules: RoutingRules,
}

impl DispatchUseCase {
    pub fn new(service: Arc<dyn DecisionService>, params: DispatchParams, rules: RoutingRules) -> Self {
        Self {
            service,
            params,
            rules,
        }
    }

    pub fn params(&self) -> &DispatchParams {
        &self.params
    }

    pub fn rules(&self) -> &RoutingRules {
        &self.rules
    }

    /// Execute with default (no-op) progress
    pub async fn execute(&self, snapshot: Arc<AgentSnapshot>, input: DispatchInput) -> ExecutionResult {
        self.execute_with_progress(snapshot, input, &NoProgress).await
    }

    /// Execute with progress callbacks
    pub async fn execute_with_progress(
        &self,
        snapshot: Arc<AgentSnapshot>,
        input: DispatchInput,
        progress: &dyn DispatchProgress,
    ) -> ExecutionResult {
        let analysis = RoutingAnalysis::analyze(&self.rules, &input.message);
        debug!(
            comparison_phrase = analysis.is_comparison_phrase,
            categories = ?analysis.detected_categories,
            scores = ?analysis.keyword_scores,
            "Routing analysis"
        );

        let decision = RoutingDecision::decide(analysis, snapshot.agents());
        if decision.fell_back {
            warn!(
                categories = ?decision.detected_categories,
                "Comparison requested but fewer than two target agents resolved, using single mode"
            );
        }
        info!(mode = %decision.mode, targets = ?decision.targets, "Dispatching request");
        progress.on_route(&decision);

        let recorder = Arc::new(TraceRecorder::new());
        let run = self.run_mode(&snapshot, &decision, &input, &recorder, progress);

        let outcome = match &input.cancellation {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => None,
                outcome = run => Some(outcome),
            },
            None => Some(run.await),
        };

        let agent_names = snapshot.agent_names();
        let result = match outcome {
            Some(outcome) => {
                let result =
                    recorder.finish(outcome.response, decision.mode, &agent_names, input.limit);
                match outcome.error {
                    Some(error) => result.with_error(error),
                    None => result,
                }
            }
            None => {
                info!("Request cancelled, abandoning outstanding work");
                recorder
                    .finish(CANCELLED_NOTICE, decision.mode, &agent_names, input.limit)
                    .with_error(CANCELLED_ERROR)
            }
        };

        result.with_detected_categories(decision.detected_categories)
    }

    async fn run_mode(
        &self,
        snapshot: &Arc<AgentSnapshot>,
        decision: &RoutingDecision,
        input: &DispatchInput,
        recorder: &Arc<TraceRecorder>,
        progress: &dyn DispatchProgress,
    ) -> Outcome {
        let request = with_history(&input.history, &input.message);
        match decision.mode {
            RoutingMode::Single => self.run_single(snapshot, &request, recorder, progress).await,
            RoutingMode::Comparison => {
                self.run_comparison(
                    snapshot,
                    &decision.targets,
                    &input.message,
                    &request,
                    recorder,
                    progress,
                )
                .await
            }
        }
    }

    async fn run_single(
        &self,
        snapshot: &AgentSnapshot,
        request: &str,
        recorder: &TraceRecorder,
        progress: &dyn DispatchProgress,
    ) -> Outcome {
        let listing: Vec<(String, String)> = snapshot
            .agents()
            .iter()
            .map(|a| (a.name().to_string(), a.description().to_string()))
            .collect();
        let system_prompt = PromptTemplate::router_system(&listing, &self.params.response_language);
        let mut decision_request =
            DecisionRequest::new(system_prompt, request, self.params.router_generation.clone())
                .with_tools(snapshot.agents().iter().map(|a| a.manifest_entry()).collect());

        for iteration in 0..self.params.max_router_iterations {
            let decision = match self.service.decide(&decision_request).await {
                Ok(decision) => decision,
                Err(e) => {
                    error!(error = %e, iteration, "Decision service failed during routing");
                    return Outcome::failed(e.to_string());
                }
            };

            let (name, arguments) = match decision {
                Decision::Text(text) => {
                    return Outcome::answered(non_empty_or_last(text, &decision_request));
                }
                Decision::ToolCall { name, arguments } => (name, arguments),
            };

            let observation = match snapshot.agent(&name) {
                Some(agent) => {
                    let agent_input = arguments
                        .get(AGENT_INPUT_PARAM)
                        .and_then(Value::as_str)
                        .filter(|s| !s.trim().is_empty())
                        .unwrap_or(request)
                        .to_string();
                    debug!(agent = %agent.name(), iteration, "Router delegated to agent");
                    progress.on_delegate(agent.name());
                    let slot = recorder.begin(agent.name(), agent_input.as_str());

                    let observation = match agent
                        .run(self.service.as_ref(), &agent_input, recorder, progress)
                        .await
                    {
                        Ok(answer) => answer,
                        Err(e) => {
                            warn!(agent = %agent.name(), error = %e, "Agent failed");
                            format!("Error executing {}: {}", agent.name(), e)
                        }
                    };
                    recorder.complete(slot, observation.as_str());
                    observation
                }
                None => {
                    let available: Vec<&str> = snapshot.agents().iter().map(|a| a.name()).collect();
                    warn!(tool = %name, "Router called an unknown agent");
                    PromptTemplate::unknown_tool(&name, &available)
                }
            };

            decision_request.scratchpad.push(ScratchpadEntry {
                tool_name: name,
                arguments,
                observation,
            });
        }

        warn!(
            limit = self.params.max_router_iterations,
            "Router reached iteration limit, answering with the last observation"
        );
        Outcome::answered(non_empty_or_last(String::new(), &decision_request))
    }

    async fn run_comparison(
        &self,
        snapshot: &Arc<AgentSnapshot>,
        targets: &[String],
        query: &str,
        request: &str,
        recorder: &Arc<TraceRecorder>,
        progress: &dyn DispatchProgress,
    ) -> Outcome {
        let elaborated = PromptTemplate::elaboration(request);
        let timeout = self.params.target_timeout;
        let mut join_set = JoinSet::new();

        for (index, target) in targets.iter().enumerate() {
            let Some(agent) = snapshot.agent(target).cloned() else {
                continue;
            };
            let service = Arc::clone(&self.service);
            let recorder = Arc::clone(recorder);
            let input = elaborated.clone();

            progress.on_delegate(agent.name());
            join_set.spawn(async move {
                let run = agent.run(service.as_ref(), &input, &recorder, &NoProgress);
                let answer = match tokio::time::timeout(timeout, run).await {
                    Ok(Ok(answer)) => Ok(answer),
                    Ok(Err(e)) => Err(e.to_string()),
                    Err(_) => Err(format!("timed out after {:?}", timeout)),
                };
                let observation = match &answer {
                    Ok(text) => text.clone(),
                    Err(reason) => PromptTemplate::target_failure(agent.name(), reason),
                };
                recorder.record(agent.name(), input, &observation);
                (index, agent.name().to_string(), answer.is_ok(), observation)
            });
        }

        let mut answers: Vec<(usize, String, String)> = Vec::with_capacity(targets.len());
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, agent, success, observation)) => {
                    if success {
                        info!(agent = %agent, "Comparison target answered");
                    } else {
                        warn!(agent = %agent, observation = %observation, "Comparison target failed");
                    }
                    progress.on_target_complete(&agent, success);
                    answers.push((index, agent, observation));
                }
                Err(e) => warn!(error = %e, "Comparison target task failed"),
            }
        }

        for (index, target) in targets.iter().enumerate() {
            if !answers.iter().any(|(i, _, _)| *i == index) {
                answers.push((
                    index,
                    target.clone(),
                    PromptTemplate::target_failure(target, "task did not complete"),
                ));
            }
        }
        answers.sort_by_key(|(index, _, _)| *index);
        let answers: Vec<(String, String)> = answers
            .into_iter()
            .map(|(_, agent, answer)| (agent, answer))
            .collect();

        progress.on_synthesis_start();
        let synthesis = self
            .service
            .generate(
                &PromptTemplate::synthesis_system(&self.params.response_language),
                &PromptTemplate::synthesis_prompt(query, &answers),
                &self.params.router_generation,
            )
            .await;

        match synthesis {
            Ok(text) if !text.trim().is_empty() => Outcome::answered(text),
            Ok(_) => {
                warn!("Synthesis returned an empty answer, concatenating target answers");
                Outcome::answered(PromptTemplate::fallback_concatenation(&answers))
            }
            Err(e) => {
                warn!(error = %e, "Synthesis failed, concatenating target answers");
                Outcome::answered(PromptTemplate::fallback_concatenation(&answers))
            }
        }
    }
}

/// `text` unless blank, then the latest observation, then the apology.
fn non_empty_or_last(text: String, request: &DecisionRequest) -> String {
    if !text.trim().is_empty() {
        return text;
    }
    request
        .scratchpad
        .iter()
        .rev()
        .map(|entry| entry.observation.as_str())
        .find(|observation| !observation.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| APOLOGY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::tool_handler::HandlerRegistry;
    use crate::use_cases::assemble_agents::AgentAssembler;
    use crate::use_cases::build_tool::ToolFactory;
    use crate::use_cases::testing::{ROUTER, SYNTHESIS, ScriptedDecisionService, StaticHandler};
    use serde_json::json;
    use std::time::Duration;
    use switchyard_domain::{AgentDefinition, ToolDefinition, ToolManifest};

    fn snapshot() -> Arc<AgentSnapshot> {
        let manifest = ToolManifest::new(vec![
            ToolDefinition::new("knowledge_search_tool", "Search documents"),
            ToolDefinition::new("calendar", "Calendar"),
        ])
        .unwrap();
        let registry = HandlerRegistry::new()
            .register(StaticHandler::new("knowledge_search_tool", "tài liệu"))
            .register(StaticHandler::new("calendar", "lịch trống"));
        let assembler =
            AgentAssembler::new(ToolFactory::new(registry), &DispatchParams::default());
        let defs = vec![
            AgentDefinition::new("HR_Agent", "HR policies").with_tool("knowledge_search_tool"),
            AgentDefinition::new("FnB_Agent", "Restaurant solution").with_tool("calendar"),
            AgentDefinition::new("Booking_Agent", "Booking solution").with_tool("calendar"),
        ];
        let agents = assembler.assemble_all(&defs, &manifest);
        Arc::new(AgentSnapshot::new(agents, manifest, 1))
    }

    fn use_case(service: ScriptedDecisionService) -> (DispatchUseCase, Arc<ScriptedDecisionService>) {
        let service = Arc::new(service);
        let params = DispatchParams::default().with_target_timeout(Duration::from_millis(200));
        let use_case = DispatchUseCase::new(service.clone(), params, RoutingRules::default());
        (use_case, service)
    }

    #[tokio::test]
    async fn test_router_answers_directly() {
        let (use_case, _) = use_case(ScriptedDecisionService::new().text_on(ROUTER, "Xin chào!"));
        let result = use_case.execute(snapshot(), DispatchInput::new("Xin chào")).await;

        assert_eq!(result.response, "Xin chào!");
        assert_eq!(result.mode, RoutingMode::Single);
        assert_eq!(result.total_steps, 0);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_router_passes_history_to_agent() {
        let service = ScriptedDecisionService::new()
            .tool_call_on(ROUTER, "HR_Agent", json!({}))
            .text_on(ROUTER, "Chính sách đã gửi")
            .text_on("HR_Agent", "12 ngày");
        let (use_case, service) = use_case(service);
        let input = DispatchInput::new("Còn bao nhiêu ngày?")
            .with_history(vec![Message::user("Nghỉ phép"), Message::assistant("Bạn hỏi gì?")]);

        let result = use_case.execute(snapshot(), input).await;
        assert_eq!(result.response, "Chính sách đã gửi");
        assert_eq!(result.agents_used.iter().collect::<Vec<_>>(), vec!["HR_Agent"]);

        let agent_input = &service.requests_on("HR_Agent")[0].user_input;
        assert!(agent_input.starts_with("=== Conversation history ==="));
        assert!(agent_input.contains("User: Nghỉ phép"));
    }

    #[tokio::test]
    async fn test_unknown_agent_name_is_reported_back() {
        let service = ScriptedDecisionService::new()
            .tool_call_on(ROUTER, "Legal_Agent", json!({"input_query": "x"}))
            .text_on(ROUTER, "");
        let (use_case, service) = use_case(service);
        let result = use_case.execute(snapshot(), DispatchInput::new("hợp đồng")).await;

        let observation = &service.requests_on(ROUTER)[1].scratchpad[0].observation;
        assert!(observation.starts_with("Unknown tool 'Legal_Agent'"));
        // Empty final text falls back to the last observation.
        assert_eq!(&result.response, observation);
        assert_eq!(result.total_steps, 0);
    }

    #[tokio::test]
    async fn test_decision_service_failure_yields_apology() {
        let service = ScriptedDecisionService::new().fail_on(ROUTER, "connection refused");
        let (use_case, _) = use_case(service);
        let result = use_case.execute(snapshot(), DispatchInput::new("hello")).await;

        assert_eq!(result.response, APOLOGY);
        assert!(result.error.as_deref().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_agent_failure_becomes_observation() {
        let service = ScriptedDecisionService::new()
            .tool_call_on(ROUTER, "HR_Agent", json!({"input_query": "nghỉ phép"}))
            .text_on(ROUTER, "Xin lỗi, hệ thống HR đang lỗi")
            .fail_on("HR_Agent", "503");
        let (use_case, service) = use_case(service);
        let result = use_case.execute(snapshot(), DispatchInput::new("nghỉ phép")).await;

        assert_eq!(result.response, "Xin lỗi, hệ thống HR đang lỗi");
        let observation = &service.requests_on(ROUTER)[1].scratchpad[0].observation;
        assert!(observation.starts_with("Error executing HR_Agent:"));
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_router_iteration_limit() {
        let mut service = ScriptedDecisionService::new();
        for _ in 0..5 {
            service = service.tool_call_on(ROUTER, "HR_Agent", json!({"input_query": "x"}));
        }
        for i in 0..5 {
            service = service.text_on("HR_Agent", &format!("answer {}", i));
        }
        let (use_case, service) = use_case(service);
        let result = use_case.execute(snapshot(), DispatchInput::new("x")).await;

        assert_eq!(service.requests_on(ROUTER).len(), 5);
        assert_eq!(result.response, "answer 4");
        assert_eq!(result.total_steps, 5);
    }

    #[tokio::test]
    async fn test_comparison_fans_out_and_synthesizes() {
        let service = ScriptedDecisionService::new()
            .text_on("FnB_Agent", "FnB: quản lý bàn")
            .text_on("Booking_Agent", "Booking: lịch hẹn")
            .text_on(SYNTHESIS, "Bảng so sánh");
        let (use_case, service) = use_case(service);
        let result = use_case
            .execute(snapshot(), DispatchInput::new("So sánh mô hình FNB và Booking"))
            .await;

        assert_eq!(result.mode, RoutingMode::Comparison);
        assert_eq!(result.response, "Bảng so sánh");
        assert_eq!(result.detected_categories, vec!["fnb", "booking"]);
        assert!(result.agents_used.contains("FnB_Agent"));
        assert!(result.agents_used.contains("Booking_Agent"));
        assert!(service.requests_on(ROUTER).is_empty());

        let synthesis = &service.requests_on(SYNTHESIS)[0].user_input;
        assert!(synthesis.contains("=== FnB_Agent ===\nFnB: quản lý bàn"));
        assert!(synthesis.contains("=== Booking_Agent ===\nBooking: lịch hẹn"));
        let target_input = &service.requests_on("FnB_Agent")[0].user_input;
        assert!(target_input.contains("target audience"));
    }

    #[tokio::test]
    async fn test_comparison_timeout_and_synthesis_fallback() {
        let service = ScriptedDecisionService::new()
            .text_on("FnB_Agent", "FnB answer")
            .text_on("Booking_Agent", "too late")
            .delay_on("Booking_Agent", Duration::from_secs(5))
            .fail_on(SYNTHESIS, "quota exceeded");
        let (use_case, _) = use_case(service);
        let result = use_case
            .execute(snapshot(), DispatchInput::new("so sánh fnb và booking"))
            .await;

        assert_eq!(result.mode, RoutingMode::Comparison);
        assert!(result.response.contains("=== FnB_Agent ===\nFnB answer"));
        assert!(result.response.contains("[Booking_Agent failed: timed out after"));
        assert!(result.response.contains("contact our support team"));
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_comparison_falls_back_to_single_with_one_target() {
        let service = ScriptedDecisionService::new().text_on(ROUTER, "chỉ có FnB");
        let (use_case, _) = use_case(service);
        let result = use_case
            .execute(snapshot(), DispatchInput::new("so sánh fnb và retail"))
            .await;
        assert_eq!(result.mode, RoutingMode::Single);
        assert_eq!(result.response, "chỉ có FnB");
    }

    #[tokio::test]
    async fn test_cancellation_abandons_fan_out() {
        let service = ScriptedDecisionService::new()
            .text_on("FnB_Agent", "a")
            .text_on("Booking_Agent", "b")
            .text_on(SYNTHESIS, "never")
            .delay_on("FnB_Agent", Duration::from_secs(30))
            .delay_on("Booking_Agent", Duration::from_secs(30));
        let service = Arc::new(service);
        let params = DispatchParams::default();
        let use_case = DispatchUseCase::new(service.clone(), params, RoutingRules::default());

        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let input = DispatchInput::new("so sánh fnb và booking").with_cancellation(token);
        let result = use_case.execute(snapshot(), input).await;

        assert_eq!(result.response, CANCELLED_NOTICE);
        assert_eq!(result.error.as_deref(), Some(CANCELLED_ERROR));
        assert!(service.requests_on(SYNTHESIS).is_empty());
    }

    #[tokio::test]
    async fn test_simple_limit_truncates_observations() {
        let long = "x".repeat(300);
        let service = ScriptedDecisionService::new()
            .tool_call_on(ROUTER, "HR_Agent", json!({"input_query": "q"}))
            .text_on(ROUTER, "ok")
            .text_on("HR_Agent", &long);
        let (simple, _) = use_case(service);
        let result = simple.execute(snapshot(), DispatchInput::new("q")).await;
        assert_eq!(result.steps[0].observation.chars().count(), 203);

        let service = ScriptedDecisionService::new()
            .tool_call_on(ROUTER, "HR_Agent", json!({"input_query": "q"}))
            .text_on(ROUTER, "ok")
            .text_on("HR_Agent", &long);
        let (unbounded, _) = use_case(service);
        let detailed = unbounded
            .execute(snapshot(), DispatchInput::new("q").with_limit(ObservationLimit::Unbounded))
            .await;
        assert_eq!(detailed.steps[0].observation, long);
    }
}
