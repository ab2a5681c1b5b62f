//! Test doubles shared by the use case tests

use crate::ports::decision_service::{Decision, DecisionError, DecisionRequest, DecisionService};
use crate::ports::tool_handler::{InvocationContext, ToolHandler};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use switchyard_domain::ToolError;

pub const ROUTER: &str = "router";
pub const SYNTHESIS: &str = "synthesis";
pub const TITLE: &str = "title";

enum Step {
    Text(String),
    Call(String, Value),
    Fail(String),
}

/// Which conversation a request belongs to, read off its system prompt.
pub fn lane_of(request: &DecisionRequest) -> String {
    let prompt = &request.system_prompt;
    if prompt.starts_with("You are a coordinator") {
        return ROUTER.to_string();
    }
    if prompt.starts_with("You are a consultant") {
        return SYNTHESIS.to_string();
    }
    if prompt.contains("descriptive title") {
        return TITLE.to_string();
    }
    prompt
        .split("named ")
        .nth(1)
        .and_then(|rest| rest.split(".\n").next())
        .unwrap_or_default()
        .to_string()
}

/// Decision service replaying scripted answers per lane.
///
/// Lanes are "router", "synthesis", "title" or an agent name. A lane without
/// its own script draws from the default queue.
#[derive(Default)]
pub struct ScriptedDecisionService {
    default: Mutex<VecDeque<Step>>,
    lanes: Mutex<HashMap<String, VecDeque<Step>>>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<(String, DecisionRequest)>>,
}

impl ScriptedDecisionService {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, lane: Option<&str>, step: Step) -> Self {
        match lane {
            None => self.default.lock().unwrap().push_back(step),
            Some(lane) => self
                .lanes
                .lock()
                .unwrap()
                .entry(lane.to_string())
                .or_default()
                .push_back(step),
        }
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.push(None, Step::Text(text.to_string()))
    }

    pub fn tool_call(self, name: &str, arguments: Value) -> Self {
        self.push(None, Step::Call(name.to_string(), arguments))
    }

    pub fn text_on(self, lane: &str, text: &str) -> Self {
        self.push(Some(lane), Step::Text(text.to_string()))
    }

    pub fn tool_call_on(self, lane: &str, name: &str, arguments: Value) -> Self {
        self.push(Some(lane), Step::Call(name.to_string(), arguments))
    }

    pub fn fail_on(self, lane: &str, message: &str) -> Self {
        self.push(Some(lane), Step::Fail(message.to_string()))
    }

    pub fn delay_on(mut self, lane: &str, delay: Duration) -> Self {
        self.delays.insert(lane.to_string(), delay);
        self
    }

    pub fn requests(&self) -> Vec<DecisionRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub fn requests_on(&self, lane: &str) -> Vec<DecisionRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| l == lane)
            .map(|(_, r)| r.clone())
            .collect()
    }

    fn next_step(&self, lane: &str) -> Option<Step> {
        let mut lanes = self.lanes.lock().unwrap();
        match lanes.get_mut(lane) {
            Some(queue) => queue.pop_front(),
            None => self.default.lock().unwrap().pop_front(),
        }
    }
}

#[async_trait]
impl DecisionService for ScriptedDecisionService {
    async fn decide(&self, request: &DecisionRequest) -> Result<Decision, DecisionError> {
        let lane = lane_of(request);
        self.requests
            .lock()
            .unwrap()
            .push((lane.clone(), request.clone()));

        if let Some(delay) = self.delays.get(&lane) {
            tokio::time::sleep(*delay).await;
        }

        match self.next_step(&lane) {
            Some(Step::Text(text)) => Ok(Decision::Text(text)),
            Some(Step::Call(name, arguments)) => Ok(Decision::ToolCall {
                name,
                arguments: arguments.as_object().cloned().unwrap_or_default(),
            }),
            Some(Step::Fail(message)) => Err(DecisionError::RequestFailed(message)),
            None => Err(DecisionError::Other(format!("script exhausted for lane '{}'", lane))),
        }
    }
}

/// Handler answering every call with the same text.
pub struct StaticHandler {
    name: String,
    output: String,
}

impl StaticHandler {
    pub fn new(name: &str, output: &str) -> Self {
        Self {
            name: name.to_string(),
            output: output.to_string(),
        }
    }
}

#[async_trait]
impl ToolHandler for StaticHandler {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, _ctx: &InvocationContext) -> Result<String, ToolError> {
        Ok(self.output.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchyard_domain::{GenerationParams, PromptTemplate};

    #[test]
    fn test_lane_of_prompts() {
        let g = GenerationParams::default();
        let agent = DecisionRequest::new(
            PromptTemplate::agent_system("HR_Agent", "HR", "Vietnamese"),
            "x",
            g.clone(),
        );
        assert_eq!(lane_of(&agent), "HR_Agent");

        let router = DecisionRequest::new(
            PromptTemplate::router_system(&[("HR_Agent".into(), "HR".into())], "Vietnamese"),
            "x",
            g.clone(),
        );
        assert_eq!(lane_of(&router), ROUTER);

        let synthesis =
            DecisionRequest::new(PromptTemplate::synthesis_system("Vietnamese"), "x", g.clone());
        assert_eq!(lane_of(&synthesis), SYNTHESIS);

        let title = DecisionRequest::new(PromptTemplate::title_system(), "x", g);
        assert_eq!(lane_of(&title), TITLE);
    }
}
