//! Execution trace recorder
//!
//! Collects `(actor, input, output)` triples while a request is dispatched.
//! Shared between the router, agents and comparison fan-out tasks, so it is
//! internally synchronized; steps keep the order in which they were recorded.
//! An actor that calls other actors reserves its position with [`TraceRecorder::begin`]
//! so it precedes the steps it causes.

use std::collections::HashSet;
use std::sync::Mutex;
use switchyard_domain::{ExecutionResult, ObservationLimit, RawStep, RoutingMode};

/// Position reserved by [`TraceRecorder::begin`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSlot(usize);

#[derive(Debug, Default)]
pub struct TraceRecorder {
    steps: Mutex<Vec<RawStep>>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &self,
        actor: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
    ) {
        let step = RawStep::new(actor, input, output);
        self.steps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(step);
    }

    /// Reserve the next position for an actor whose output is not known yet.
    ///
    /// The step's output stays empty until [`TraceRecorder::complete`] fills it.
    pub fn begin(&self, actor: impl Into<String>, input: impl Into<String>) -> StepSlot {
        let mut steps = self
            .steps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        steps.push(RawStep::new(actor, input, ""));
        StepSlot(steps.len() - 1)
    }

    pub fn complete(&self, slot: StepSlot, output: impl Into<String>) {
        if let Some(step) = self
            .steps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get_mut(slot.0)
        {
            step.output = output.into();
        }
    }

    pub fn len(&self) -> usize {
        self.steps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the steps recorded so far.
    pub fn steps(&self) -> Vec<RawStep> {
        self.steps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Build the execution result from everything recorded.
    pub fn finish(
        &self,
        response: impl Into<String>,
        mode: RoutingMode,
        agent_names: &HashSet<String>,
        limit: ObservationLimit,
    ) -> ExecutionResult {
        ExecutionResult::from_steps(response, mode, self.steps(), agent_names, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_concurrent_recording() {
        let recorder = Arc::new(TraceRecorder::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let recorder = Arc::clone(&recorder);
            handles.push(tokio::spawn(async move {
                recorder.record(format!("Agent_{}", i % 2), "q", "a");
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(recorder.len(), 8);

        let agents: HashSet<String> = ["Agent_0".to_string()].into_iter().collect();
        let result = recorder.finish("ok", RoutingMode::Comparison, &agents, ObservationLimit::SIMPLE);
        assert_eq!(result.total_steps, 8);
        assert!(result.agents_used.is_subset(&result.tools_used));
        assert_eq!(result.agents_used.len(), 1);
    }

    #[test]
    fn test_begin_keeps_call_order() {
        let recorder = TraceRecorder::new();
        let slot = recorder.begin("HR_Agent", "nghỉ phép");
        recorder.record("knowledge_search_tool", "{}", "12 ngày phép/năm");
        recorder.complete(slot, "12 ngày");

        let steps = recorder.steps();
        assert_eq!(steps[0], RawStep::new("HR_Agent", "nghỉ phép", "12 ngày"));
        assert_eq!(steps[1].actor_name, "knowledge_search_tool");
    }

    #[test]
    fn test_finish_truncates_observations() {
        let recorder = TraceRecorder::new();
        recorder.record("web_search", "q", "r".repeat(500));
        let result = recorder.finish(
            "done",
            RoutingMode::Single,
            &HashSet::new(),
            ObservationLimit::Chars(10),
        );
        assert_eq!(result.steps[0].observation, format!("{}...", "r".repeat(10)));

        let full = recorder.finish("done", RoutingMode::Single, &HashSet::new(), ObservationLimit::Unbounded);
        assert_eq!(full.steps[0].observation.len(), 500);
    }
}
