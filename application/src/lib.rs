//! Application layer for switchyard
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod service;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DispatchParams, ReloadParams};
pub use ports::{
    decision_service::{
        Decision, DecisionError, DecisionRequest, DecisionService, ScratchpadEntry,
        ToolManifestEntry,
    },
    knowledge_base::{KnowledgeBase, KnowledgeError, KnowledgeHit},
    manifest_source::{ConfigLoadError, ManifestDocuments, ManifestSource},
    progress::{DispatchProgress, NoProgress},
    tool_handler::{HandlerRegistry, InvocationContext, ToolHandler},
    trace_logger::{NoTraceLogger, TraceEvent, TraceLogger},
};
pub use service::{AgentInfo, AgentSummary, Switchyard, SwitchyardBuilder, ToolSummary};
pub use use_cases::assemble_agents::{Agent, AgentAssembler};
pub use use_cases::build_tool::{KNOWLEDGE_SEARCH_IDS, ToolFactory, ToolInstance, WEB_SEARCH_IDS};
pub use use_cases::dispatch::{CANCELLED_ERROR, DispatchInput, DispatchUseCase};
pub use use_cases::reload::{AgentSnapshot, ReloadError, ReloadManager, ReloadOutcome};
pub use use_cases::trace_recorder::{StepSlot, TraceRecorder};
