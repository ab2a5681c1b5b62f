//! Domain layer for switchyard
//!
//! This crate contains the core types and rules of the dispatcher. It has no
//! dependencies on infrastructure or presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! - **Tool**: a declared capability with a parameter schema; some parameters
//!   are credentials bound per agent and hidden from the decision service.
//! - **Agent**: a named bundle of tools exposed to the router as a single
//!   dispatch target.
//! - **Routing**: the choice between delegating to one agent and fanning out
//!   to several (comparison mode).
//! - **Trace**: the ordered record of invocations behind one response.

pub mod agent;
pub mod core;
pub mod prompt;
pub mod routing;
pub mod session;
pub mod tool;
pub mod trace;

// Re-export commonly used types
pub use agent::{
    AgentDefinition, ConfigIssue, ConfigIssueCode, DEFAULT_MODEL_NAME, DEFAULT_TEMPERATURE,
    GenerationParams, Severity, validate_agent_definitions, validate_agents,
};
pub use crate::core::{
    error::{AgentAssemblyError, ManifestError, ToolBuildError},
    identifier::{MAX_IDENTIFIER_LEN, SanitizedName, sanitize_identifier},
    string::truncate,
};
pub use prompt::{APOLOGY, CANCELLED_NOTICE, DEFAULT_TITLE, PromptTemplate};
pub use routing::{
    Category, KeywordScore, RoutingAnalysis, RoutingCandidate, RoutingDecision, RoutingMode,
    RoutingRules,
};
pub use session::{Message, Role, format_history, with_history};
pub use tool::{
    Arguments, FieldRequirement, ParameterKind, ParameterSchema, ParameterSpec, SchemaField,
    ToolCall, ToolDefinition, ToolError, ToolErrorCode, ToolManifest, ToolOutcome, ToolResult,
};
pub use trace::{ExecutionResult, ExecutionStep, ObservationLimit, RawStep};
