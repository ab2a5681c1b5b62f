//! Agent domain module
//!
//! Agent definitions as declared in the agent manifest, and the static checks
//! run against them before assembly.

pub mod entities;
pub mod validation;

pub use entities::{
    AgentDefinition, DEFAULT_MODEL_NAME, DEFAULT_TEMPERATURE, GenerationParams,
    validate_agent_definitions,
};
pub use validation::{ConfigIssue, ConfigIssueCode, Severity, validate_agents};
