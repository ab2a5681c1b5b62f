//! Domain error types

use thiserror::Error;

/// Errors raised while validating manifests into domain values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("Tool manifest is empty")]
    EmptyToolManifest,

    #[error("Agent manifest is empty")]
    EmptyAgentManifest,

    #[error("Duplicate tool id: {0}")]
    DuplicateToolId(String),

    #[error("Tool entry #{index} has an empty id")]
    MissingToolId { index: usize },

    #[error("Agent entry #{index} has an empty name")]
    MissingAgentName { index: usize },

    #[error("Invalid parameter '{parameter}' on tool '{tool}': {reason}")]
    InvalidParameter {
        tool: String,
        parameter: String,
        reason: String,
    },
}

/// Raised by the tool factory when a definition cannot be bound for an agent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolBuildError {
    #[error("Tool '{tool}' requires parameter '{parameter}' but no value or default was supplied")]
    MissingRequiredParameter { tool: String, parameter: String },
}

/// Raised when an agent definition cannot be turned into a usable agent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentAssemblyError {
    #[error("No valid tools found for agent '{0}'")]
    NoTools(String),

    #[error("Agent name '{0}' collides with an already assembled agent")]
    DuplicateName(String),
}
