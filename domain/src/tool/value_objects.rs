//! Tool domain value objects: immutable result and error types
//!
//! Every handler invocation produces a [`ToolResult`]. Failures never escape
//! a tool as a hard fault; [`ToolResult::observation`] renders either outcome
//! as the text the owning agent sees.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a tool failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolErrorCode {
    /// Missing or mistyped arguments
    InvalidArgument,
    /// Required credential absent from the agent config
    MissingCredential,
    /// No handler registered for the tool
    NotFound,
    /// Runtime failure inside the handler (HTTP, I/O)
    ExecutionFailed,
}

impl ToolErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ToolErrorCode::MissingCredential => "MISSING_CREDENTIAL",
            ToolErrorCode::NotFound => "NOT_FOUND",
            ToolErrorCode::ExecutionFailed => "EXECUTION_FAILED",
        }
    }
}

impl fmt::Display for ToolErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    pub code: ToolErrorCode,
    pub message: String,
    /// Operator-facing context, kept out of the observation text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(code: ToolErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ToolErrorCode::NotFound,
            format!("Resource not found: {}", resource.into()),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::InvalidArgument, message)
    }

    /// Names every missing credential so the operator can fix the agent config.
    pub fn missing_credentials(names: &[&str]) -> Self {
        Self::new(
            ToolErrorCode::MissingCredential,
            format!("Missing required credential(s): {}", names.join(", ")),
        )
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::ExecutionFailed, message)
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        match &self.details {
            Some(details) => write!(f, " ({})", details),
            None => Ok(()),
        }
    }
}

impl std::error::Error for ToolError {}

/// Outcome of one tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Sanitized name of the tool instance that ran
    pub tool_name: String,
    #[serde(flatten)]
    pub outcome: ToolOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolOutcome {
    Output(String),
    Error(ToolError),
}

impl ToolResult {
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            outcome: ToolOutcome::Output(output.into()),
            duration_ms: None,
        }
    }

    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            outcome: ToolOutcome::Error(error),
            duration_ms: None,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Output(_))
    }

    pub fn error(&self) -> Option<&ToolError> {
        match &self.outcome {
            ToolOutcome::Error(error) => Some(error),
            ToolOutcome::Output(_) => None,
        }
    }

    /// Text handed back to the decision service.
    ///
    /// Failures render as `Error executing {tool}: {message}`.
    pub fn observation(&self) -> String {
        match &self.outcome {
            ToolOutcome::Output(output) => output.clone(),
            ToolOutcome::Error(error) => {
                format!("Error executing {}: {}", self.tool_name, error.message)
            }
        }
    }
}
