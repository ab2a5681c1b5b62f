//! Tool domain module
//!
//! Declarative tool definitions as they appear in the tool manifest, the
//! schema the decision service is allowed to see, and the result types every
//! tool invocation produces.
//!
//! ```text
//! ┌────────────────┐    ┌─────────────────┐    ┌──────────────┐
//! │ ToolDefinition │───▶│ ParameterSchema │───▶│ ToolResult   │
//! │ (manifest)     │    │ (no credentials)│    │ (observation)│
//! └───────┬────────┘    └─────────────────┘    └──────────────┘
//!         │
//!         └─ ToolManifest: validated, id-unique snapshot
//! ```
//!
//! Binding a definition to an agent's credentials happens in the application
//! layer (`build_tool`); this module stays free of I/O.

pub mod entities;
pub mod manifest;
pub mod schema;
pub mod value_objects;

pub use entities::{Arguments, ParameterKind, ParameterSpec, ToolCall, ToolDefinition};
pub use manifest::ToolManifest;
pub use schema::{FieldRequirement, ParameterSchema, SchemaField};
pub use value_objects::{ToolError, ToolErrorCode, ToolOutcome, ToolResult};
