//! Manifest source port
//!
//! Where the tool and agent manifests come from (files, an admin API, a
//! fixture in tests). A source is read on startup and on every reload.

use async_trait::async_trait;
use switchyard_domain::{AgentDefinition, ManifestError, ToolDefinition};
use thiserror::Error;

/// Malformed or missing configuration.
///
/// Fatal to a reload, never to the running service.
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse {document}: {message}")]
    Parse { document: String, message: String },

    #[error(transparent)]
    Invalid(#[from] ManifestError),
}

/// Both manifests, parsed but not yet validated against each other
#[derive(Debug, Clone, Default)]
pub struct ManifestDocuments {
    pub tools: Vec<ToolDefinition>,
    pub agents: Vec<AgentDefinition>,
}

#[async_trait]
pub trait ManifestSource: Send + Sync {
    async fn load(&self) -> Result<ManifestDocuments, ConfigLoadError>;

    /// Human-readable origin for logs (e.g. file paths)
    fn describe(&self) -> String;
}
