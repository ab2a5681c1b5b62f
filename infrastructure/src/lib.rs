//! Infrastructure layer for switchyard
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: configuration and manifest files, the HTTP
//! decision service, built-in tool handlers and JSONL trace logging.

pub mod config;
pub mod decision;
pub mod handlers;
pub mod knowledge;
pub mod logging;
pub mod manifests;
pub mod watch;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileDecisionConfig, FileOutputConfig, FileOutputFormat,
    FileReplConfig,
};
pub use decision::{HttpDecisionConfig, HttpDecisionService};
pub use handlers::default_registry;
pub use knowledge::DirectoryKnowledgeBase;
pub use logging::JsonlTraceLogger;
pub use manifests::FileManifestSource;
pub use watch::ManifestWatcher;
