//! Tool and agent manifests stored as JSON files

mod document;
mod file_source;

pub use document::{parse_agent_manifest, parse_tool_manifest};
pub use file_source::FileManifestSource;
