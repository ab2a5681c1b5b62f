//! File-backed manifest source

use super::document::{parse_agent_manifest, parse_tool_manifest};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use switchyard_application::{ConfigLoadError, ManifestDocuments, ManifestSource};
use tracing::debug;

/// Reads `tools.json` and `agents.json` from disk on every load.
#[derive(Debug, Clone)]
pub struct FileManifestSource {
    tools_path: PathBuf,
    agents_path: PathBuf,
}

impl FileManifestSource {
    pub fn new(tools_path: impl Into<PathBuf>, agents_path: impl Into<PathBuf>) -> Self {
        Self {
            tools_path: tools_path.into(),
            agents_path: agents_path.into(),
        }
    }

    pub fn tools_path(&self) -> &Path {
        &self.tools_path
    }

    pub fn agents_path(&self) -> &Path {
        &self.agents_path
    }

    /// Latest modification time of the two manifest files.
    ///
    /// `None` when neither file can be inspected.
    pub async fn last_modified(&self) -> Option<SystemTime> {
        let mut latest = None;
        for path in [&self.tools_path, &self.agents_path] {
            if let Ok(meta) = tokio::fs::metadata(path).await
                && let Ok(modified) = meta.modified()
            {
                latest = latest.max(Some(modified));
            }
        }
        latest
    }

    async fn read(path: &Path) -> Result<String, ConfigLoadError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigLoadError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl ManifestSource for FileManifestSource {
    async fn load(&self) -> Result<ManifestDocuments, ConfigLoadError> {
        let tools_json = Self::read(&self.tools_path).await?;
        let agents_json = Self::read(&self.agents_path).await?;

        let tools = parse_tool_manifest(&self.tools_path.display().to_string(), &tools_json)?;
        let agents = parse_agent_manifest(&self.agents_path.display().to_string(), &agents_json)?;

        debug!(
            tools = tools.len(),
            agents = agents.len(),
            source = %self.describe(),
            "Loaded manifest documents"
        );
        Ok(ManifestDocuments { tools, agents })
    }

    fn describe(&self) -> String {
        format!("{} + {}", self.tools_path.display(), self.agents_path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOOLS: &str = r#"[{"id": "web_search", "parameters": {"query": {"type": "string"}}}]"#;
    const AGENTS: &str = r#"[{"agent_name": "Search Agent", "tools": ["web_search"]}]"#;

    fn write_manifests(dir: &Path, tools: &str, agents: &str) -> FileManifestSource {
        let tools_path = dir.join("tools.json");
        let agents_path = dir.join("agents.json");
        std::fs::write(&tools_path, tools).unwrap();
        std::fs::write(&agents_path, agents).unwrap();
        FileManifestSource::new(tools_path, agents_path)
    }

    #[tokio::test]
    async fn test_load_both_documents() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_manifests(dir.path(), TOOLS, AGENTS);

        let documents = source.load().await.unwrap();
        assert_eq!(documents.tools.len(), 1);
        assert_eq!(documents.agents[0].name, "Search Agent");
        assert!(source.last_modified().await.is_some());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileManifestSource::new(dir.path().join("nope.json"), dir.path().join("agents.json"));
        assert!(matches!(source.load().await, Err(ConfigLoadError::Io { .. })));
        assert!(source.last_modified().await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_agents_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_manifests(dir.path(), TOOLS, r#"[{"agent_name": "A", "tools": [}"#);
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse { .. }));
        assert!(err.to_string().contains("agents.json"));
    }
}
