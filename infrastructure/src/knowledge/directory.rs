//! Knowledge base over a directory of plain-text and markdown documents.
//!
//! Documents are split into paragraphs and ranked by the share of query
//! terms each paragraph contains. Files are re-read on every search so edits
//! show up without a restart.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use switchyard_application::{KnowledgeBase, KnowledgeError, KnowledgeHit};
use tracing::{debug, warn};

const DOCUMENT_EXTENSIONS: [&str; 3] = ["txt", "md", "markdown"];

pub struct DirectoryKnowledgeBase {
    root: PathBuf,
}

impl DirectoryKnowledgeBase {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn documents(&self) -> Result<Vec<(String, String)>, KnowledgeError> {
        let mut entries = tokio::fs::read_dir(&self.root).await.map_err(|e| {
            KnowledgeError::Unavailable(format!("{}: {}", self.root.display(), e))
        })?;

        let mut documents = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| KnowledgeError::SearchFailed(e.to_string()))?
        {
            let path = entry.path();
            let is_document = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
            if !is_document {
                continue;
            }
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    documents.push((name, text));
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable document"),
            }
        }
        documents.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(documents)
    }
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split("\n\n").map(str::trim).filter(|p| !p.is_empty())
}

#[async_trait]
impl KnowledgeBase for DirectoryKnowledgeBase {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<KnowledgeHit>, KnowledgeError> {
        let query_terms = terms(query);
        if query_terms.is_empty() || max_results == 0 {
            return Ok(Vec::new());
        }

        let documents = self.documents().await?;
        let mut hits: Vec<KnowledgeHit> = documents
            .iter()
            .flat_map(|(source, text)| paragraphs(text).map(move |p| (source, p)))
            .filter_map(|(source, paragraph)| {
                let paragraph_terms = terms(paragraph);
                let matched = query_terms.intersection(&paragraph_terms).count();
                (matched > 0).then(|| KnowledgeHit {
                    source: source.clone(),
                    content: paragraph.to_string(),
                    score: matched as f32 / query_terms.len() as f32,
                })
            })
            .collect();

        // Stable sort keeps document order among equal scores.
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(max_results);

        debug!(
            root = %self.root.display(),
            documents = documents.len(),
            hits = hits.len(),
            "Knowledge search"
        );
        Ok(hits)
    }
}
