//! Knowledge base port
//!
//! Boundary to the document-ingestion / retrieval subsystem used by the
//! knowledge lookup tools. How documents are indexed is the adapter's business.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Knowledge base unavailable: {0}")]
    Unavailable(String),

    #[error("Search failed: {0}")]
    SearchFailed(String),
}

/// One retrieved passage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeHit {
    pub source: String,
    pub content: String,
    pub score: f32,
}

#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Return at most `max_results` passages, best first.
    async fn search(&self, query: &str, max_results: usize)
    -> Result<Vec<KnowledgeHit>, KnowledgeError>;
}
