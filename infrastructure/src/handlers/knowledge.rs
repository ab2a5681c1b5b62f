//! Knowledge lookup handler
//!
//! Delegates to a [`KnowledgeBase`] and renders the passages for the agent.

use super::free_text_argument;
use async_trait::async_trait;
use std::sync::Arc;
use switchyard_application::{InvocationContext, KnowledgeBase, KnowledgeHit, ToolHandler};
use switchyard_domain::ToolError;

/// Registry key of the knowledge lookup handler
pub const KNOWLEDGE_SEARCH: &str = "knowledge_search";

const DEFAULT_MAX_RESULTS: usize = 5;
const MAX_RESULTS_CAP: usize = 20;

pub struct KnowledgeLookupHandler {
    knowledge: Arc<dyn KnowledgeBase>,
}

impl KnowledgeLookupHandler {
    pub fn new(knowledge: Arc<dyn KnowledgeBase>) -> Self {
        Self { knowledge }
    }
}

#[async_trait]
impl ToolHandler for KnowledgeLookupHandler {
    fn name(&self) -> &str {
        KNOWLEDGE_SEARCH
    }

    async fn invoke(&self, ctx: &InvocationContext) -> Result<String, ToolError> {
        let query = free_text_argument(ctx, "query")
            .ok_or_else(|| ToolError::invalid_argument("Missing search query"))?;
        let max_results = ctx
            .arg_u64("max_results")
            .map(|n| (n as usize).clamp(1, MAX_RESULTS_CAP))
            .unwrap_or(DEFAULT_MAX_RESULTS);

        let hits = self
            .knowledge
            .search(&query, max_results)
            .await
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;

        Ok(format_hits(&query, &hits))
    }
}

fn format_hits(query: &str, hits: &[KnowledgeHit]) -> String {
    if hits.is_empty() {
        return format!("Không tìm thấy thông tin liên quan đến: {}", query);
    }

    let mut out = format!(
        "Tìm thấy {} thông tin liên quan đến câu hỏi: '{}'\n\n",
        hits.len(),
        query
    );
    for (i, hit) in hits.iter().enumerate() {
        out.push_str(&format!("**Kết quả {}:**\n", i + 1));
        out.push_str(&format!("Nguồn: {}\n", hit.source));
        out.push_str(&format!("Nội dung: {}\n", hit.content));
        if i + 1 < hits.len() {
            out.push('\n');
            out.push_str(&"─".repeat(50));
            out.push_str("\n\n");
        }
    }
    out
}
