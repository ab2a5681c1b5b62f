//! `web_search` handler: DuckDuckGo Instant Answer API.
//!
//! Needs no API key. Returns abstracts, instant answers, definitions and
//! related topics rather than full result listings.
//!
//! | Argument | Type | Description |
//! |----------|------|-------------|
//! | `query` | string | The search query (falls back to the first string argument) |

use super::free_text_argument;
use async_trait::async_trait;
use std::time::Duration;
use switchyard_application::{InvocationContext, ToolHandler};
use switchyard_domain::ToolError;
use tracing::debug;

/// Registry key of the web search handler
pub const WEB_SEARCH: &str = "web_search";

/// DuckDuckGo Instant Answer API endpoint (no API key required).
const DDG_API_URL: &str = "https://api.duckduckgo.com/";

pub struct WebSearchHandler {
    client: reqwest::Client,
}

impl WebSearchHandler {
    pub fn new() -> Result<Self, ToolError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("switchyard/", env!("CARGO_PKG_VERSION"), " (Agent Tool)"))
            .build()
            .map_err(|e| ToolError::execution_failed(format!("HTTP client unavailable: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ToolHandler for WebSearchHandler {
    fn name(&self) -> &str {
        WEB_SEARCH
    }

    async fn invoke(&self, ctx: &InvocationContext) -> Result<String, ToolError> {
        let query = free_text_argument(ctx, "query")
            .ok_or_else(|| ToolError::invalid_argument("Missing search query"))?;
        debug!(tool = %ctx.tool_id, query = %query, "Web search");

        let response = self
            .client
            .get(DDG_API_URL)
            .query(&[
                ("q", query.as_str()),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(|e| ToolError::execution_failed(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ToolError::execution_failed(format!(
                "Search API returned error: {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            ToolError::execution_failed(format!("Failed to parse search results: {}", e))
        })?;

        Ok(format_search_results(&query, &body))
    }
}

/// Render a DuckDuckGo response as markdown sections.
fn format_search_results(query: &str, data: &serde_json::Value) -> String {
    let mut sections: Vec<String> = vec![format!("## Search Results for: {}", query)];

    if let Some(abstract_text) = data["AbstractText"].as_str()
        && !abstract_text.is_empty()
    {
        let source = data["AbstractSource"].as_str().unwrap_or("Unknown");
        let url = data["AbstractURL"].as_str().unwrap_or("");
        sections.push(format!(
            "### Summary ({})\n{}\nSource: {}",
            source, abstract_text, url
        ));
    }

    if let Some(answer) = data["Answer"].as_str()
        && !answer.is_empty()
    {
        sections.push(format!("### Instant Answer\n{}", answer));
    }

    if let Some(definition) = data["Definition"].as_str()
        && !definition.is_empty()
    {
        let source = data["DefinitionSource"].as_str().unwrap_or("Unknown");
        sections.push(format!("### Definition ({})\n{}", source, definition));
    }

    if let Some(topics) = data["RelatedTopics"].as_array() {
        // Nested topic groups have no top-level `Text` and are skipped.
        let topic_texts: Vec<String> = topics
            .iter()
            .filter_map(|t| {
                let text = t["Text"].as_str().filter(|s| !s.is_empty())?;
                Some(format!("- {} ({})", text, t["FirstURL"].as_str().unwrap_or("")))
            })
            .take(10)
            .collect();

        if !topic_texts.is_empty() {
            sections.push(format!("### Related Topics\n{}", topic_texts.join("\n")));
        }
    }

    if sections.len() == 1 {
        sections.push(format!("No instant answer available for '{}'.", query));
    }

    sections.join("\n\n")
}
