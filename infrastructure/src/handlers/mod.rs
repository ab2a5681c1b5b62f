//! Built-in tool handlers
//!
//! | Key | Handler | Aliases |
//! |-----|---------|---------|
//! | `web_search` | DuckDuckGo instant answers (`web-tools`) | `google_search_tool`, `internet_search`, `search_tool` |
//! | `knowledge_search` | [`KnowledgeLookupHandler`] | `knowledge_search_tool`, `knowledge_lookup`, `rag_tool` |
//! | `current_time` | [`CurrentTimeHandler`] | |
//! | `calculator` | [`CalculatorHandler`] | |
//!
//! Aliases match either a tool id or the stem of a definition's `file`.

mod knowledge;
mod utility;
#[cfg(feature = "web-tools")]
mod web_search;

pub use knowledge::{KNOWLEDGE_SEARCH, KnowledgeLookupHandler};
pub use utility::{CALCULATOR, CURRENT_TIME, CalculatorHandler, CurrentTimeHandler, evaluate};
#[cfg(feature = "web-tools")]
pub use web_search::{WEB_SEARCH, WebSearchHandler};

use std::sync::Arc;
use switchyard_application::{
    HandlerRegistry, InvocationContext, KNOWLEDGE_SEARCH_IDS, KnowledgeBase, ToolHandler,
};

/// The preferred argument, else the first non-empty string argument.
pub(crate) fn free_text_argument(ctx: &InvocationContext, preferred: &str) -> Option<String> {
    if let Some(value) = ctx.arg_str(preferred).filter(|s| !s.trim().is_empty()) {
        return Some(value.to_string());
    }
    ctx.forwarded()
        .values()
        .filter_map(|v| v.as_str())
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Registry with every built-in handler.
///
/// Knowledge lookup is only registered when a knowledge base is supplied.
pub fn default_registry(knowledge: Option<Arc<dyn KnowledgeBase>>) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new()
        .register(CurrentTimeHandler)
        .register(CalculatorHandler);

    if let Some(knowledge) = knowledge {
        let handler: Arc<dyn ToolHandler> = Arc::new(KnowledgeLookupHandler::new(knowledge));
        registry = registry
            .register_as(KNOWLEDGE_SEARCH, Arc::clone(&handler))
            .register_as("rag_tool", Arc::clone(&handler));
        for id in KNOWLEDGE_SEARCH_IDS {
            registry = registry.register_as(id, Arc::clone(&handler));
        }
    }

    #[cfg(feature = "web-tools")]
    {
        match WebSearchHandler::new() {
            Ok(search) => {
                let handler: Arc<dyn ToolHandler> = Arc::new(search);
                registry = registry.register_as("search_tool", Arc::clone(&handler));
                for id in switchyard_application::WEB_SEARCH_IDS {
                    registry = registry.register_as(id, Arc::clone(&handler));
                }
            }
            Err(e) => tracing::warn!(error = %e, "Web search handler unavailable"),
        }
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::DirectoryKnowledgeBase;
    use serde_json::json;

    #[test]
    fn test_default_registry_keys() {
        let registry = default_registry(None);
        assert!(registry.get(CURRENT_TIME).is_some());
        assert!(registry.get(CALCULATOR).is_some());
        assert!(registry.get("knowledge_search_tool").is_none());

        let kb: Arc<dyn KnowledgeBase> = Arc::new(DirectoryKnowledgeBase::new("."));
        let registry = default_registry(Some(kb));
        assert!(registry.get("knowledge_search_tool").is_some());
        assert!(registry.get("rag_tool").is_some());
        assert!(registry.get("knowledge_lookup").is_some());
        assert!(registry.get(KNOWLEDGE_SEARCH).is_some());
    }

    #[test]
    fn test_free_text_argument_fallback() {
        let mut ctx = InvocationContext::new("t");
        ctx.call_args.insert("limit".into(), json!(3));
        ctx.call_args.insert("q".into(), json!("phở"));
        assert_eq!(free_text_argument(&ctx, "query").as_deref(), Some("phở"));

        ctx.fixed.insert("query".into(), json!("bún chả"));
        assert_eq!(free_text_argument(&ctx, "query").as_deref(), Some("bún chả"));

        assert!(free_text_argument(&InvocationContext::new("t"), "query").is_none());
    }
}
