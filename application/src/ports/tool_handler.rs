//! Tool handler port
//!
//! A [`ToolHandler`] is the concrete integration behind one or more tool
//! definitions (web search, knowledge lookup, ticketing, mail...). Handlers
//! receive an explicit [`InvocationContext`] at call time instead of having
//! credentials baked in, so one handler can serve many agents.
//!
//! # Resolution
//!
//! The [`HandlerRegistry`] resolves a definition to a handler by tool id
//! first, then by the stem of the definition's `file` reference
//! (`toolkit/utility_tools.py` → `utility_tools`).

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use switchyard_domain::{Arguments, ToolDefinition, ToolError};

/// Per-call input of a handler.
///
/// `credentials` and `fixed` come from the agent's tool config and are never
/// overridden by `call_args`, which come from the decision service.
#[derive(Debug, Clone, Default)]
pub struct InvocationContext {
    /// Id of the tool definition being invoked
    pub tool_id: String,
    pub credentials: Arguments,
    pub fixed: Arguments,
    pub call_args: Arguments,
}

impl InvocationContext {
    pub fn new(tool_id: impl Into<String>) -> Self {
        Self {
            tool_id: tool_id.into(),
            ..Default::default()
        }
    }

    /// Arguments safe to forward to an implementation: call args overlaid
    /// with agent-fixed params, credentials excluded.
    pub fn forwarded(&self) -> Arguments {
        let mut args = self.call_args.clone();
        for (key, value) in &self.fixed {
            args.insert(key.clone(), value.clone());
        }
        args
    }

    /// Look up an argument across fixed params and call args.
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.fixed.get(name).or_else(|| self.call_args.get(name))
    }

    pub fn arg_str(&self, name: &str) -> Option<&str> {
        self.arg(name).and_then(Value::as_str)
    }

    pub fn arg_u64(&self, name: &str) -> Option<u64> {
        self.arg(name).and_then(Value::as_u64)
    }

    pub fn credential(&self, name: &str) -> Option<&str> {
        self.credentials
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}

/// Concrete implementation behind a tool definition.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Registry key (tool id or implementation stem)
    fn name(&self) -> &str;

    /// Execute the tool. Errors are rendered as observations by the caller.
    async fn invoke(&self, ctx: &InvocationContext) -> Result<String, ToolError>;
}

/// Handlers keyed by tool id or implementation stem
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its own name
    pub fn register<H: ToolHandler + 'static>(self, handler: H) -> Self {
        let key = handler.name().to_string();
        self.register_as(key, Arc::new(handler))
    }

    /// Register a handler under an explicit key (aliases, shared handlers)
    pub fn register_as(mut self, key: impl Into<String>, handler: Arc<dyn ToolHandler>) -> Self {
        self.handlers.insert(key.into(), handler);
        self
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn ToolHandler>> {
        self.handlers.get(key).cloned()
    }

    /// Handler for a definition: by id, else by implementation stem.
    pub fn resolve(&self, definition: &ToolDefinition) -> Option<Arc<dyn ToolHandler>> {
        self.get(&definition.id).or_else(|| {
            definition
                .implementation_stem()
                .and_then(|stem| self.get(stem))
        })
    }

    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo(&'static str);

    #[async_trait]
    impl ToolHandler for Echo {
        fn name(&self) -> &str {
            self.0
        }

        async fn invoke(&self, ctx: &InvocationContext) -> Result<String, ToolError> {
            Ok(format!("{}:{}", self.0, ctx.tool_id))
        }
    }

    #[test]
    fn test_resolve_by_id_then_stem() {
        let registry = HandlerRegistry::new()
            .register(Echo("web_search"))
            .register(Echo("utility_tools"));

        let by_id = ToolDefinition::new("web_search", "d").with_file("search_tool.py");
        assert_eq!(registry.resolve(&by_id).unwrap().name(), "web_search");

        let by_stem = ToolDefinition::new("current_time", "d").with_file("toolkit/utility_tools.py");
        assert_eq!(registry.resolve(&by_stem).unwrap().name(), "utility_tools");

        let missing = ToolDefinition::new("gmail_tool", "d").with_file("gmail_tool.py");
        assert!(registry.resolve(&missing).is_none());
    }

    #[test]
    fn test_forwarded_excludes_credentials() {
        let mut ctx = InvocationContext::new("jira_tool");
        ctx.credentials.insert("api_key".into(), json!("secret"));
        ctx.fixed.insert("project".into(), json!("OPS"));
        ctx.call_args.insert("summary".into(), json!("Printer broken"));

        let forwarded = ctx.forwarded();
        assert_eq!(forwarded.len(), 2);
        assert!(forwarded.get("api_key").is_none());
        assert_eq!(ctx.credential("api_key"), Some("secret"));
        assert_eq!(ctx.arg_str("project"), Some("OPS"));
    }

    #[test]
    fn test_empty_credential_counts_as_missing() {
        let mut ctx = InvocationContext::new("t");
        ctx.credentials.insert("api_key".into(), json!(""));
        assert!(ctx.credential("api_key").is_none());
    }

    #[tokio::test]
    async fn test_alias_registration_shares_handler() {
        let handler: Arc<dyn ToolHandler> = Arc::new(Echo("search"));
        let registry = HandlerRegistry::new()
            .register_as("web_search", Arc::clone(&handler))
            .register_as("internet_search", handler);
        assert_eq!(registry.keys(), vec!["internet_search", "web_search"]);

        let out = registry
            .get("internet_search")
            .unwrap()
            .invoke(&InvocationContext::new("internet_search"))
            .await
            .unwrap();
        assert_eq!(out, "search:internet_search");
    }
}
