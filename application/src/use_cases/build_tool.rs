//! Credential-scoped tool factory
//!
//! Turns a [`ToolDefinition`] plus one agent's tool config into a
//! [`ToolInstance`]: a value object holding the exposed schema, the bound
//! credentials and fixed params, and the resolved handler. Nothing is
//! captured in closures; every call builds an explicit [`InvocationContext`].
//!
//! # Invocation pipeline
//!
//! ```text
//! call args ─▶ scrub ─▶ normalize ─▶ defaults ─▶ validate ─▶ handler
//!              (drop config/credential keys)                    │
//!                                      ToolResult::observation ◀┘
//! ```
//!
//! Every failure along the way becomes a [`ToolResult`] failure, rendered as
//! `Error executing {tool}: ...`. A single failing tool never aborts the
//! owning agent.

use crate::ports::tool_handler::{HandlerRegistry, InvocationContext, ToolHandler};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;
use switchyard_domain::{
    Arguments, ParameterSchema, SanitizedName, ToolBuildError, ToolDefinition, ToolError,
    ToolResult,
};
use tracing::{debug, warn};

/// Argument names searched, in order, for a free-text query
pub const QUERY_ALIASES: [&str; 6] = ["query", "q", "search_query", "search_term", "text", "input"];
/// Keys with these suffixes are never mistaken for a query
const NON_QUERY_SUFFIXES: [&str; 3] = ["_key", "_id", "_token"];

pub const DEFAULT_RESULT_COUNT: u64 = 5;
pub const MAX_RESULT_COUNT: u64 = 10;

/// Tool ids with bespoke web-search argument handling
pub const WEB_SEARCH_IDS: [&str; 3] = ["google_search_tool", "web_search", "internet_search"];
/// Tool ids with bespoke knowledge-lookup argument handling
pub const KNOWLEDGE_SEARCH_IDS: [&str; 2] = ["knowledge_search_tool", "knowledge_lookup"];

/// Bespoke argument normalization selected by tool id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentNormalizer {
    /// `query` + `num_results` in `[1, 10]`
    WebSearch,
    /// `query` + `max_results` in `[1, 10]`
    KnowledgeSearch,
    /// Forward as-is
    PassThrough,
}

impl ArgumentNormalizer {
    pub fn for_tool_id(id: &str) -> Self {
        if WEB_SEARCH_IDS.contains(&id) {
            ArgumentNormalizer::WebSearch
        } else if KNOWLEDGE_SEARCH_IDS.contains(&id) {
            ArgumentNormalizer::KnowledgeSearch
        } else {
            ArgumentNormalizer::PassThrough
        }
    }

    fn count_key(&self) -> Option<&'static str> {
        match self {
            ArgumentNormalizer::WebSearch => Some("num_results"),
            ArgumentNormalizer::KnowledgeSearch => Some("max_results"),
            ArgumentNormalizer::PassThrough => None,
        }
    }

    pub fn normalize(&self, mut args: Arguments) -> Result<Arguments, ToolError> {
        let Some(count_key) = self.count_key() else {
            return Ok(args);
        };

        let query = extract_query(&args).ok_or_else(|| {
            ToolError::invalid_argument("No search query found in the arguments")
                .with_details(format!("received keys: {}", key_list(&args)))
        })?;
        let count = clamp_result_count(args.get(count_key));

        for alias in QUERY_ALIASES {
            args.remove(alias);
        }
        args.insert("query".to_string(), json!(query));
        args.insert(count_key.to_string(), json!(count));
        Ok(args)
    }
}

fn key_list(args: &Arguments) -> String {
    args.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// First non-empty alias, else the first plausible free-text value.
pub fn extract_query(args: &Arguments) -> Option<String> {
    let non_empty = |v: &Value| {
        v.as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    QUERY_ALIASES
        .iter()
        .find_map(|alias| args.get(*alias).and_then(non_empty))
        .or_else(|| {
            args.iter()
                .filter(|(key, _)| !NON_QUERY_SUFFIXES.iter().any(|s| key.ends_with(s)))
                .find_map(|(_, value)| non_empty(value))
        })
}

/// Result count clamped into `[1, 10]`; absent or unparsable gives 5.
pub fn clamp_result_count(value: Option<&Value>) -> u64 {
    let requested = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match requested {
        Some(n) => n.clamp(1, MAX_RESULT_COUNT as i64) as u64,
        None => DEFAULT_RESULT_COUNT,
    }
}

/// An empty or whitespace-only string, which never counts as a credential.
pub fn is_blank(value: &Value) -> bool {
    value.as_str().is_some_and(|s| s.trim().is_empty())
}

/// A tool bound to one agent's credentials and fixed params.
#[derive(Clone)]
pub struct ToolInstance {
    name: String,
    definition: ToolDefinition,
    /// Exposed schema: no credentials, no agent-fixed params
    schema: ParameterSchema,
    credentials: Arguments,
    fixed: Arguments,
    normalizer: ArgumentNormalizer,
    handler: Option<Arc<dyn ToolHandler>>,
}

impl std::fmt::Debug for ToolInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolInstance")
            .field("name", &self.name)
            .field("tool_id", &self.definition.id)
            .field("fixed", &self.fixed.keys().collect::<Vec<_>>())
            .field("credentials", &self.credentials.len())
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

impl ToolInstance {
    /// Sanitized name exposed to the decision service
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tool_id(&self) -> &str {
        &self.definition.id
    }

    pub fn display_name(&self) -> &str {
        &self.definition.display_name
    }

    pub fn description(&self) -> &str {
        &self.definition.description
    }

    pub fn schema(&self) -> &ParameterSchema {
        &self.schema
    }

    /// Required credentials with no bound value and no default
    pub fn missing_credentials(&self) -> Vec<&str> {
        self.definition
            .credential_parameters()
            .filter(|(name, spec)| spec.required && !self.credentials.contains_key(*name))
            .map(|(name, _)| name)
            .collect()
    }

    /// Drop every call arg the agent config controls or that names a credential.
    fn scrub(&self, mut call_args: Arguments) -> Arguments {
        call_args.retain(|key, _| {
            let controlled = self.fixed.contains_key(key)
                || self.credentials.contains_key(key)
                || self.definition.is_credential(key);
            if controlled {
                debug!(tool = %self.name, key = %key, "Ignoring call argument controlled by agent config");
            }
            !controlled
        });
        call_args
    }

    /// Build the invocation context for a call, or the error observation.
    pub fn prepare(&self, call_args: Arguments) -> Result<InvocationContext, ToolError> {
        let missing = self.missing_credentials();
        if !missing.is_empty() {
            return Err(ToolError::missing_credentials(&missing));
        }

        let mut args = self.normalizer.normalize(self.scrub(call_args))?;
        self.schema.apply_defaults(&mut args);
        self.schema.coerce(&mut args);
        self.schema
            .validate(&args)
            .map_err(ToolError::invalid_argument)?;

        Ok(InvocationContext {
            tool_id: self.definition.id.clone(),
            credentials: self.credentials.clone(),
            fixed: self.fixed.clone(),
            call_args: args,
        })
    }

    /// Invoke the tool. Never fails; failures are carried in the result.
    pub async fn invoke(&self, call_args: Arguments) -> ToolResult {
        let start = Instant::now();

        let result = match self.prepare(call_args) {
            Err(error) => ToolResult::failure(&self.name, error),
            Ok(ctx) => match &self.handler {
                None => ToolResult::failure(
                    &self.name,
                    ToolError::not_found(format!("handler for tool '{}'", self.definition.id)),
                ),
                Some(handler) => match handler.invoke(&ctx).await {
                    Ok(output) => ToolResult::success(&self.name, output),
                    Err(error) => ToolResult::failure(&self.name, error),
                },
            },
        };

        if let Some(error) = result.error() {
            warn!(tool = %self.name, error = %error, "Tool execution failed");
        }
        result.with_duration(start.elapsed().as_millis() as u64)
    }
}

/// Builds [`ToolInstance`]s against a handler registry
#[derive(Clone, Default)]
pub struct ToolFactory {
    registry: HandlerRegistry,
}

impl ToolFactory {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Bind a definition to one agent's config.
    ///
    /// Fails only when a required, non-credential parameter has neither a
    /// value in the agent config nor a default. Credentials are checked at
    /// call time.
    pub fn build(
        &self,
        definition: &ToolDefinition,
        agent_config: &Arguments,
    ) -> Result<ToolInstance, ToolBuildError> {
        let mut credentials = Arguments::new();
        let mut fixed = Arguments::new();

        for (key, value) in agent_config {
            if value.is_null() {
                continue;
            }
            match definition.parameter(key) {
                None => debug!(
                    tool = %definition.id,
                    key = %key,
                    "Dropping undeclared parameter from agent tool config"
                ),
                Some(spec) if spec.is_credential => {
                    if is_blank(value) {
                        debug!(tool = %definition.id, key = %key, "Ignoring blank credential");
                    } else {
                        credentials.insert(key.clone(), value.clone());
                    }
                }
                Some(_) => {
                    fixed.insert(key.clone(), value.clone());
                }
            }
        }

        for (name, spec) in definition.credential_parameters() {
            if let Some(default) = spec.default_value()
                && !credentials.contains_key(name)
            {
                credentials.insert(name.to_string(), default.clone());
            }
        }

        for (name, spec) in definition.exposed_parameters() {
            if spec.required && spec.default_value().is_none() && !fixed.contains_key(name) {
                return Err(ToolBuildError::MissingRequiredParameter {
                    tool: definition.id.clone(),
                    parameter: name.to_string(),
                });
            }
        }

        let mut schema = ParameterSchema::compile(definition);
        schema.fields.retain(|f| !fixed.contains_key(&f.name));

        let name = SanitizedName::new(&definition.id);
        if name.was_changed() {
            warn!(
                original = %name.original,
                sanitized = %name.sanitized,
                "Tool id sanitized for the decision service"
            );
        }

        let handler = self.registry.resolve(definition);
        if handler.is_none() {
            warn!(tool = %definition.id, file = %definition.file, "No handler registered for tool");
        }

        Ok(ToolInstance {
            name: name.sanitized,
            definition: definition.clone(),
            schema,
            credentials,
            fixed,
            normalizer: ArgumentNormalizer::for_tool_id(&definition.id),
            handler,
        })
    }
}
