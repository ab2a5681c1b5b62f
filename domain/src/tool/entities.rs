//! Tool domain entities

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Argument map passed to and between tools.
///
/// `serde_json::Map` keeps a deterministic key order, which matters when a
/// handler has to pick "the first plausible" free-text argument.
pub type Arguments = serde_json::Map<String, Value>;

/// Declared type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    #[default]
    String,
    Integer,
    Object,
}

impl ParameterKind {
    /// Parse a manifest `type` value. Unknown names fall back to `String`.
    pub fn from_type_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" => ParameterKind::Integer,
            "object" | "dict" => ParameterKind::Object,
            _ => ParameterKind::String,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterKind::String => "string",
            ParameterKind::Integer => "integer",
            ParameterKind::Object => "object",
        }
    }

    /// Whether a JSON value is acceptable for this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ParameterKind::String => value.is_string(),
            ParameterKind::Integer => value.is_i64() || value.is_u64(),
            ParameterKind::Object => value.is_object(),
        }
    }

    /// Convert a scalar to this kind when the conversion is lossless.
    ///
    /// Numbers and booleans become strings; numeric strings and whole floats
    /// become integers. Anything else is returned unchanged.
    pub fn coerce(&self, value: Value) -> Value {
        match (self, value) {
            (ParameterKind::String, Value::Number(n)) => Value::String(n.to_string()),
            (ParameterKind::String, Value::Bool(b)) => Value::String(b.to_string()),
            (ParameterKind::Integer, Value::String(s)) => match s.trim().parse::<i64>() {
                Ok(n) => Value::from(n),
                Err(_) => Value::String(s),
            },
            (ParameterKind::Integer, Value::Number(n)) if n.is_f64() => match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Value::from(f as i64),
                _ => Value::Number(n),
            },
            (_, value) => value,
        }
    }
}

impl std::fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Specification of a single tool parameter
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterSpec {
    #[serde(rename = "type", default)]
    pub kind: ParameterKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Credentials are bound per agent and never exposed to the decision service.
    #[serde(default)]
    pub is_credential: bool,
    #[serde(default)]
    pub description: String,
}

impl ParameterSpec {
    pub fn new(kind: ParameterKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn string() -> Self {
        Self::new(ParameterKind::String)
    }

    pub fn integer() -> Self {
        Self::new(ParameterKind::Integer)
    }

    pub fn object() -> Self {
        Self::new(ParameterKind::Object)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn credential(mut self) -> Self {
        self.is_credential = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// A `null` default counts as no default, matching manifest semantics.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref().filter(|v| !v.is_null())
    }
}

/// Declarative definition of a tool from the tool manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Stable unique id (also the name exposed to the decision service)
    pub id: String,
    /// Human-facing name (may contain spaces or non-ASCII text)
    pub display_name: String,
    pub description: String,
    /// Reference to the implementation backing the tool (e.g. `utility_tools.py`)
    pub file: String,
    pub parameters: BTreeMap<String, ParameterSpec>,
}

impl ToolDefinition {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            description: description.into(),
            file: String::new(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, spec: ParameterSpec) -> Self {
        self.parameters.insert(name.into(), spec);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.get(name)
    }

    pub fn is_credential(&self, name: &str) -> bool {
        self.parameter(name).is_some_and(|p| p.is_credential)
    }

    pub fn credential_parameters(&self) -> impl Iterator<Item = (&str, &ParameterSpec)> {
        self.parameters
            .iter()
            .filter(|(_, p)| p.is_credential)
            .map(|(n, p)| (n.as_str(), p))
    }

    pub fn exposed_parameters(&self) -> impl Iterator<Item = (&str, &ParameterSpec)> {
        self.parameters
            .iter()
            .filter(|(_, p)| !p.is_credential)
            .map(|(n, p)| (n.as_str(), p))
    }

    /// Implementation stem of `file` (`"toolkit/utility_tools.py"` → `"utility_tools"`).
    pub fn implementation_stem(&self) -> Option<&str> {
        let name = self.file.rsplit(['/', '\\']).next()?;
        let stem = name.split_once('.').map_or(name, |(stem, _)| stem);
        (!stem.is_empty()).then_some(stem)
    }
}

/// A call to a tool with arguments, as chosen by the decision service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    #[serde(default)]
    pub arguments: Arguments,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: Arguments::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }
}
