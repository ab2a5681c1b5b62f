//! Parameter schema compiled from a [`ToolDefinition`].
//!
//! The schema is what the decision service is allowed to see and set:
//! credential parameters are never part of it. Each field is a small tagged
//! union (type + requirement) so validation and JSON Schema rendering work
//! from the same value.

use super::entities::{Arguments, ParameterKind, ToolDefinition};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Whether a field must be supplied, and what fills it otherwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "requirement", rename_all = "snake_case")]
pub enum FieldRequirement {
    Required,
    Optional { default: Option<Value> },
}

/// One non-credential parameter as seen by the decision service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    pub kind: ParameterKind,
    pub description: String,
    pub requirement: FieldRequirement,
}

impl SchemaField {
    pub fn is_required(&self) -> bool {
        matches!(self.requirement, FieldRequirement::Required)
    }

    pub fn default(&self) -> Option<&Value> {
        match &self.requirement {
            FieldRequirement::Optional { default } => default.as_ref(),
            FieldRequirement::Required => None,
        }
    }
}

/// Compiled input schema for one tool
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterSchema {
    pub fields: Vec<SchemaField>,
}

impl ParameterSchema {
    /// Compile the exposed schema of a tool definition.
    ///
    /// A parameter is `Required` only when it is declared required and has no
    /// default; a default turns it into an optional field carrying that value.
    pub fn compile(definition: &ToolDefinition) -> Self {
        let fields = definition
            .exposed_parameters()
            .map(|(name, spec)| {
                let requirement = match spec.default_value() {
                    None if spec.required => FieldRequirement::Required,
                    default => FieldRequirement::Optional {
                        default: default.cloned(),
                    },
                };
                SchemaField {
                    name: name.to_string(),
                    kind: spec.kind,
                    description: spec.description.clone(),
                    requirement,
                }
            })
            .collect();
        Self { fields }
    }

    /// Schema with a single required string parameter, used for agents
    /// exposed as dispatch targets.
    pub fn single_string(name: &str, description: &str) -> Self {
        Self {
            fields: vec![SchemaField {
                name: name.to_string(),
                kind: ParameterKind::String,
                description: description.to_string(),
                requirement: FieldRequirement::Required,
            }],
        }
    }

    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fill absent optional fields with their defaults.
    pub fn apply_defaults(&self, arguments: &mut Arguments) {
        for field in &self.fields {
            if let Some(default) = field.default()
                && !arguments.contains_key(&field.name)
            {
                arguments.insert(field.name.clone(), default.clone());
            }
        }
    }

    /// Coerce every declared field present to its kind (see [`ParameterKind::coerce`]).
    pub fn coerce(&self, arguments: &mut Arguments) {
        for field in &self.fields {
            if let Some(value) = arguments.remove(&field.name) {
                arguments.insert(field.name.clone(), field.kind.coerce(value));
            }
        }
    }

    /// Check required fields and the types of every declared field present.
    ///
    /// Undeclared arguments are tolerated; handlers decide what to do with them.
    pub fn validate(&self, arguments: &Arguments) -> Result<(), String> {
        for field in &self.fields {
            match arguments.get(&field.name) {
                None | Some(Value::Null) if field.is_required() => {
                    return Err(format!("Missing required argument: {}", field.name));
                }
                Some(value) if !value.is_null() && !field.kind.accepts(value) => {
                    return Err(format!(
                        "Argument '{}' must be of type {}",
                        field.name, field.kind
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Render as provider-neutral JSON Schema.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for field in &self.fields {
            let mut prop = serde_json::Map::new();
            prop.insert("type".to_string(), json!(field.kind.as_str()));
            if !field.description.is_empty() {
                prop.insert("description".to_string(), json!(field.description));
            }
            if let Some(default) = field.default() {
                prop.insert("default".to_string(), default.clone());
            }
            properties.insert(field.name.clone(), Value::Object(prop));

            if field.is_required() {
                required.push(json!(field.name));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}
