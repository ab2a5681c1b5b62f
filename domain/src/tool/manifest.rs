//! Tool Manifest Store
//!
//! A validated, immutable snapshot of every [`ToolDefinition`] known to the
//! system. Built once per load/reload and shared behind an `Arc`.

use super::entities::{ParameterKind, ToolDefinition};
use crate::core::error::ManifestError;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ToolManifest {
    /// Definitions in manifest order
    tools: Vec<ToolDefinition>,
    /// id → position in `tools`
    index: HashMap<String, usize>,
}

impl ToolManifest {
    /// Validate definitions into a manifest.
    ///
    /// Rejects an empty list, blank ids, duplicate ids, and defaults whose
    /// JSON type contradicts the declared parameter kind.
    pub fn new(tools: Vec<ToolDefinition>) -> Result<Self, ManifestError> {
        if tools.is_empty() {
            return Err(ManifestError::EmptyToolManifest);
        }

        let mut index = HashMap::with_capacity(tools.len());
        for (i, tool) in tools.iter().enumerate() {
            if tool.id.trim().is_empty() {
                return Err(ManifestError::MissingToolId { index: i });
            }
            if index.insert(tool.id.clone(), i).is_some() {
                return Err(ManifestError::DuplicateToolId(tool.id.clone()));
            }
            for (name, spec) in &tool.parameters {
                if let Some(default) = spec.default_value()
                    && !default_matches(spec.kind, default)
                {
                    return Err(ManifestError::InvalidParameter {
                        tool: tool.id.clone(),
                        parameter: name.clone(),
                        reason: format!("default value does not match type {}", spec.kind),
                    });
                }
            }
        }

        Ok(Self { tools, index })
    }

    pub fn get(&self, id: &str) -> Option<&ToolDefinition> {
        self.index.get(id).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

fn default_matches(kind: ParameterKind, value: &serde_json::Value) -> bool {
    match kind {
        // Manifests routinely write numeric defaults for string params ("5"), so
        // only structural mismatches are rejected.
        ParameterKind::String => !value.is_object() && !value.is_array(),
        ParameterKind::Integer | ParameterKind::Object => kind.accepts(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ParameterSpec;

    fn tool(id: &str) -> ToolDefinition {
        ToolDefinition::new(id, format!("{id} description"))
    }

    #[test]
    fn test_manifest_lookup_preserves_order() {
        let manifest =
            ToolManifest::new(vec![tool("jira_tool"), tool("gmail_tool"), tool("calendar")])
                .unwrap();
        assert_eq!(manifest.len(), 3);
        assert!(manifest.contains("gmail_tool"));
        assert_eq!(manifest.get("calendar").unwrap().id, "calendar");
        assert!(manifest.get("missing").is_none());
        let ids: Vec<_> = manifest.ids().collect();
        assert_eq!(ids, vec!["jira_tool", "gmail_tool", "calendar"]);
    }

    #[test]
    fn test_empty_manifest_rejected() {
        assert_eq!(
            ToolManifest::new(vec![]).unwrap_err(),
            ManifestError::EmptyToolManifest
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = ToolManifest::new(vec![tool("a"), tool("b"), tool("a")]).unwrap_err();
        assert_eq!(err, ManifestError::DuplicateToolId("a".to_string()));
    }

    #[test]
    fn test_blank_id_rejected() {
        let err = ToolManifest::new(vec![tool("a"), tool("  ")]).unwrap_err();
        assert_eq!(err, ManifestError::MissingToolId { index: 1 });
    }

    #[test]
    fn test_mismatched_default_rejected() {
        let bad = tool("t").with_parameter("limit", ParameterSpec::integer().with_default("ten"));
        let err = ToolManifest::new(vec![bad]).unwrap_err();
        assert!(matches!(err, ManifestError::InvalidParameter { .. }));

        let ok = tool("t").with_parameter("label", ParameterSpec::string().with_default(5));
        assert!(ToolManifest::new(vec![ok]).is_ok());
    }
}
