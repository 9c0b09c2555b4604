//! Deserialisable model of the schema documents that backend services publish.
//!
//! Only the parts of a Swagger 2.0 style document that the console reads are
//! modelled: `basePath`, `definitions`, `paths`, and `tags`. Unknown keys are
//! ignored. Operations are kept as raw JSON until [`SchemaDocument::operations`]
//! decodes them, so one malformed operation never poisons the whole document.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while reading a schema document.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema document is empty")]
    Empty,

    #[error("schema document is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A parsed schema document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    #[serde(default)]
    pub base_path: Option<String>,

    /// Named object schemas. `None` when the document has no `definitions`.
    #[serde(default)]
    pub definitions: Option<BTreeMap<String, Definition>>,

    /// url → method → raw operation object, in document order.
    #[serde(default)]
    pub paths: IndexMap<String, Map<String, Value>>,

    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// One entry of the `definitions` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Definition {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub properties: Option<BTreeMap<String, Property>>,
}

/// One property of a definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Property {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,

    #[serde(default)]
    pub items: Option<Items>,
}

/// The `items` clause of an array-typed property or schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Items {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// A controller tag declared at document level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tag {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// A decoded path-method object.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub operation_id: Option<String>,

    #[serde(default)]
    pub consumes: Vec<String>,

    #[serde(default)]
    pub produces: Vec<String>,

    /// Raw parameter objects; decoded one by one by the assembler.
    #[serde(default)]
    pub parameters: Vec<Value>,

    #[serde(default)]
    pub responses: IndexMap<String, RawResponse>,
}

/// A response entry keyed by HTTP status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawResponse {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub schema: Option<SchemaRef>,
}

/// The `schema` clause of a body parameter or a response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaRef {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,

    /// Either a boolean or a nested schema, so kept as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Value>,
}

/// An operation together with the path table coordinates it was found at.
#[derive(Debug, Clone)]
pub struct OperationEntry<'a> {
    pub url: &'a str,
    pub method: &'a str,
    pub operation: Operation,
}

impl OperationEntry<'_> {
    /// Operations without a description are undocumented and never surfaced.
    pub fn is_documented(&self) -> bool {
        self.operation.description.is_some()
    }
}

impl SchemaDocument {
    /// Parse a document from its JSON text.
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        if text.trim().is_empty() {
            return Err(SchemaError::Empty);
        }
        Ok(serde_json::from_str(text)?)
    }

    /// Decode every path-method object, in path-table order.
    ///
    /// Entries that are not operation objects (such as path-level
    /// `parameters` arrays) and operations that fail to decode are skipped.
    pub fn operations(&self) -> Vec<OperationEntry<'_>> {
        let mut out = Vec::new();
        for (url, methods) in &self.paths {
            for (method, raw) in methods {
                if !raw.is_object() {
                    tracing::debug!(url = %url, key = %method, "skipping non-operation path entry");
                    continue;
                }
                match Operation::deserialize(raw) {
                    Ok(operation) => out.push(OperationEntry {
                        url,
                        method,
                        operation,
                    }),
                    Err(e) => {
                        tracing::warn!(url = %url, method = %method, error = %e, "skipping undecodable operation");
                    }
                }
            }
        }
        out
    }

    /// Number of operations that carry a description.
    pub fn documented_operation_count(&self) -> usize {
        self.operations()
            .iter()
            .filter(|entry| entry.is_documented())
            .count()
    }
}

/// The entity name a `$ref` points at: `"#/definitions/RouteDTO"` → `"RouteDTO"`.
pub fn entity_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_name_strips_prefix() {
        assert_eq!(entity_name("#/definitions/RouteDTO"), "RouteDTO");
        assert_eq!(entity_name("RouteDTO"), "RouteDTO");
    }

    #[test]
    fn empty_text_is_an_error() {
        assert!(matches!(SchemaDocument::from_json("  "), Err(SchemaError::Empty)));
        assert!(matches!(
            SchemaDocument::from_json("{not json"),
            Err(SchemaError::Malformed(_))
        ));
    }

    #[test]
    fn operations_skip_path_level_parameters_and_count_documented() {
        let doc = SchemaDocument::from_json(
            r#"{
                "paths": {
                    "/v1/routes": {
                        "parameters": [{"name": "x", "in": "query"}],
                        "get": {"tags": ["route-controller"], "description": "list"},
                        "post": {"tags": ["route-controller"]}
                    }
                }
            }"#,
        )
        .unwrap();
        let ops = doc.operations();
        assert_eq!(ops.len(), 2);
        assert_eq!(doc.documented_operation_count(), 1);
    }

    #[test]
    fn missing_sections_default() {
        let doc = SchemaDocument::from_json("{}").unwrap();
        assert!(doc.definitions.is_none());
        assert!(doc.paths.is_empty());
        assert!(doc.tags.is_empty());
    }
}
