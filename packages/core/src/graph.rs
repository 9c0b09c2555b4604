use std::collections::HashMap;

use crate::document::{SchemaDocument, SchemaError};
use crate::types::EntitySpec;

/// The entities of one schema document, connected by reference fields.
///
/// The graph is a lookup structure, not a validator. References to entities
/// that are not present are kept as-is; consumers treat them as absent.
/// The reference graph may contain cycles and diamonds.
///
/// Entities are indexed by name. Duplicate names replace the earlier entry.
#[derive(Debug, Default, Clone)]
pub struct SchemaGraph {
    entities: HashMap<String, EntitySpec>,
}

impl SchemaGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document's JSON text and build its graph.
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        Ok(Self::from_document(&SchemaDocument::from_json(text)?))
    }

    /// Build a graph from the `definitions` section of a document.
    ///
    /// A document without definitions yields an empty graph.
    pub fn from_document(document: &SchemaDocument) -> Self {
        let mut g = Self::new();
        if let Some(definitions) = &document.definitions {
            for (name, definition) in definitions {
                if let Some(entity) = EntitySpec::from_definition(name, definition) {
                    g.add(entity);
                }
            }
        }
        g
    }

    /// Insert an entity. An entity with the same name is replaced.
    pub fn add(&mut self, entity: EntitySpec) {
        self.entities.insert(entity.name.clone(), entity);
    }

    pub fn get(&self, name: &str) -> Option<&EntitySpec> {
        self.entities.get(name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity names in unspecified order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldKind;

    const DOC: &str = r##"{
        "definitions": {
            "RouteDTO": {
                "type": "object",
                "properties": {
                    "id": {"type": "integer", "description": "primary key"},
                    "service": {"$ref": "#/definitions/ServiceDTO"},
                    "hosts": {"type": "array", "items": {"type": "string"}},
                    "ghost": {"$ref": "#/definitions/Missing"}
                }
            },
            "ServiceDTO": {
                "type": "object",
                "properties": {"name": {"type": "string"}}
            },
            "Metadata": {"type": "object"},
            "Alias": {"type": "string"}
        }
    }"##;

    #[test]
    fn parse_records_entities_and_opaque_markers() {
        let g = SchemaGraph::parse(DOC).unwrap();
        assert_eq!(g.len(), 3);
        assert!(g.get("Metadata").unwrap().opaque);
        assert!(g.get("Alias").is_none());

        let route = g.get("RouteDTO").unwrap();
        assert_eq!(route.fields["id"].kind, FieldKind::Scalar(crate::types::ScalarType::Integer));
        assert_eq!(route.fields["id"].comment.as_deref(), Some("primary key"));
    }

    #[test]
    fn no_definitions_is_empty() {
        let g = SchemaGraph::parse(r#"{"paths": {}}"#).unwrap();
        assert!(g.is_empty());
    }

    #[test]
    fn add_replaces_existing() {
        let mut g = SchemaGraph::new();
        g.add(EntitySpec::opaque("A"));
        g.add(EntitySpec::opaque("A"));
        assert_eq!(g.len(), 1);
        assert_eq!(g.names().collect::<Vec<_>>(), vec!["A"]);
    }
}
