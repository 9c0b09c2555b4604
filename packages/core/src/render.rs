//! Example-body synthesis: renders an entity of a [`SchemaGraph`] as
//! annotated, JSON-like text that documentation readers can copy from.
//!
//! The output is for humans. It is not guaranteed to be valid JSON: field
//! descriptions are attached as `//` comments, and placeholder values are the
//! declared type names rather than real data.
//!
//! ```text
//! {
//!   "enabled": "boolean", // whether the route is live
//!   // upstream service
//!   "service": {
//!     "name": "string"
//!   },
//!   "hosts": ["string"]
//! }
//! ```

use std::collections::HashMap;

use crate::document::entity_name;
use crate::graph::SchemaGraph;
use crate::types::{ArrayItem, EntitySpec, FieldKind, FieldSpec};

const INDENT: &str = "  ";
const EMPTY_OBJECT: &str = "{}";

/// Render the example body of entity `name`.
///
/// Returns `None` if `name` is not in the graph. References are resolved
/// recursively. Each recursion branch carries its own list of the entities
/// visited to reach it; descending into an entity already on that list
/// renders `{}` instead, so cycles terminate while an entity reached through
/// two unrelated branches is rendered in full at both sites.
pub fn render_entity(graph: &SchemaGraph, name: &str) -> Option<String> {
    let entity = graph.get(name)?;
    let mut out = String::new();
    write_entity(graph, entity, &[entity.name.as_str()], 0, &mut out);
    Some(out)
}

/// Example bodies for every entity of one graph, rendered once per pass.
#[derive(Debug, Clone, Default)]
pub struct ExampleBook {
    bodies: HashMap<String, String>,
}

impl ExampleBook {
    /// Render every entity in `graph`.
    pub fn build(graph: &SchemaGraph) -> Self {
        let bodies = graph
            .names()
            .filter_map(|name| render_entity(graph, name).map(|body| (name.to_string(), body)))
            .collect();
        Self { bodies }
    }

    /// The body of entity `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.bodies.get(name).map(String::as_str)
    }

    /// The body a `$ref` such as `#/definitions/RouteDTO` points at.
    pub fn resolve(&self, reference: &str) -> Option<&str> {
        self.get(entity_name(reference))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

// --- helpers -----------------------------------------------------------------

#[derive(Clone, Copy, PartialEq)]
enum Placement {
    /// `"field": "string", // comment`
    Inline,
    /// Comment on its own line above a multi-line value.
    Above,
}

struct RenderedField<'g> {
    name: &'g str,
    value: String,
    comment: Option<String>,
    placement: Placement,
}

fn write_entity<'g>(
    graph: &'g SchemaGraph,
    entity: &'g EntitySpec,
    branch: &[&'g str],
    depth: usize,
    out: &mut String,
) {
    let fields: Vec<RenderedField<'g>> = entity
        .fields
        .values()
        .filter_map(|f| render_field(graph, f, branch, depth + 1))
        .collect();
    if fields.is_empty() {
        out.push_str(EMPTY_OBJECT);
        return;
    }

    out.push_str("{\n");
    let last = fields.len() - 1;
    for (i, field) in fields.iter().enumerate() {
        if let (Some(comment), Placement::Above) = (&field.comment, field.placement) {
            indent(out, depth + 1);
            out.push_str("// ");
            out.push_str(comment);
            out.push('\n');
        }
        indent(out, depth + 1);
        out.push('"');
        out.push_str(field.name);
        out.push_str("\": ");
        out.push_str(&field.value);
        if i < last {
            out.push(',');
        }
        if let (Some(comment), Placement::Inline) = (&field.comment, field.placement) {
            out.push_str(" // ");
            out.push_str(comment);
        }
        out.push('\n');
    }
    indent(out, depth);
    out.push('}');
}

// `depth` is the indentation level of the field's own line.
fn render_field<'g>(
    graph: &'g SchemaGraph,
    field: &'g FieldSpec,
    branch: &[&'g str],
    depth: usize,
) -> Option<RenderedField<'g>> {
    let (value, placement) = match &field.kind {
        FieldKind::Scalar(scalar) => (format!("\"{scalar}\""), Placement::Inline),
        FieldKind::Object => (EMPTY_OBJECT.to_string(), Placement::Inline),
        FieldKind::Array(ArrayItem::Type(item)) => (format!("[\"{item}\"]"), Placement::Inline),
        FieldKind::Array(ArrayItem::Unspecified) => ("[]".to_string(), Placement::Inline),
        FieldKind::Array(ArrayItem::Reference(target)) => {
            let value = match descend(graph, target, branch, depth + 1) {
                Some(inner) => {
                    let mut v = String::from("[\n");
                    indent(&mut v, depth + 1);
                    v.push_str(&inner);
                    v.push('\n');
                    indent(&mut v, depth);
                    v.push(']');
                    v
                }
                None => "[]".to_string(),
            };
            (value, Placement::Above)
        }
        // A dangling reference drops the field entirely.
        FieldKind::Reference(target) => (descend(graph, target, branch, depth)?, Placement::Above),
        FieldKind::Unknown(_) => return None,
    };
    Some(RenderedField {
        name: &field.name,
        value,
        comment: field.comment.as_deref().map(single_line),
        placement,
    })
}

/// Render `target` one level down the current branch, or `None` when the
/// target is not in the graph.
fn descend<'g>(
    graph: &'g SchemaGraph,
    target: &'g str,
    branch: &[&'g str],
    depth: usize,
) -> Option<String> {
    let entity = graph.get(target)?;
    let mut visited = branch.to_vec();
    visited.push(target);
    if visited[..visited.len() - 1].contains(&target) {
        return Some(EMPTY_OBJECT.to_string());
    }
    let mut out = String::new();
    write_entity(graph, entity, &visited, depth, &mut out);
    Some(out)
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn single_line(comment: &str) -> String {
    comment.split_whitespace().collect::<Vec<_>>().join(" ")
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(json: &str) -> SchemaGraph {
        SchemaGraph::parse(&format!(r#"{{"definitions": {json}}}"#)).unwrap()
    }

    #[test]
    fn nested_reference_renders_inline() {
        let g = graph(
            r##"{
                "Foo": {"type": "object", "properties": {"bar": {"type": "string"}}},
                "Baz": {"type": "object", "properties": {"foo": {"$ref": "#/definitions/Foo"}}}
            }"##,
        );
        let body = render_entity(&g, "Baz").unwrap();
        assert_eq!(body, "{\n  \"foo\": {\n    \"bar\": \"string\"\n  }\n}");
    }

    #[test]
    fn self_reference_truncates_to_empty_object() {
        let g = graph(
            r##"{"Node": {"type": "object", "properties": {"next": {"$ref": "#/definitions/Node"}}}}"##,
        );
        assert_eq!(render_entity(&g, "Node").unwrap(), "{\n  \"next\": {}\n}");
    }

    #[test]
    fn three_cycle_terminates() {
        let g = graph(
            r##"{
                "A": {"type": "object", "properties": {"b": {"$ref": "#/definitions/B"}}},
                "B": {"type": "object", "properties": {"c": {"$ref": "#/definitions/C"}}},
                "C": {"type": "object", "properties": {"a": {"$ref": "#/definitions/A"}}}
            }"##,
        );
        let body = render_entity(&g, "A").unwrap();
        assert!(body.contains("\"a\": {}"));
        assert_eq!(body.matches("\"b\"").count(), 1);
    }

    #[test]
    fn diamond_renders_in_full_at_both_sites() {
        let g = graph(
            r##"{
                "A": {"type": "object", "properties": {
                    "b": {"$ref": "#/definitions/B"},
                    "c": {"$ref": "#/definitions/C"}
                }},
                "B": {"type": "object", "properties": {"d": {"$ref": "#/definitions/D"}}},
                "C": {"type": "object", "properties": {"d": {"$ref": "#/definitions/D"}}},
                "D": {"type": "object", "properties": {"x": {"type": "string"}}}
            }"##,
        );
        let body = render_entity(&g, "A").unwrap();
        assert_eq!(body.matches("\"x\": \"string\"").count(), 2);
        assert!(!body.contains("\"d\": {}"));
    }

    #[test]
    fn arrays_and_comments() {
        let g = graph(
            r##"{
                "Route": {"type": "object", "properties": {
                    "enabled": {"type": "boolean", "description": "whether the route is live"},
                    "hosts": {"type": "array", "items": {"type": "string"}},
                    "children": {"type": "array", "description": "sub routes", "items": {"$ref": "#/definitions/Route"}},
                    "meta": {"type": "object", "description": "free\nform"}
                }}
            }"##,
        );
        let body = render_entity(&g, "Route").unwrap();
        assert!(body.contains("  // sub routes\n  \"children\": [\n    {}\n  ],\n"));
        assert!(body.contains("\"enabled\": \"boolean\", // whether the route is live\n"));
        assert!(body.contains("\"hosts\": [\"string\"],\n"));
        assert!(body.contains("\"meta\": {} // free form\n"));
    }

    #[test]
    fn array_of_entity_renders_entity_in_brackets() {
        let g = graph(
            r##"{
                "Page": {"type": "object", "properties": {"content": {"type": "array", "items": {"$ref": "#/definitions/Item"}}}},
                "Item": {"type": "object", "properties": {"id": {"type": "integer"}}}
            }"##,
        );
        let body = render_entity(&g, "Page").unwrap();
        assert_eq!(
            body,
            "{\n  \"content\": [\n    {\n      \"id\": \"integer\"\n    }\n  ]\n}"
        );
    }

    #[test]
    fn missing_targets_are_silent() {
        let g = graph(
            r##"{"Holder": {"type": "object", "properties": {
                "ghost": {"$ref": "#/definitions/Ghost"},
                "ghosts": {"type": "array", "items": {"$ref": "#/definitions/Ghost"}},
                "name": {"type": "string"}
            }}}"##,
        );
        let body = render_entity(&g, "Holder").unwrap();
        assert!(!body.contains("\"ghost\":"));
        assert!(body.contains("\"ghosts\": [],"));
        assert!(body.contains("\"name\": \"string\"\n"));
        assert!(render_entity(&g, "Ghost").is_none());
    }

    #[test]
    fn opaque_entity_renders_empty_object() {
        let g = graph(r#"{"Map": {"type": "object"}}"#);
        assert_eq!(render_entity(&g, "Map").unwrap(), "{}");
    }

    #[test]
    fn rendering_is_deterministic() {
        let g = graph(
            r##"{
                "A": {"type": "object", "properties": {
                    "z": {"type": "string"}, "a": {"type": "integer"}, "m": {"$ref": "#/definitions/A"}
                }}
            }"##,
        );
        let first = render_entity(&g, "A").unwrap();
        for _ in 0..5 {
            assert_eq!(render_entity(&g, "A").unwrap(), first);
        }
        assert_eq!(ExampleBook::build(&g).get("A"), Some(first.as_str()));
    }

    #[test]
    fn book_resolves_refs() {
        let g = graph(r#"{"Map": {"type": "object"}}"#);
        let book = ExampleBook::build(&g);
        assert_eq!(book.len(), 1);
        assert_eq!(book.resolve("#/definitions/Map"), Some("{}"));
        assert_eq!(book.resolve("#/definitions/Nope"), None);
    }
}
