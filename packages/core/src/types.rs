//! Field and entity model built from a document's `definitions` section.
//!
//! [`FieldSpec`] classifies each property into a [`FieldKind`] once, so the
//! renderer never has to re-interpret raw `type`/`$ref`/`items` combinations.

use std::collections::BTreeMap;

use crate::document::{entity_name, Definition, Property};

/// Scalar placeholder types. Rendered as their lowercase name in quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Integer,
    Number,
    String,
    Boolean,
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarType::Integer => write!(f, "integer"),
            ScalarType::Number => write!(f, "number"),
            ScalarType::String => write!(f, "string"),
            ScalarType::Boolean => write!(f, "boolean"),
        }
    }
}

impl std::str::FromStr for ScalarType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "integer" => Ok(ScalarType::Integer),
            "number" => Ok(ScalarType::Number),
            "string" => Ok(ScalarType::String),
            "boolean" => Ok(ScalarType::Boolean),
            _ => Err(format!("{s:?} is not a scalar type")),
        }
    }
}

/// What an array's elements are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayItem {
    /// A type token, rendered verbatim as a quoted placeholder.
    Type(String),
    /// Another entity, by simple name.
    Reference(String),
    /// No `items` clause at all.
    Unspecified,
}

/// How a field renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(ScalarType),
    /// A free-form object with no reference: `{}`.
    Object,
    Array(ArrayItem),
    /// A nested entity, by simple name.
    Reference(String),
    /// A declared type the renderer has no placeholder for; emits nothing.
    Unknown(String),
}

/// One property of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    /// The property's `description`, rendered as a `//` comment.
    pub comment: Option<String>,
}

impl FieldSpec {
    /// Classify a raw property.
    pub fn from_property(name: &str, property: &Property) -> Self {
        let reference = property.reference.as_deref().map(entity_name);
        let kind = match property.kind.as_deref() {
            Some("array") => {
                let items = property.items.as_ref();
                let item = match (
                    items.and_then(|i| i.reference.as_deref()),
                    items.and_then(|i| i.kind.as_deref()),
                ) {
                    (Some(r), _) => ArrayItem::Reference(entity_name(r).to_string()),
                    (None, Some(t)) => ArrayItem::Type(t.to_string()),
                    (None, None) => ArrayItem::Unspecified,
                };
                FieldKind::Array(item)
            }
            Some("object") | None => match reference {
                Some(r) => FieldKind::Reference(r.to_string()),
                None => FieldKind::Object,
            },
            Some(other) => match other.parse::<ScalarType>() {
                Ok(scalar) => FieldKind::Scalar(scalar),
                Err(_) => FieldKind::Unknown(other.to_string()),
            },
        };
        Self {
            name: name.to_string(),
            kind,
            comment: property.description.clone(),
        }
    }
}

/// A named entity. Fields are kept sorted by name so rendering is stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpec {
    pub name: String,
    pub fields: BTreeMap<String, FieldSpec>,
    /// Declared `type: object` with no `properties`; renders as `{}`.
    pub opaque: bool,
}

impl EntitySpec {
    pub fn opaque(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: BTreeMap::new(),
            opaque: true,
        }
    }

    /// Build an entity from a definition. Returns `None` for definitions
    /// without properties whose type is not `object`.
    pub fn from_definition(name: &str, definition: &Definition) -> Option<Self> {
        let Some(properties) = &definition.properties else {
            return match definition.kind.as_deref() {
                Some("object") => Some(Self::opaque(name)),
                _ => None,
            };
        };
        let fields = properties
            .iter()
            .map(|(field, property)| (field.clone(), FieldSpec::from_property(field, property)))
            .collect();
        Some(Self {
            name: name.to_string(),
            fields,
            opaque: false,
        })
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Items;

    fn property(kind: Option<&str>, reference: Option<&str>, items: Option<Items>) -> Property {
        Property {
            kind: kind.map(Into::into),
            description: None,
            reference: reference.map(Into::into),
            items,
        }
    }

    #[test]
    fn classifies_scalars_and_unknowns() {
        let f = FieldSpec::from_property("id", &property(Some("integer"), None, None));
        assert_eq!(f.kind, FieldKind::Scalar(ScalarType::Integer));

        let f = FieldSpec::from_property("blob", &property(Some("file"), None, None));
        assert_eq!(f.kind, FieldKind::Unknown("file".into()));
    }

    #[test]
    fn classifies_references() {
        let f = FieldSpec::from_property("route", &property(None, Some("#/definitions/Route"), None));
        assert_eq!(f.kind, FieldKind::Reference("Route".into()));

        let f = FieldSpec::from_property("extra", &property(Some("object"), None, None));
        assert_eq!(f.kind, FieldKind::Object);
    }

    #[test]
    fn classifies_arrays() {
        let items = Items {
            kind: None,
            reference: Some("#/definitions/Route".into()),
        };
        let f = FieldSpec::from_property("routes", &property(Some("array"), None, Some(items)));
        assert_eq!(f.kind, FieldKind::Array(ArrayItem::Reference("Route".into())));

        let items = Items {
            kind: Some("string".into()),
            reference: None,
        };
        let f = FieldSpec::from_property("names", &property(Some("array"), None, Some(items)));
        assert_eq!(f.kind, FieldKind::Array(ArrayItem::Type("string".into())));

        let f = FieldSpec::from_property("raw", &property(Some("array"), None, None));
        assert_eq!(f.kind, FieldKind::Array(ArrayItem::Unspecified));
    }

    #[test]
    fn definitions_without_properties() {
        let object = Definition {
            kind: Some("object".into()),
            properties: None,
        };
        assert!(EntitySpec::from_definition("Map", &object).unwrap().opaque);

        let string = Definition {
            kind: Some("string".into()),
            properties: None,
        };
        assert!(EntitySpec::from_definition("Alias", &string).is_none());
    }
}
