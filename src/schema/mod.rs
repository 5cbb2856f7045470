// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The schema tree (§3).
//!
//! A schema is itself a document-shaped tree: leaves are string tags
//! naming a primitive type, internal nodes are either a nested object or a
//! one-element list whose sole element is a nested schema. This module
//! parses that shape out of a JSON-style textual document and exposes it
//! as a [`SchemaNode`] tree that [`crate::fieldgraph`] walks to build a
//! field graph.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::core::{Result, StoreError};

/// A parsed node of the schema tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// A leaf naming one of the primitive type tags.
    Primitive(PrimitiveTag),
    /// An optional nested record.
    Object(BTreeMap<String, SchemaNode>),
    /// A repeated field; the boxed node is the element schema.
    Repeated(Box<SchemaNode>),
}

/// Primitive type tags recognized in a schema leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTag {
    /// `"int"` - maps to [`crate::core::Value::Int32`].
    Int,
    /// `"uint"` - maps to [`crate::core::Value::UInt32`].
    UInt,
    /// `"long"` - maps to [`crate::core::Value::Int64`].
    Long,
    /// `"ulong"` - maps to [`crate::core::Value::UInt64`].
    ULong,
    /// `"float"` - maps to [`crate::core::Value::Float32`].
    Float,
    /// `"double"` - maps to [`crate::core::Value::Float64`].
    Double,
    /// `"bool"` - maps to [`crate::core::Value::Boolean`].
    Bool,
    /// `"string"` - maps to [`crate::core::Value::String`].
    String,
}

impl PrimitiveTag {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "int" => Some(PrimitiveTag::Int),
            "uint" => Some(PrimitiveTag::UInt),
            "long" => Some(PrimitiveTag::Long),
            "ulong" => Some(PrimitiveTag::ULong),
            "float" => Some(PrimitiveTag::Float),
            "double" => Some(PrimitiveTag::Double),
            "bool" => Some(PrimitiveTag::Bool),
            "string" => Some(PrimitiveTag::String),
            _ => None,
        }
    }
}

impl SchemaNode {
    /// Parse a schema tree from its textual JSON-style representation.
    ///
    /// The root must be an object (§7: "schema not an object" is a
    /// `SchemaError`); a bare primitive or repeated schema at the root is
    /// rejected even though both are valid as nested nodes.
    pub fn parse(text: &str) -> Result<SchemaNode> {
        let value: JsonValue = serde_json::from_str(text)
            .map_err(|e| StoreError::schema("", format!("schema is not valid JSON: {e}")))?;
        if !value.is_object() {
            return Err(StoreError::schema("", "schema root must be an object"));
        }
        Self::from_json(&value, "")
    }

    fn from_json(value: &JsonValue, path: &str) -> Result<SchemaNode> {
        match value {
            JsonValue::String(tag) => PrimitiveTag::from_tag(tag)
                .map(SchemaNode::Primitive)
                .ok_or_else(|| StoreError::schema(path, format!("unknown primitive tag '{tag}'"))),
            JsonValue::Object(map) => {
                let mut children = BTreeMap::new();
                for (name, sub) in map {
                    let child_path = if path.is_empty() {
                        name.clone()
                    } else {
                        format!("{path}.{name}")
                    };
                    children.insert(name.clone(), SchemaNode::from_json(sub, &child_path)?);
                }
                Ok(SchemaNode::Object(children))
            }
            JsonValue::Array(items) => {
                if items.len() != 1 {
                    return Err(StoreError::schema(
                        path,
                        format!("repeated field must have exactly one element schema, got {}", items.len()),
                    ));
                }
                Ok(SchemaNode::Repeated(Box::new(Self::from_json(&items[0], path)?)))
            }
            other => Err(StoreError::schema(
                path,
                format!("unexpected schema node of type {}", json_type_name(other)),
            )),
        }
    }

    /// True if this node is a leaf (`Primitive`).
    pub fn is_primitive(&self) -> bool {
        matches!(self, SchemaNode::Primitive(_))
    }

    /// True if this node is `Repeated`.
    pub fn is_repeated(&self) -> bool {
        matches!(self, SchemaNode::Repeated(_))
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_object() {
        let schema = SchemaNode::parse(r#"{"a":"int","b":"string"}"#).unwrap();
        match schema {
            SchemaNode::Object(children) => {
                assert_eq!(children.len(), 2);
                assert_eq!(children["a"], SchemaNode::Primitive(PrimitiveTag::Int));
                assert_eq!(children["b"], SchemaNode::Primitive(PrimitiveTag::String));
            }
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn parses_nested_object() {
        let schema = SchemaNode::parse(r#"{"outer":{"inner":"int"}}"#).unwrap();
        let SchemaNode::Object(children) = schema else {
            panic!("expected object");
        };
        let SchemaNode::Object(inner) = &children["outer"] else {
            panic!("expected nested object");
        };
        assert_eq!(inner["inner"], SchemaNode::Primitive(PrimitiveTag::Int));
    }

    #[test]
    fn parses_repeated_primitive() {
        let schema = SchemaNode::parse(r#"{"xs":["int"]}"#).unwrap();
        let SchemaNode::Object(children) = schema else {
            panic!("expected object");
        };
        assert!(children["xs"].is_repeated());
    }

    #[test]
    fn parses_repeated_object() {
        let schema = SchemaNode::parse(r#"{"g":[{"v":"int"}]}"#).unwrap();
        let SchemaNode::Object(children) = schema else {
            panic!("expected object");
        };
        let SchemaNode::Repeated(inner) = &children["g"] else {
            panic!("expected repeated");
        };
        assert!(matches!(inner.as_ref(), SchemaNode::Object(_)));
    }

    #[test]
    fn rejects_multi_element_array() {
        let err = SchemaNode::parse(r#"{"xs":["int","string"]}"#).unwrap_err();
        assert!(matches!(err, StoreError::SchemaError { .. }));
    }

    #[test]
    fn rejects_unknown_tag() {
        let err = SchemaNode::parse(r#"{"a":"not_a_type"}"#).unwrap_err();
        assert!(matches!(err, StoreError::SchemaError { .. }));
    }

    #[test]
    fn rejects_non_object_root() {
        let err = SchemaNode::parse(r#""int""#).unwrap_err();
        assert!(matches!(err, StoreError::SchemaError { .. }));
    }
}
