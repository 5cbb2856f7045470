// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The textual codec (§4.3): one JSON object per line. Projection is
//! applied at parse time, the same way the packed codec applies it at
//! decode time — a field missing from the projection is never converted
//! into a `Value` in the first place.

use serde_json::Value as JsonValue;

use crate::core::{Document, Result, StoreError, Value};
use crate::io::{InputStream, OutputStream};
use crate::projection::ProjectionNode;

/// Read every line of `input` as a JSON object, applying `projection`.
pub fn read_all(input: &mut dyn InputStream, projection: Option<&ProjectionNode>) -> Result<Vec<Document>> {
    let mut docs = Vec::new();
    while let Some(line) = input.read_line()? {
        if line.trim().is_empty() {
            continue;
        }
        docs.push(read_line(&line, projection)?);
    }
    Ok(docs)
}

/// Parse one line as a JSON object and convert it to a [`Document`].
fn read_line(line: &str, projection: Option<&ProjectionNode>) -> Result<Document> {
    let json: JsonValue = serde_json::from_str(line)
        .map_err(|e| StoreError::corrupt("textual chunk line", format!("invalid JSON: {e}")))?;
    match json {
        JsonValue::Object(map) => Ok(object_to_document(map, projection)),
        other => Err(StoreError::corrupt(
            "textual chunk line",
            format!("expected a JSON object, found {}", json_type_name(&other)),
        )),
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn object_to_document(map: serde_json::Map<String, JsonValue>, projection: Option<&ProjectionNode>) -> Document {
    let mut doc = Document::new();
    for (key, value) in map {
        let child_projection = match projection {
            None => None,
            Some(p) if p.is_leaf() => None,
            Some(p) => match p.child(&key) {
                Some(child) => Some(child),
                None => continue,
            },
        };
        doc.insert(key, json_to_value(value, child_projection));
    }
    doc
}

fn json_to_value(value: JsonValue, projection: Option<&ProjectionNode>) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Boolean(b),
        JsonValue::Number(n) => number_to_value(&n),
        JsonValue::String(s) => Value::String(s),
        JsonValue::Array(items) => {
            Value::List(items.into_iter().map(|item| json_to_value(item, projection)).collect())
        }
        JsonValue::Object(map) => Value::Document(object_to_document(map, projection)),
    }
}

/// `serde_json`'s `Number` has no notion of the eleven-variant type tag,
/// so integers that fit in `i64`/`u64` round through those, and anything
/// else (including all fractional numbers) becomes `Float64`. The
/// textual codec cannot distinguish `Int32` from `Int64` on read; callers
/// needing exact width should use the packed or columnar format instead.
fn number_to_value(n: &serde_json::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Int64(i)
    } else if let Some(u) = n.as_u64() {
        Value::UInt64(u)
    } else {
        Value::Float64(n.as_f64().unwrap_or(0.0))
    }
}

/// Write every document to `output`, one JSON object per line.
pub fn write_all(output: &mut dyn OutputStream, documents: &[Document]) -> Result<()> {
    for doc in documents {
        let json = document_to_json(doc);
        let mut line = serde_json::to_vec(&json)
            .map_err(|e| StoreError::corrupt("textual chunk write", format!("serialization failed: {e}")))?;
        line.push(b'\n');
        output.write(&line)?;
    }
    output.flush()
}

fn document_to_json(doc: &Document) -> JsonValue {
    let map = doc.iter().map(|(k, v)| (k.clone(), value_to_json(v))).collect();
    JsonValue::Object(map)
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Int32(v) => JsonValue::from(*v),
        Value::UInt32(v) => JsonValue::from(*v),
        Value::Int64(v) => JsonValue::from(*v),
        Value::UInt64(v) => JsonValue::from(*v),
        Value::Float32(v) => serde_json::Number::from_f64(*v as f64)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::Float64(v) => serde_json::Number::from_f64(*v)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Document(doc) => document_to_json(doc),
        Value::List(list) => JsonValue::Array(list.iter().map(value_to_json).collect()),
    }
}

/// Convenience used by tests and the CLI: serialize one document to a
/// single JSON line (no trailing newline).
pub fn document_to_line(doc: &Document) -> Result<String> {
    let json = document_to_json(doc);
    serde_json::to_string(&json).map_err(|e| StoreError::corrupt("textual line", e.to_string()))
}
