// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! End-to-end scenarios, one per concrete example in the design notes:
//! flat optional, nested optional, repeated primitive, nested repeated,
//! projection pushdown, and the format triangle.

use archebase_store::{Chunk, ChunkFormat, Document, ProjectionNode, SchemaNode, Value};

fn doc_of(pairs: &[(&str, Value)]) -> Document {
    pairs.iter().cloned().map(|(k, v)| (k.to_string(), v)).collect()
}

fn write_schema(dir: &std::path::Path, schema_json: &str) -> String {
    let path = dir.join("schema.json");
    std::fs::write(&path, schema_json).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn flat_optional() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = write_schema(dir.path(), r#"{"a":"int","b":"string"}"#);
    let chunk = Chunk::open(dir.path().join("chunk"), ChunkFormat::Columnar, Some(&schema_path)).unwrap();

    let docs = vec![
        doc_of(&[("a", Value::Int32(1)), ("b", Value::String("x".to_string()))]),
        doc_of(&[("a", Value::Int32(2))]),
    ];
    chunk.write(&docs).unwrap();
    assert_eq!(chunk.read(None).unwrap(), docs);
}

#[test]
fn nested_optional() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = write_schema(dir.path(), r#"{"outer":{"inner":"int"}}"#);
    let chunk = Chunk::open(dir.path().join("chunk"), ChunkFormat::Columnar, Some(&schema_path)).unwrap();

    let mut outer = Document::new();
    outer.insert("inner".to_string(), Value::Int32(7));
    let docs = vec![doc_of(&[("outer", Value::Document(outer))]), Document::new()];
    chunk.write(&docs).unwrap();
    assert_eq!(chunk.read(None).unwrap(), docs);
}

#[test]
fn repeated_primitive() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = write_schema(dir.path(), r#"{"xs":["int"]}"#);
    let chunk = Chunk::open(dir.path().join("chunk"), ChunkFormat::Columnar, Some(&schema_path)).unwrap();

    let docs = vec![
        doc_of(&[("xs", Value::List(vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)]))]),
        doc_of(&[("xs", Value::List(vec![]))]),
        Document::new(),
    ];
    chunk.write(&docs).unwrap();
    assert_eq!(chunk.read(None).unwrap(), docs);
}

#[test]
fn nested_repeated() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = write_schema(dir.path(), r#"{"g":[{"v":"int"}]}"#);
    let chunk = Chunk::open(dir.path().join("chunk"), ChunkFormat::Columnar, Some(&schema_path)).unwrap();

    let elem1 = doc_of(&[("v", Value::Int32(1))]);
    let elem2 = doc_of(&[("v", Value::Int32(2))]);
    let docs = vec![
        doc_of(&[("g", Value::List(vec![Value::Document(elem1), Value::Document(elem2)]))]),
        doc_of(&[("g", Value::List(vec![]))]),
    ];
    chunk.write(&docs).unwrap();
    assert_eq!(chunk.read(None).unwrap(), docs);
}

#[test]
fn projection_pushdown_matches_and_misses() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = write_schema(dir.path(), r#"{"g":[{"v":"int"}]}"#);
    let chunk = Chunk::open(dir.path().join("chunk"), ChunkFormat::Columnar, Some(&schema_path)).unwrap();

    let elem1 = doc_of(&[("v", Value::Int32(1))]);
    let elem2 = doc_of(&[("v", Value::Int32(2))]);
    let docs = vec![
        doc_of(&[("g", Value::List(vec![Value::Document(elem1), Value::Document(elem2)]))]),
        doc_of(&[("g", Value::List(vec![]))]),
    ];
    chunk.write(&docs).unwrap();

    let matching = ProjectionNode::parse("g.v").unwrap();
    assert_eq!(chunk.read(Some(&matching)).unwrap(), docs);

    let missing = ProjectionNode::parse("other").unwrap();
    assert_eq!(chunk.read(Some(&missing)).unwrap(), vec![Document::new(), Document::new()]);
}

#[test]
fn format_triangle() {
    let schema_json = r#"{"id":"long","name":"string","tags":["string"],"meta":{"score":"double","active":"bool"}}"#;
    let schema = SchemaNode::parse(schema_json).unwrap();

    let documents: Vec<Document> = (0..100)
        .map(|i| {
            let mut meta = Document::new();
            meta.insert("score".to_string(), Value::Float64(i as f64 * 0.5));
            meta.insert("active".to_string(), Value::Boolean(i % 2 == 0));
            doc_of(&[
                ("id", Value::Int64(i)),
                ("name", Value::String(format!("item-{i}"))),
                (
                    "tags",
                    Value::List(if i % 3 == 0 {
                        vec![]
                    } else {
                        vec![Value::String("a".to_string()), Value::String("b".to_string())]
                    }),
                ),
                ("meta", Value::Document(meta)),
            ])
        })
        .collect();

    let dir = tempfile::tempdir().unwrap();
    let schema_path = write_schema(dir.path(), schema_json);

    let textual_chunk = Chunk::open(dir.path().join("a.jsonl"), ChunkFormat::Textual, None).unwrap();
    textual_chunk.write(&documents).unwrap();

    let packed_chunk = Chunk::open(dir.path().join("b.bin"), ChunkFormat::Packed, None).unwrap();
    let from_textual = textual_chunk.read(None).unwrap();
    packed_chunk.write(&from_textual).unwrap();

    let columnar_chunk = Chunk::open(dir.path().join("c_dir"), ChunkFormat::Columnar, Some(&schema_path)).unwrap();
    let from_packed = packed_chunk.read(None).unwrap();
    columnar_chunk.write(&from_packed).unwrap();

    let final_textual_chunk = Chunk::open(dir.path().join("d.jsonl"), ChunkFormat::Textual, None).unwrap();
    let from_columnar = columnar_chunk.read(None).unwrap();
    final_textual_chunk.write(&from_columnar).unwrap();

    let final_documents = final_textual_chunk.read(None).unwrap();
    assert_eq!(final_documents, documents);
}
