// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The columnar format (§4.4-§4.7, §6): a chunk directory of per-leaf
//! column streams, built and read via the [`shredder`] and [`assembler`]
//! against a [`FieldGraph`] derived from a schema.

pub mod assembler;
pub mod shredder;

use std::path::Path;

use crate::core::{Document, Result, StoreError};
use crate::fieldgraph::FieldGraph;
use crate::io::mmap::MmapInputStream;
use crate::io::InputStream;
use crate::projection::ProjectionNode;
use crate::schema::SchemaNode;

use assembler::Assembler;
use shredder::Shredder;

/// Write `documents` into the columnar chunk directory at `chunk_dir`,
/// shredding against the full (unprojected) field graph derived from
/// `schema`.
pub fn write_all(chunk_dir: &Path, schema: &SchemaNode, documents: &[Document]) -> Result<()> {
    let graph = FieldGraph::build(schema)?;
    let mut shredder = Shredder::create(&graph, chunk_dir)?;
    shredder.write_all(documents)
}

/// Read every document from the columnar chunk directory at `chunk_dir`,
/// applying `projection` to the field graph built from `schema`.
///
/// When the projection selects no field at all, the projected graph has
/// no leaves and therefore no column stream to drive record boundaries
/// from; the record count is instead recovered from the first leaf of
/// the *full* schema, since every leaf holds exactly one triple per
/// record and that leaf's own first triple of each record has `r = 0`
/// (§4.5's shredder invariants).
pub fn read_all(chunk_dir: &Path, schema: &SchemaNode, projection: Option<&ProjectionNode>) -> Result<Vec<Document>> {
    let projected_graph = FieldGraph::build_projected(schema, projection)?;
    if !projected_graph.leaves().is_empty() {
        let mut assembler = Assembler::open(&projected_graph, chunk_dir)?;
        return assembler.read_all();
    }

    let record_count = count_records_via_first_leaf(chunk_dir, schema)?;
    Ok(vec![Document::new(); record_count])
}

fn count_records_via_first_leaf(chunk_dir: &Path, schema: &SchemaNode) -> Result<usize> {
    let full_graph = FieldGraph::build(schema)?;
    let leaves = full_graph.leaves();
    if leaves.is_empty() {
        return Ok(0);
    }
    let path = chunk_dir.join(full_graph.column_file_name(leaves[0]));
    let mut stream = MmapInputStream::open(&path)?;
    let mut count = 0usize;
    while !stream.eof()? {
        let r_bytes = stream.read(4)?;
        let r = u32::from_le_bytes([r_bytes[0], r_bytes[1], r_bytes[2], r_bytes[3]]);
        stream.read(2)?; // d
        crate::codec::primitive::skip_value(&mut stream)?;
        if r == 0 {
            count += 1;
        }
    }
    Ok(count)
}

/// Read the schema file at `path`, erroring if it is empty or malformed
/// (§6's "schema file" and §7's "schema not an object").
pub fn read_schema_file(path: &str) -> Result<SchemaNode> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| StoreError::io(format!("read schema '{path}'"), e.to_string()))?;
    if text.trim().is_empty() {
        return Err(StoreError::schema("", "schema file is empty"));
    }
    SchemaNode::parse(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;

    #[test]
    fn projection_matching_nothing_still_reports_record_count() {
        let schema = SchemaNode::parse(r#"{"g":[{"v":"int"}]}"#).unwrap();
        let mut doc1 = Document::new();
        doc1.insert(
            "g".to_string(),
            Value::List(vec![Value::Document({
                let mut m = Document::new();
                m.insert("v".to_string(), Value::Int32(1));
                m
            })]),
        );
        let docs = vec![doc1, Document::new()];

        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path(), &schema, &docs).unwrap();

        let projection = ProjectionNode::parse("other").unwrap();
        let out = read_all(dir.path(), &schema, Some(&projection)).unwrap();
        assert_eq!(out, vec![Document::new(), Document::new()]);
    }

    #[test]
    fn read_schema_file_rejects_empty_path_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, "").unwrap();
        let err = read_schema_file(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, StoreError::SchemaError { .. }));
    }
}
