// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The external `Chunk` handle (§6): the one entry point that unifies
//! the textual, packed and columnar formats behind a single
//! `read`/`write` surface.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::codec::{columnar, packed, textual};
use crate::core::{ChunkFormat, Document, Result, StoreError};
use crate::io::{open_input, open_output};
use crate::projection::ProjectionNode;
use crate::schema::SchemaNode;

/// A chunk on disk, addressed by path and format, with an optional
/// schema (required for [`ChunkFormat::Columnar`]).
pub struct Chunk {
    path: PathBuf,
    format: ChunkFormat,
    schema: Option<SchemaNode>,
}

impl Chunk {
    /// Open a chunk handle. `schema_path` is required when `format` is
    /// [`ChunkFormat::Columnar`] and ignored otherwise.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), format = %format))]
    pub fn open(path: impl AsRef<Path>, format: ChunkFormat, schema_path: Option<&str>) -> Result<Chunk> {
        let schema = match (format.requires_schema(), schema_path) {
            (true, Some(schema_path)) => Some(columnar::read_schema_file(schema_path)?),
            (true, None) => {
                return Err(StoreError::schema("", "columnar format requires a schema path"))
            }
            (false, _) => None,
        };
        Ok(Chunk {
            path: path.as_ref().to_path_buf(),
            format,
            schema,
        })
    }

    /// Read every document in the chunk, applying `projection` (`None`
    /// selects every field).
    #[instrument(skip_all, fields(path = %self.path.display(), format = %self.format))]
    pub fn read(&self, projection: Option<&ProjectionNode>) -> Result<Vec<Document>> {
        let docs = match self.format {
            ChunkFormat::Textual => {
                let mut input = open_input(self.path_str())?;
                textual::read_all(input.as_mut(), projection)?
            }
            ChunkFormat::Packed => {
                let mut input = open_input(self.path_str())?;
                packed::read_all(input.as_mut(), projection)?
            }
            ChunkFormat::Columnar => {
                let schema = self.schema_or_bug()?;
                columnar::read_all(&self.path, schema, projection)?
            }
        };
        info!(records = docs.len(), "read chunk");
        Ok(docs)
    }

    /// Write `documents` to the chunk, replacing any existing contents.
    #[instrument(skip_all, fields(path = %self.path.display(), format = %self.format, records = documents.len()))]
    pub fn write(&self, documents: &[Document]) -> Result<()> {
        match self.format {
            ChunkFormat::Textual => {
                let mut output = open_output(self.path_str())?;
                textual::write_all(output.as_mut(), documents)?;
            }
            ChunkFormat::Packed => {
                let mut output = open_output(self.path_str())?;
                packed::write_all(output.as_mut(), documents)?;
            }
            ChunkFormat::Columnar => {
                let schema = self.schema_or_bug()?;
                columnar::write_all(&self.path, schema, documents)?;
            }
        }
        info!("wrote chunk");
        Ok(())
    }

    fn schema_or_bug(&self) -> Result<&SchemaNode> {
        self.schema
            .as_ref()
            .ok_or_else(|| StoreError::schema("", "columnar chunk opened without a schema"))
    }

    fn path_str(&self) -> &str {
        self.path.to_str().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;

    fn doc_of(pairs: &[(&str, Value)]) -> Document {
        pairs.iter().cloned().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn textual_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunk.jsonl");
        let chunk = Chunk::open(&path, ChunkFormat::Textual, None).unwrap();
        let docs = vec![doc_of(&[("a", Value::Int64(1))])];
        chunk.write(&docs).unwrap();
        assert_eq!(chunk.read(None).unwrap(), docs);
    }

    #[test]
    fn packed_round_trip_with_projection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunk.bin");
        let chunk = Chunk::open(&path, ChunkFormat::Packed, None).unwrap();
        let docs = vec![doc_of(&[("keep", Value::Int32(1)), ("drop", Value::Int32(2))])];
        chunk.write(&docs).unwrap();

        let projection = ProjectionNode::parse("keep").unwrap();
        let out = chunk.read(Some(&projection)).unwrap();
        assert_eq!(out[0].get("keep"), Some(&Value::Int32(1)));
        assert!(!out[0].contains_key("drop"));
    }

    #[test]
    fn columnar_requires_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunk_dir");
        let err = Chunk::open(&path, ChunkFormat::Columnar, None).unwrap_err();
        assert!(matches!(err, StoreError::SchemaError { .. }));
    }

    #[test]
    fn columnar_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let schema_path = dir.path().join("schema.json");
        std::fs::write(&schema_path, r#"{"a":"int","g":[{"v":"int"}]}"#).unwrap();

        let chunk_path = dir.path().join("chunk_dir");
        let chunk = Chunk::open(&chunk_path, ChunkFormat::Columnar, Some(schema_path.to_str().unwrap())).unwrap();

        let docs = vec![
            doc_of(&[
                ("a", Value::Int32(1)),
                ("g", Value::List(vec![Value::Document(doc_of(&[("v", Value::Int32(9))]))])),
            ]),
            Document::new(),
        ];
        chunk.write(&docs).unwrap();
        assert_eq!(chunk.read(None).unwrap(), docs);
    }
}
