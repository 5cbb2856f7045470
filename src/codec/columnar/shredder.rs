// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The shredder (§4.5): descends the field graph with each record,
//! tracking `(r, d)`, and emits one `(r, d, value)` triple per leaf per
//! record to that leaf's column stream.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::{Document, Result, StoreError, Value};
use crate::fieldgraph::{FieldGraph, FieldKind, FieldLabel, NodeId};
use crate::io::file::FileOutputStream;
use crate::io::OutputStream;

use super::super::primitive::encode_value;

/// Shreds documents into per-leaf column streams under `chunk_dir`.
pub struct Shredder<'g> {
    graph: &'g FieldGraph,
    chunk_dir: PathBuf,
    streams: HashMap<NodeId, Box<dyn OutputStream>>,
}

impl<'g> Shredder<'g> {
    /// Create the chunk directory (if absent) and prepare to shred into it.
    pub fn create(graph: &'g FieldGraph, chunk_dir: impl AsRef<Path>) -> Result<Self> {
        let chunk_dir = chunk_dir.as_ref();
        std::fs::create_dir_all(chunk_dir)
            .map_err(|e| StoreError::io(format!("create chunk dir '{}'", chunk_dir.display()), e.to_string()))?;
        Ok(Shredder {
            graph,
            chunk_dir: chunk_dir.to_path_buf(),
            streams: HashMap::new(),
        })
    }

    /// Shred every document, then flush every column stream.
    pub fn write_all(&mut self, documents: &[Document]) -> Result<()> {
        for doc in documents {
            self.write_document(doc)?;
        }
        self.flush_all()
    }

    /// Shred one record (§4.5, step 1): `write(r=0, d=0, value=record)`
    /// for each child of the synthetic root.
    pub fn write_document(&mut self, doc: &Document) -> Result<()> {
        let root = self.graph.root();
        let children = self.graph.node(root).children.clone();
        self.write_children(&children, 0, 0, Some(doc))
    }

    /// Flush every column stream opened so far.
    pub fn flush_all(&mut self) -> Result<()> {
        for stream in self.streams.values_mut() {
            stream.flush()?;
        }
        Ok(())
    }

    fn write_children(&mut self, children: &[NodeId], r: u32, d: u16, fragment: Option<&Document>) -> Result<()> {
        for &child in children {
            let name = self.graph.node(child).name.clone();
            let value = fragment.and_then(|doc| doc.get(&name));
            self.write_node(child, r, d, value)?;
        }
        Ok(())
    }

    fn write_node(&mut self, node_id: NodeId, r: u32, d: u16, value: Option<&Value>) -> Result<()> {
        let is_absent_or_null = value.map_or(true, Value::is_null);
        let (label, kind, max_rep, children) = {
            let node = self.graph.node(node_id);
            (node.label, node.kind, node.max_rep, node.children.clone())
        };

        match label {
            FieldLabel::Optional => {
                if is_absent_or_null {
                    self.write_null_subtree(node_id, r, d)
                } else {
                    let value = value.expect("checked non-absent above");
                    match kind {
                        FieldKind::Primitive(_) => self.emit(node_id, r, d + 1, value),
                        FieldKind::Object => {
                            let fragment = value.as_document();
                            self.write_children(&children, r, d + 1, fragment)
                        }
                    }
                }
            }
            FieldLabel::Repeated => {
                let list = value.and_then(Value::as_list);
                let is_empty = is_absent_or_null || list.map_or(false, |l| l.is_empty());
                if is_empty {
                    return self.write_null_subtree(node_id, r, d);
                }
                let list = list.ok_or_else(|| {
                    StoreError::schema(self.graph.path(node_id), "repeated field value is not a list")
                })?;
                for (i, element) in list.iter().enumerate() {
                    let r_i = if i == 0 { r } else { max_rep };
                    match kind {
                        FieldKind::Primitive(_) => self.emit(node_id, r_i, d + 1, element)?,
                        FieldKind::Object => {
                            let fragment = element.as_document();
                            self.write_children(&children, r_i, d + 1, fragment)?;
                        }
                    }
                }
                Ok(())
            }
        }
    }

    /// §4.5 step 6: fan out to every child on an Object node; emit a
    /// single `(r, d, Null)` on a Primitive leaf.
    fn write_null_subtree(&mut self, node_id: NodeId, r: u32, d: u16) -> Result<()> {
        let (kind, children) = {
            let node = self.graph.node(node_id);
            (node.kind, node.children.clone())
        };
        match kind {
            FieldKind::Primitive(_) => self.emit(node_id, r, d, &Value::Null),
            FieldKind::Object => {
                for child in children {
                    self.write_null_subtree(child, r, d)?;
                }
                Ok(())
            }
        }
    }

    fn emit(&mut self, leaf: NodeId, r: u32, d: u16, value: &Value) -> Result<()> {
        let mut buf = Vec::with_capacity(16);
        buf.extend_from_slice(&r.to_le_bytes());
        buf.extend_from_slice(&d.to_le_bytes());
        encode_value(value, &mut buf);
        self.stream_for(leaf)?.write(&buf)
    }

    fn stream_for(&mut self, leaf: NodeId) -> Result<&mut Box<dyn OutputStream>> {
        if !self.streams.contains_key(&leaf) {
            let path = self.chunk_dir.join(self.graph.column_file_name(leaf));
            let stream: Box<dyn OutputStream> = Box::new(FileOutputStream::create(&path)?);
            self.streams.insert(leaf, stream);
        }
        Ok(self.streams.get_mut(&leaf).expect("just inserted"))
    }
}
