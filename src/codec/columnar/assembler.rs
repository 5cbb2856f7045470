// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The assembler (§4.6): rebuilds records from per-leaf column streams by
//! driving a finite-state machine derived from the field graph, using a
//! lowest-common-ancestor cache to decide how much of the open nesting
//! scope survives between consecutive triples.

use std::path::Path;

use crate::core::{Document, Result, StoreError, Value};
use crate::fieldgraph::{FieldGraph, FieldLabel, LcaCache, NodeId};
use crate::io::mmap::MmapInputStream;
use crate::io::InputStream;

use super::super::primitive::decode_value;

/// One leaf's column stream, read triple by triple.
struct ColumnReader {
    stream: Box<dyn InputStream>,
}

impl ColumnReader {
    fn open(path: &Path) -> Result<Self> {
        Ok(ColumnReader {
            stream: Box::new(MmapInputStream::open(path)?),
        })
    }

    fn is_eof(&mut self) -> Result<bool> {
        self.stream.eof()
    }

    /// Read one full `(r, d, value)` triple, consuming it.
    fn read_triple(&mut self) -> Result<(u32, u16, Value)> {
        let r_bytes = self.stream.read(4)?;
        let r = u32::from_le_bytes([r_bytes[0], r_bytes[1], r_bytes[2], r_bytes[3]]);
        let d_bytes = self.stream.read(2)?;
        let d = u16::from_le_bytes([d_bytes[0], d_bytes[1]]);
        let value = decode_value(self.stream.as_mut())?;
        Ok((r, d, value))
    }

    /// Peek the repetition level of the next unread triple without
    /// consuming it (mirrors the original's "read header, then rewind"
    /// rollback trick).
    fn peek_repetition(&mut self) -> Result<Option<u32>> {
        if self.stream.eof()? {
            return Ok(None);
        }
        let r_bytes = self.stream.read(4)?;
        self.stream.seek(-4)?;
        Ok(Some(u32::from_le_bytes([r_bytes[0], r_bytes[1], r_bytes[2], r_bytes[3]])))
    }
}

/// Finite-state machine over a field graph's leaves: `fsm[i][r]` is the
/// index of the leaf that owns the next triple after absorbing one at
/// leaf `i` whose successor has repetition level `r`.
type Fsm = Vec<Vec<Option<usize>>>;

fn build_fsm(graph: &FieldGraph, lca: &LcaCache) -> Fsm {
    let leaves = graph.leaves();
    let n = leaves.len();
    let mut fsm = Vec::with_capacity(n);

    for i in 0..n {
        let li = leaves[i];
        let max_level = graph.node(li).max_rep;
        let barrier = if i + 1 < n { Some(i + 1) } else { None };
        let barrier_level = match barrier {
            Some(j) => lca.lca_max_rep(li, leaves[j]),
            None => 0,
        };

        let mut to_fields: Vec<Option<usize>> = vec![None; (max_level + 1) as usize];

        for (j, &lj) in leaves.iter().enumerate().take(i + 1) {
            if graph.node(lj).max_rep > barrier_level {
                let back_level = lca.lca_max_rep(li, lj) as usize;
                if to_fields[back_level].is_none() {
                    to_fields[back_level] = Some(j);
                }
            }
        }

        for level in (barrier_level + 1..=max_level).rev() {
            if level < max_level && to_fields[level as usize].is_none() {
                to_fields[level as usize] = to_fields[(level + 1) as usize];
            }
        }

        for level in 0..=barrier_level {
            to_fields[level as usize] = barrier;
        }

        fsm.push(to_fields);
    }

    fsm
}

/// Reassembles records from the column streams of a (possibly projected)
/// field graph.
pub struct Assembler<'g> {
    graph: &'g FieldGraph,
    lca: LcaCache<'g>,
    fsm: Fsm,
    readers: Vec<ColumnReader>,
    last_leaf_index: Option<usize>,
}

impl<'g> Assembler<'g> {
    /// Open one reader per surviving leaf under `chunk_dir`.
    pub fn open(graph: &'g FieldGraph, chunk_dir: impl AsRef<Path>) -> Result<Self> {
        let chunk_dir = chunk_dir.as_ref();
        let lca = LcaCache::new(graph);
        let fsm = build_fsm(graph, &lca);
        let mut readers = Vec::with_capacity(graph.leaves().len());
        for &leaf in graph.leaves() {
            let path = chunk_dir.join(graph.column_file_name(leaf));
            readers.push(ColumnReader::open(&path)?);
        }
        Ok(Assembler {
            graph,
            lca,
            fsm,
            readers,
            last_leaf_index: None,
        })
    }

    /// Reassemble every remaining record.
    pub fn read_all(&mut self) -> Result<Vec<Document>> {
        let mut docs = Vec::new();
        while let Some(doc) = self.next_record()? {
            docs.push(doc);
        }
        Ok(docs)
    }

    /// Reassemble the next record, or `None` at end of stream (§4.6).
    pub fn next_record(&mut self) -> Result<Option<Document>> {
        if self.readers.is_empty() {
            return Ok(None);
        }

        let mut current = 0usize;
        let mut stack: Vec<(NodeId, Document)> = vec![(self.graph.root(), Document::new())];

        loop {
            if self.readers[current].is_eof()? {
                if current == 0 {
                    return Ok(None);
                }
                return Err(StoreError::corrupt(
                    "columnar assembly",
                    format!("leaf {current} ran out of triples before leaf 0; column streams are out of sync"),
                ));
            }

            let (r, d, value) = self.readers[current].read_triple()?;
            self.absorb(current, r, d, value, &mut stack);

            let next_r = self.readers[current].peek_repetition()?.unwrap_or(0) as usize;
            self.last_leaf_index = Some(current);

            match self.fsm[current].get(next_r).copied().flatten() {
                Some(next) => current = next,
                None => break,
            }
        }

        while stack.len() > 1 {
            pop_scope(self.graph, &mut stack);
        }
        let (_, root_doc) = stack.pop().expect("root scope always present");
        Ok(Some(root_doc))
    }

    /// Absorb one triple into the open nesting scope stack (§4.6 "Absorb
    /// semantics").
    fn absorb(&self, leaf_idx: usize, r: u32, d: u16, value: Value, stack: &mut Vec<(NodeId, Document)>) {
        let leaf_node = self.graph.leaves()[leaf_idx];
        let top_node = stack.last().expect("root scope always present").0;

        let mut lca_node = self.lca.lca(leaf_node, top_node);
        if let Some(prev_idx) = self.last_leaf_index {
            if prev_idx >= leaf_idx {
                while !self.graph.node(lca_node).is_root() && self.graph.node(lca_node).max_rep >= r {
                    lca_node = self.graph.node(lca_node).parent.expect("checked not root");
                }
            }
        }

        while stack.len() > 1 && stack.last().unwrap().0 != lca_node {
            pop_scope(self.graph, stack);
        }

        let mut descend_path = self.graph.path_between(leaf_node, Some(lca_node));
        descend_path.reverse();

        for node_id in descend_path {
            let def_level = self.graph.node(node_id).def_level;
            if def_level > d {
                continue;
            }

            if node_id == leaf_node {
                let field = self.graph.node(leaf_node);
                let (_, parent_doc) = stack.last_mut().expect("root scope always present");
                assign_field(parent_doc, field.name.clone(), field.label, value);
                break;
            }

            if matches!(value, Value::Null) {
                continue;
            }

            stack.push((node_id, Document::new()));
        }
    }
}

fn assign_field(parent: &mut Document, name: String, label: FieldLabel, value: Value) {
    match label {
        FieldLabel::Repeated => match parent.entry(name).or_insert_with(|| Value::List(Vec::new())) {
            Value::List(list) => list.push(value),
            _ => unreachable!("repeated field slot is always a List"),
        },
        FieldLabel::Optional => {
            parent.insert(name, value);
        }
    }
}

/// Pop the deepest open scope and fold its built document into its new
/// parent's scope, under its own field name.
fn pop_scope(graph: &FieldGraph, stack: &mut Vec<(NodeId, Document)>) {
    let (node_id, doc) = stack.pop().expect("pop_scope requires a non-root top frame");
    let node = graph.node(node_id);
    let (_, parent_doc) = stack.last_mut().expect("root scope is never popped");
    assign_field(parent_doc, node.name.clone(), node.label, Value::Document(doc));
}
