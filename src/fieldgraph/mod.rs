// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The field graph (§3, §4.4).
//!
//! A [`FieldGraph`] is the tree of field descriptors derived from a
//! [`SchemaNode`](crate::schema::SchemaNode), carrying label, type, level,
//! parent and children for every field. Nodes live in a flat arena and
//! refer to each other by [`NodeId`] index rather than by pointer or
//! `Rc`: the parent back-link is a lookup relation, never an ownership
//! claim, and an index into the arena expresses that without unsafe code
//! or reference counting (§9).
//!
//! The shredder ([`crate::codec::columnar::shredder`]) walks this graph
//! top-down while writing; the assembler
//! ([`crate::codec::columnar::assembler`]) walks it bottom-up (via the
//! [`lca`](FieldGraph::lca) cache) while reading.

pub mod lca;

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use crate::core::{Result, StoreError};
use crate::projection::ProjectionNode;
use crate::schema::{PrimitiveTag, SchemaNode};

pub use lca::LcaCache;

/// Index of a node within a [`FieldGraph`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Whether a field occurs once (if present) or zero-or-more times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLabel {
    /// The field may be absent or null, but never repeats.
    Optional,
    /// The field is a list; absent, empty and non-empty are all valid.
    Repeated,
}

/// Whether a field is a leaf (primitive) or an interior node (object).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A leaf field backed by exactly one column stream.
    Primitive(PrimitiveTag),
    /// An interior node with children.
    Object,
}

/// One node of the field graph.
#[derive(Debug, Clone)]
pub struct FieldNode {
    /// The field's own name ("" for the synthetic root).
    pub name: String,
    /// Optional or Repeated.
    pub label: FieldLabel,
    /// Primitive or Object.
    pub kind: FieldKind,
    /// Parent index; `None` only for the root.
    pub parent: Option<NodeId>,
    /// Children in schema (deterministic, name-sorted) order.
    pub children: Vec<NodeId>,
    /// `max_repetition_level(parent) + [label == Repeated]`.
    pub max_rep: u32,
    /// `definition_level(parent) + 1`; 0 for the root.
    pub def_level: u16,
    /// Hash of the root-to-node dotted path; stable identity for LCA caching.
    pub stable_hash: u64,
}

impl FieldNode {
    /// Leaves are exactly the `Primitive` nodes.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, FieldKind::Primitive(_))
    }

    /// The root has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// The tree of field descriptors derived from a schema.
#[derive(Debug, Clone)]
pub struct FieldGraph {
    nodes: Vec<FieldNode>,
    /// Leaves in depth-first, left-to-right (name-sorted) order: `L_0 .. L_{n-1}`.
    leaf_order: Vec<NodeId>,
}

const ROOT: NodeId = NodeId(0);

impl FieldGraph {
    /// Build a field graph from a schema, including every field (no projection).
    pub fn build(schema: &SchemaNode) -> Result<FieldGraph> {
        Self::build_projected(schema, None)
    }

    /// Build a field graph from a schema, pruning fields absent from the
    /// given projection tree (§4.4). Passing `None` keeps every field.
    pub fn build_projected(schema: &SchemaNode, projection: Option<&ProjectionNode>) -> Result<FieldGraph> {
        let root_fields = match schema {
            SchemaNode::Object(children) => children,
            _ => return Err(StoreError::schema("", "schema root must be an object")),
        };

        let mut graph = FieldGraph {
            nodes: vec![FieldNode {
                name: String::new(),
                label: FieldLabel::Optional,
                kind: FieldKind::Object,
                parent: None,
                children: Vec::new(),
                max_rep: 0,
                def_level: 0,
                stable_hash: hash_path(""),
            }],
            leaf_order: Vec::new(),
        };

        graph.add_children(ROOT, root_fields, projection)?;
        graph.leaf_order = graph.collect_leaves(ROOT);
        Ok(graph)
    }

    fn add_children(
        &mut self,
        parent: NodeId,
        fields: &BTreeMap<String, SchemaNode>,
        projection: Option<&ProjectionNode>,
    ) -> Result<()> {
        for (name, subschema) in fields {
            let child_projection = match projection {
                None => None,
                Some(p) if p.is_leaf() => None,
                Some(p) => match p.child(name) {
                    Some(child) => Some(child),
                    None => continue, // pruned: not in projection, and projection is not include-all
                },
            };

            let (label, max_rep_bump, inner) = match subschema {
                SchemaNode::Repeated(inner) => (FieldLabel::Repeated, 1, inner.as_ref()),
                other => (FieldLabel::Optional, 0, other),
            };

            let parent_max_rep = self.nodes[parent.0].max_rep;
            let parent_def = self.nodes[parent.0].def_level;
            let path = self.path_string(parent, name);

            match inner {
                SchemaNode::Object(grandchildren) => {
                    let id = self.push_node(FieldNode {
                        name: name.clone(),
                        label,
                        kind: FieldKind::Object,
                        parent: Some(parent),
                        children: Vec::new(),
                        max_rep: parent_max_rep + max_rep_bump,
                        def_level: parent_def + 1,
                        stable_hash: hash_path(&path),
                    });
                    self.nodes[parent.0].children.push(id);
                    self.add_children(id, grandchildren, child_projection)?;
                }
                SchemaNode::Primitive(tag) => {
                    let id = self.push_node(FieldNode {
                        name: name.clone(),
                        label,
                        kind: FieldKind::Primitive(*tag),
                        parent: Some(parent),
                        children: Vec::new(),
                        max_rep: parent_max_rep + max_rep_bump,
                        def_level: parent_def + 1,
                        stable_hash: hash_path(&path),
                    });
                    self.nodes[parent.0].children.push(id);
                }
                SchemaNode::Repeated(_) => {
                    return Err(StoreError::schema(&path, "nested repeated schema is not supported"));
                }
            }
        }
        Ok(())
    }

    fn push_node(&mut self, node: FieldNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn path_string(&self, parent: NodeId, name: &str) -> String {
        let parent_path = self.path(parent);
        if parent_path.is_empty() {
            name.to_string()
        } else {
            format!("{parent_path}.{name}")
        }
    }

    fn collect_leaves(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_leaves_into(node, &mut out);
        out
    }

    fn collect_leaves_into(&self, node: NodeId, out: &mut Vec<NodeId>) {
        let n = &self.nodes[node.0];
        if n.is_leaf() {
            out.push(node);
            return;
        }
        for &child in &n.children {
            self.collect_leaves_into(child, out);
        }
    }

    /// The synthetic root node id.
    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Borrow a node by id.
    pub fn node(&self, id: NodeId) -> &FieldNode {
        &self.nodes[id.0]
    }

    /// Leaves in depth-first left-to-right order: `L_0, L_1, ..., L_{n-1}`.
    pub fn leaves(&self) -> &[NodeId] {
        &self.leaf_order
    }

    /// Dot-separated root-to-node path (empty string for the root).
    pub fn path(&self, id: NodeId) -> String {
        let node = &self.nodes[id.0];
        match node.parent {
            None => String::new(),
            Some(parent) => self.path_string(parent, &node.name),
        }
    }

    /// Dot-prefixed column-stream file name for a leaf, e.g. `.a.b.c`.
    pub fn column_file_name(&self, id: NodeId) -> String {
        format!(".{}", self.path(id))
    }

    /// Walk from `id` to the root, returning nodes in leaf-to-root order
    /// (inclusive of `id` and the root).
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = Some(id);
        while let Some(n) = cur {
            out.push(n);
            cur = self.nodes[n.0].parent;
        }
        out
    }

    /// Walk from `from` up toward (but not including) `to`, in
    /// child-to-ancestor order. If `to` is `None`, walks to the root
    /// (inclusive).
    pub fn path_between(&self, from: NodeId, to: Option<NodeId>) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = from;
        loop {
            if Some(cur) == to {
                break;
            }
            out.push(cur);
            match self.nodes[cur.0].parent {
                Some(p) => cur = p,
                None => break,
            }
        }
        out
    }

    /// Lowest common ancestor of two nodes, computed by walking both
    /// root paths (uncached; see [`LcaCache`] for the memoized variant
    /// used by the assembler).
    pub fn lca(&self, a: NodeId, b: NodeId) -> NodeId {
        let path_a = self.path_to_root(a);
        let path_b = self.path_to_root(b);
        let set_b: std::collections::HashSet<NodeId> = path_b.iter().copied().collect();
        for node in path_a {
            if set_b.contains(&node) {
                return node;
            }
        }
        ROOT
    }
}

fn hash_path(path: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    path.hash(&mut hasher);
    hasher.finish()
}
