// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Memoized lowest-common-ancestor lookups over a [`FieldGraph`].
//!
//! Keyed by the pair of stable per-node hashes (§9): a plain hash map is
//! sufficient given the small number of leaves typical in real schemas.
//! Lookups are symmetric — `lca(a, b)` and `lca(b, a)` share a cache entry.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{FieldGraph, NodeId};

/// A memoized, symmetric LCA cache over one [`FieldGraph`].
pub struct LcaCache<'g> {
    graph: &'g FieldGraph,
    cache: RefCell<HashMap<(u64, u64), NodeId>>,
}

impl<'g> LcaCache<'g> {
    /// Build an (initially empty) cache over `graph`.
    pub fn new(graph: &'g FieldGraph) -> Self {
        LcaCache {
            graph,
            cache: RefCell::new(HashMap::new()),
        }
    }

    fn key(&self, a: NodeId, b: NodeId) -> (u64, u64) {
        let ha = self.graph.node(a).stable_hash;
        let hb = self.graph.node(b).stable_hash;
        if ha <= hb {
            (ha, hb)
        } else {
            (hb, ha)
        }
    }

    /// Lowest common ancestor of `a` and `b`, memoized.
    pub fn lca(&self, a: NodeId, b: NodeId) -> NodeId {
        let key = self.key(a, b);
        if let Some(found) = self.cache.borrow().get(&key) {
            return *found;
        }
        let result = self.graph.lca(a, b);
        self.cache.borrow_mut().insert(key, result);
        result
    }

    /// `max_rep` of `lca(a, b)`.
    pub fn lca_max_rep(&self, a: NodeId, b: NodeId) -> u32 {
        self.graph.node(self.lca(a, b)).max_rep
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fieldgraph::FieldGraph;
    use crate::schema::SchemaNode;

    #[test]
    fn memoizes_and_stays_symmetric() {
        let schema = SchemaNode::parse(r#"{"g":[{"v":"int","w":"int"}]}"#).unwrap();
        let graph = FieldGraph::build(&schema).unwrap();
        let cache = LcaCache::new(&graph);
        let leaves = graph.leaves();
        let (v, w) = (leaves[0], leaves[1]);

        let first = cache.lca(v, w);
        let second = cache.lca(w, v);
        assert_eq!(first, second);
        assert_eq!(cache.cache.borrow().len(), 1);
    }

    #[test]
    fn max_rep_bounded_by_operands() {
        let schema = SchemaNode::parse(r#"{"xs":["int"],"a":"int"}"#).unwrap();
        let graph = FieldGraph::build(&schema).unwrap();
        let cache = LcaCache::new(&graph);
        let leaves = graph.leaves();
        let (xs, a) = (leaves[0], leaves[1]);
        let lca_rep = cache.lca_max_rep(xs, a);
        assert!(lca_rep <= graph.node(xs).max_rep.min(graph.node(a).max_rep));
    }
}
