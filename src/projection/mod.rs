// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The projection tree and its DSL (§3, §6).
//!
//! A [`ProjectionNode`] is a prefix tree over dotted field paths. A node
//! whose child map is empty is a leaf and means "include everything below
//! this path"; an empty tree (the root is a leaf) selects every field.
//! The DSL is a comma-separated list of dotted paths, where `\.` escapes
//! a literal dot inside a segment and `\\` escapes a backslash.

use std::collections::BTreeMap;

use crate::core::{Result, StoreError};

/// One node of a projection prefix tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionNode {
    children: BTreeMap<String, ProjectionNode>,
}

impl ProjectionNode {
    /// The tree that selects every field (an empty, leaf root).
    pub fn all() -> ProjectionNode {
        ProjectionNode::default()
    }

    /// Parse the projection DSL: comma-separated dotted paths with
    /// `\.`/`\\` escaping. An empty or whitespace-only string means "all".
    pub fn parse(dsl: &str) -> Result<ProjectionNode> {
        if dsl.trim().is_empty() {
            return Ok(ProjectionNode::all());
        }

        let mut root = ProjectionNode::default();
        for raw_path in split_unescaped_commas(dsl) {
            let segments = unescape_path(&raw_path)?;
            if segments.iter().any(|s| s.is_empty()) {
                return Err(StoreError::bad_projection(dsl, format!("empty path segment in '{raw_path}'")));
            }
            root.insert_path(&segments);
        }
        Ok(root)
    }

    fn insert_path(&mut self, segments: &[String]) {
        if segments.is_empty() {
            return;
        }
        let child = self
            .children
            .entry(segments[0].clone())
            .or_insert_with(ProjectionNode::default);
        child.insert_path(&segments[1..]);
    }

    /// True if this node's child map is empty ("include everything below").
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Look up a named child; `None` means the field is pruned.
    pub fn child(&self, name: &str) -> Option<&ProjectionNode> {
        self.children.get(name)
    }
}

fn split_unescaped_commas(dsl: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = dsl.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ',' => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts.into_iter().map(|p| p.trim().to_string()).filter(|p| !p.is_empty()).collect()
}

fn unescape_path(raw: &str) -> Result<Vec<String>> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('.') => current.push('.'),
                Some('\\') => current.push('\\'),
                Some(other) => {
                    return Err(StoreError::bad_projection(
                        raw,
                        format!("invalid escape '\\{other}'"),
                    ))
                }
                None => return Err(StoreError::bad_projection(raw, "trailing backslash")),
            },
            '.' => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_selects_all() {
        let p = ProjectionNode::parse("").unwrap();
        assert!(p.is_leaf());
    }

    #[test]
    fn single_path_builds_chain() {
        let p = ProjectionNode::parse("g.v").unwrap();
        let g = p.child("g").unwrap();
        assert!(!g.is_leaf());
        let v = g.child("v").unwrap();
        assert!(v.is_leaf());
    }

    #[test]
    fn comma_separated_paths_share_prefix() {
        let p = ProjectionNode::parse("g.v,g.w").unwrap();
        let g = p.child("g").unwrap();
        assert!(g.child("v").unwrap().is_leaf());
        assert!(g.child("w").unwrap().is_leaf());
    }

    #[test]
    fn escaped_dot_in_segment() {
        let p = ProjectionNode::parse(r"a\.b.c").unwrap();
        let seg = p.child("a.b").unwrap();
        assert!(seg.child("c").unwrap().is_leaf());
    }

    #[test]
    fn escaped_backslash_in_segment() {
        let p = ProjectionNode::parse(r"a\\b").unwrap();
        assert!(p.child(r"a\b").unwrap().is_leaf());
    }

    #[test]
    fn missing_child_means_pruned() {
        let p = ProjectionNode::parse("g.v").unwrap();
        assert!(p.child("other").is_none());
    }

    #[test]
    fn rejects_trailing_backslash() {
        assert!(ProjectionNode::parse("a\\").is_err());
    }

    #[test]
    fn rejects_empty_segment() {
        assert!(ProjectionNode::parse("a..b").is_err());
    }
}
