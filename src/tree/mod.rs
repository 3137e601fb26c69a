// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Path-addressed dependency tree.
//!
//! # Design
//!
//! Each node owns its children in an ordered map keyed by identifier:
//!
//! ```text
//! users/1       -> {"name": "Al"}
//! users/2/posts -> [...]
//!
//! Becomes:
//!
//! root
//! └── users            (routing)
//!     ├── 1            (data)
//!     └── 2            (routing)
//!         └── posts    (data)
//! ```
//!
//! Invalidation detaches a subtree from its parent map in one step; the
//! detached nodes are dropped with the map entry. Routing nodes exist only to
//! reach populated descendants. With pruning enabled, ancestors left without
//! data or children after a detach are removed in the same step.
//!
//! The tree has no locking of its own; [`DataCache`](crate::DataCache)
//! serialises access to it.

mod node;
mod snapshot;

pub use node::{DependencyNode, StoredValue};
pub use snapshot::TreeSnapshot;

use std::collections::VecDeque;
use tracing::{debug, instrument};

use crate::path::CachePath;

/// The node hierarchy rooted at a distinguished, data-less root.
#[derive(Debug, Clone)]
pub struct DependencyTree {
    root: DependencyNode,
    prune_empty_ancestors: bool,
    /// Number of populated nodes
    entries: usize,
}

impl DependencyTree {
    /// Create an empty tree with the given root identifier and eager pruning.
    pub fn new(root_identifier: impl Into<String>) -> Self {
        Self::with_pruning(root_identifier, true)
    }

    pub fn with_pruning(root_identifier: impl Into<String>, prune_empty_ancestors: bool) -> Self {
        Self {
            root: DependencyNode::new(root_identifier),
            prune_empty_ancestors,
            entries: 0,
        }
    }

    #[inline]
    pub fn root(&self) -> &DependencyNode {
        &self.root
    }

    /// Number of populated nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Walk from the root, creating missing routing nodes, and return the
    /// terminal node.
    #[instrument(skip_all, fields(path = %path))]
    pub fn ensure_path(&mut self, path: &CachePath) -> &mut DependencyNode {
        path.segments()
            .iter()
            .fold(&mut self.root, |node, segment| node.child_or_insert(segment))
    }

    /// Walk from the root along existing children only.
    pub fn find(&self, path: &CachePath) -> Option<&DependencyNode> {
        path.segments()
            .iter()
            .try_fold(&self.root, |node, segment| node.child(segment))
    }

    /// Store a value at `path`, creating routing nodes as needed.
    ///
    /// Returns the value previously stored at that exact node. Descendants
    /// and ancestors are untouched.
    pub fn insert(&mut self, path: &CachePath, value: StoredValue) -> Option<StoredValue> {
        let previous = self.ensure_path(path).set_data(value);
        if previous.is_none() {
            self.entries += 1;
        }
        previous
    }

    /// Remove the node at `path` and its whole subtree.
    ///
    /// Returns `false` if no node exists at `path`, or if the subtree there
    /// holds no data (a leftover of lazy pruning, discarded silently).
    pub fn collapse(&mut self, path: &CachePath) -> bool {
        self.detach(path).is_some()
    }

    /// Like [`collapse`](Self::collapse), but hands back the detached subtree.
    #[instrument(skip_all, fields(path = %path))]
    pub fn detach(&mut self, path: &CachePath) -> Option<DependencyNode> {
        let removed = detach_in(&mut self.root, path.segments(), self.prune_empty_ancestors)?;
        let populated = removed.populated_count();
        self.entries -= populated;
        debug!(populated, "Detached subtree");
        Some(removed)
    }

    /// Remove every node below the root.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries;
        self.root = DependencyNode::new(self.root.identifier().to_string());
        self.entries = 0;
        removed
    }

    /// Deep copy of the whole tree.
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot::capture(&self.root)
    }

    /// Breadth-first list of populated nodes under `start` (inclusive), or
    /// under the root when `start` is `None`.
    pub fn entries_under(&self, start: Option<&CachePath>) -> Vec<(CachePath, &StoredValue)> {
        let mut out = Vec::new();
        let start_node = match start {
            Some(path) => match self.find(path) {
                Some(node) => node,
                None => return out,
            },
            None => &self.root,
        };

        let mut queue: VecDeque<(Vec<String>, &DependencyNode)> = VecDeque::new();
        queue.push_back((
            start.map(|p| p.segments().to_vec()).unwrap_or_default(),
            start_node,
        ));

        while let Some((segments, node)) = queue.pop_front() {
            if let Some(data) = node.data() {
                // Only the root has no segments and it never holds data.
                if let Ok(path) = CachePath::new(segments.iter().cloned()) {
                    out.push((path, data));
                }
            }
            for (id, child) in node.children() {
                let mut child_segments = segments.clone();
                child_segments.push(id.clone());
                queue.push_back((child_segments, child));
            }
        }
        out
    }
}

impl Default for DependencyTree {
    fn default() -> Self {
        Self::new("root")
    }
}

fn detach_in(node: &mut DependencyNode, segments: &[String], prune: bool) -> Option<DependencyNode> {
    let (head, rest) = segments.split_first()?;
    if rest.is_empty() {
        // A subtree holding no data is logically absent: drop it, report nothing.
        let removed = node.remove_child(head)?;
        return (removed.populated_count() > 0).then_some(removed);
    }

    let child = node.child_mut(head)?;
    let removed = detach_in(child, rest, prune)?;
    let vacant = child.is_vacant();
    if prune && vacant {
        node.remove_child(head);
    }
    Some(removed)
}
