//! Immutable, point-in-time views of the tree for external enumeration.
//!
//! Serialized shape (consumed by the dashboard):
//!
//! ```text
//! {
//!   "identifier": "root",
//!   "has_data": false,
//!   "data_hash": null,
//!   "timestamp": null,
//!   "children": {
//!     "users": { "identifier": "users", "has_data": false, ..., "children": { ... } }
//!   }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::node::DependencyNode;
use crate::path::CachePath;

/// Deep copy of one node and its subtree.
///
/// Descendant subtrees holding no data are left out; they are logically
/// absent and only linger in the live tree when pruning is lazy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub identifier: String,
    pub has_data: bool,
    pub data_hash: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub children: BTreeMap<String, TreeSnapshot>,
}

impl TreeSnapshot {
    pub(crate) fn capture(node: &DependencyNode) -> Self {
        let data = node.data();
        Self {
            identifier: node.identifier().to_string(),
            has_data: data.is_some(),
            data_hash: data.map(|d| d.data_hash.clone()),
            timestamp: data.map(|d| d.timestamp),
            children: node
                .children()
                .iter()
                .map(|(id, child)| (id.clone(), Self::capture(child)))
                .filter(|(_, child)| child.has_data || !child.children.is_empty())
                .collect(),
        }
    }

    /// Look up a descendant of this snapshot.
    pub fn find(&self, path: &CachePath) -> Option<&TreeSnapshot> {
        path.segments()
            .iter()
            .try_fold(self, |node, segment| node.children.get(segment))
    }

    /// Number of nodes in this snapshot, self included.
    pub fn node_count(&self) -> usize {
        1 + self.children.values().map(Self::node_count).sum::<usize>()
    }

    /// Number of populated nodes in this snapshot, self included.
    pub fn populated_count(&self) -> usize {
        usize::from(self.has_data)
            + self.children.values().map(Self::populated_count).sum::<usize>()
    }
}
