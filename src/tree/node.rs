// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::hashing::fingerprint;

/// A value stored at a node, together with its fingerprint and write time.
///
/// The three fields are only ever replaced together, so a reader holding a
/// node can never see a hash without its value or a value without its
/// timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredValue {
    /// The opaque payload
    pub value: Value,
    /// Hex SHA-256 of the canonical JSON encoding of `value`
    pub data_hash: String,
    /// Time of the write that produced this value
    pub timestamp: DateTime<Utc>,
}

impl StoredValue {
    /// Wrap a value, computing its fingerprint and stamping the current time.
    pub fn new(value: Value) -> Self {
        let data_hash = fingerprint(&value);
        Self {
            value,
            data_hash,
            timestamp: Utc::now(),
        }
    }
}

/// A node in the dependency tree.
///
/// Children are owned by their parent and keyed by identifier, so removing a
/// child from the map drops its whole subtree.
#[derive(Debug, Clone)]
pub struct DependencyNode {
    identifier: String,
    children: BTreeMap<String, DependencyNode>,
    data: Option<StoredValue>,
}

impl DependencyNode {
    /// Create a routing node with no data and no children.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            children: BTreeMap::new(),
            data: None,
        }
    }

    #[inline]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[inline]
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    #[inline]
    pub fn data(&self) -> Option<&StoredValue> {
        self.data.as_ref()
    }

    /// Children ordered by identifier.
    #[inline]
    pub fn children(&self) -> &BTreeMap<String, DependencyNode> {
        &self.children
    }

    #[inline]
    pub fn child(&self, identifier: &str) -> Option<&DependencyNode> {
        self.children.get(identifier)
    }

    /// A node with neither data nor children is logically absent.
    #[inline]
    pub fn is_vacant(&self) -> bool {
        self.data.is_none() && self.children.is_empty()
    }

    /// Number of populated nodes in this subtree, self included.
    pub fn populated_count(&self) -> usize {
        usize::from(self.has_data())
            + self.children.values().map(Self::populated_count).sum::<usize>()
    }

    pub(crate) fn child_mut(&mut self, identifier: &str) -> Option<&mut DependencyNode> {
        self.children.get_mut(identifier)
    }

    /// Get a child, creating a routing node if it does not exist.
    pub(crate) fn child_or_insert(&mut self, identifier: &str) -> &mut DependencyNode {
        self.children
            .entry(identifier.to_string())
            .or_insert_with(|| DependencyNode::new(identifier))
    }

    /// Detach a child and its subtree.
    pub(crate) fn remove_child(&mut self, identifier: &str) -> Option<DependencyNode> {
        self.children.remove(identifier)
    }

    /// Replace this node's data, returning the previous value.
    pub(crate) fn set_data(&mut self, data: StoredValue) -> Option<StoredValue> {
        self.data.replace(data)
    }
}
