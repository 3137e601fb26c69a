//! Read-only inspection and bulk maintenance.
//!
//! Nothing here touches the statistics ledger. These back dashboard views
//! that need to look at routing nodes or whole subtrees without skewing the
//! hit/miss counters.

use tracing::{debug, info, instrument};

use super::{DataCache, EntryInfo, NodeInfo};
use crate::error::Result;
use crate::path::{CachePath, ToCachePath};
use crate::time_operation;

impl DataCache {
    /// Node metadata at `path`, without counting a `get`.
    ///
    /// Unlike [`get`](Self::get), a routing node reports `exists: true`.
    /// Subtrees holding no data report `exists: false`.
    #[instrument(skip_all)]
    pub fn peek(&self, path: impl ToCachePath) -> Result<NodeInfo> {
        let _timer = time_operation!("peek");
        let path = self.resolve("peek", &path)?;
        debug!(path = %path, "Cache peek");

        let tree = self.tree.read();
        let info = match tree.find(&path) {
            // Subtrees left without data by lazy pruning read as absent
            Some(node) if node.populated_count() > 0 => {
                let data = node.data();
                NodeInfo {
                    path: path.into_owned(),
                    exists: true,
                    has_data: data.is_some(),
                    data: data.map(|d| d.value.clone()),
                    data_hash: data.map(|d| d.data_hash.clone()),
                    timestamp: data.map(|d| d.timestamp),
                    children: node
                        .children()
                        .iter()
                        .filter(|(_, child)| child.populated_count() > 0)
                        .map(|(id, _)| id.clone())
                        .collect(),
                }
            }
            _ => NodeInfo {
                path: path.into_owned(),
                exists: false,
                has_data: false,
                data: None,
                data_hash: None,
                timestamp: None,
                children: Vec::new(),
            },
        };
        drop(tree);

        crate::metrics::record_operation("peek", "ok");
        Ok(info)
    }

    /// Every populated node under `start` (inclusive), breadth first.
    ///
    /// `None` lists the whole tree. A missing `start` yields an empty list.
    pub fn entries_under(&self, start: Option<&CachePath>) -> Vec<EntryInfo> {
        let tree = self.tree.read();
        tree.entries_under(start)
            .into_iter()
            .map(|(path, stored)| EntryInfo {
                path,
                data_hash: stored.data_hash.clone(),
                timestamp: stored.timestamp,
            })
            .collect()
    }

    /// Number of nodes currently holding data.
    pub fn len(&self) -> usize {
        self.tree.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.read().is_empty()
    }

    /// Drop every node below the root.
    ///
    /// Statistics are untouched; this is not counted as an invalidation.
    /// Returns the number of populated nodes removed.
    pub fn clear(&self) -> usize {
        let _timer = time_operation!("clear");
        let removed = self.tree.write().clear();
        info!(removed, "Cache cleared");
        crate::metrics::record_operation("clear", "ok");
        crate::metrics::record_invalidated_entries(removed);
        crate::metrics::set_entries(0);
        removed
    }
}
