// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Thread-safe cache facade.
//!
//! [`DataCache`] owns a [`DependencyTree`] and a [`StatsLedger`] and exposes
//! the cache operations on top of them:
//!
//! ```text
//!            get / peek / snapshot          add / invalidate / clear
//!                     │                               │
//!               tree.read()                     tree.write()
//!                     │                               │
//!                     └──────────► ledger.lock() ◄────┘
//! ```
//!
//! Operations that count lock the ledger while the tree guard is still held,
//! so the counters describe exactly the tree operations that ran, in the same
//! order. `stats` and `reset_stats` only need the ledger mutex.
//!
//! # Example
//!
//! ```
//! use dependency_cache::DataCache;
//! use serde_json::json;
//!
//! let cache = DataCache::new();
//! cache.add(["users", "1"], json!({"name": "Al"})).unwrap();
//!
//! let hit = cache.get("users/1").unwrap();
//! assert!(hit.exists());
//!
//! assert!(cache.invalidate("users").unwrap());
//! assert!(!cache.get("users/1").unwrap().exists());
//!
//! let stats = cache.stats();
//! assert_eq!((stats.gets, stats.hits, stats.misses), (2, 1, 1));
//! ```

mod inspect;
mod types;

pub use types::{EntryInfo, GetResult, NodeInfo};

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use tracing::{debug, info, instrument, warn};

use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::hashing::fingerprint;
use crate::path::{CachePath, ToCachePath};
use crate::stats::{CacheStats, Event, StatsLedger};
use crate::time_operation;
use crate::tree::{DependencyTree, StoredValue, TreeSnapshot};

/// Hierarchical in-memory cache with cascading invalidation.
///
/// Safe to share across threads behind an `Arc`.
pub struct DataCache {
    config: CacheConfig,
    tree: RwLock<DependencyTree>,
    ledger: Mutex<StatsLedger>,
}

impl DataCache {
    /// Create an empty cache with the default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    pub fn with_config(config: CacheConfig) -> Self {
        let tree = DependencyTree::with_pruning(
            config.root_identifier.clone(),
            config.prune_empty_ancestors,
        );
        let ledger = StatsLedger::new(config.track_path_stats);
        Self {
            config,
            tree: RwLock::new(tree),
            ledger: Mutex::new(ledger),
        }
    }

    #[inline]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Look up the value stored at `path`.
    ///
    /// Always counts one `get`, plus one hit or one miss. A node that only
    /// routes to descendants is a miss.
    #[instrument(skip_all)]
    pub fn get(&self, path: impl ToCachePath) -> Result<GetResult> {
        let _timer = time_operation!("get");
        let path = self.resolve("get", &path)?;
        let key = self.stats_key(&path);
        debug!(path = %key, "Cache get");

        let entry = {
            let tree = self.tree.read();
            let entry = tree.find(&path).and_then(|node| node.data()).cloned();
            self.ledger.lock().record_get(&key, entry.is_some());
            entry
        };

        if entry.is_some() {
            info!(path = %key, "Cache hit");
            crate::metrics::record_operation("get", "hit");
        } else {
            info!(path = %key, "Cache miss");
            crate::metrics::record_operation("get", "miss");
        }
        Ok(GetResult::new(path.into_owned(), entry))
    }

    /// Store `value` at `path`, replacing whatever that exact node held.
    ///
    /// Missing ancestors are created as routing nodes. Descendants are
    /// left alone.
    #[instrument(skip_all)]
    pub fn add(&self, path: impl ToCachePath, value: Value) -> Result<()> {
        let _timer = time_operation!("add");
        let path = self.resolve("add", &path)?;
        let key = self.stats_key(&path);
        debug!(path = %key, "Cache add");

        let data_hash = fingerprint(&value);
        let (replaced, entries) = {
            let mut tree = self.tree.write();
            let stored = StoredValue {
                value,
                data_hash,
                timestamp: Utc::now(),
            };
            let replaced = tree.insert(&path, stored).is_some();
            self.ledger.lock().record(Event::Add, &key);
            (replaced, tree.len())
        };

        info!(path = %key, replaced, "Cache add");
        crate::metrics::record_operation("add", Event::Add.as_str());
        crate::metrics::set_entries(entries);
        Ok(())
    }

    /// Serialize `value` to JSON and store it at `path`.
    pub fn add_serialized<T: Serialize + ?Sized>(&self, path: impl ToCachePath, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.add(path, value)
    }

    /// Remove the node at `path` together with its whole subtree.
    ///
    /// Returns `false`, counting nothing, if no node exists there or the
    /// subtree there holds no data. Routing nodes above stored data count as
    /// existing.
    #[instrument(skip_all)]
    pub fn invalidate(&self, path: impl ToCachePath) -> Result<bool> {
        let _timer = time_operation!("invalidate");
        let path = self.resolve("invalidate", &path)?;
        let key = self.stats_key(&path);
        debug!(path = %key, "Cache invalidate");

        let (detached, entries) = {
            let mut tree = self.tree.write();
            let detached = tree.detach(&path);
            if detached.is_some() {
                self.ledger.lock().record(Event::Invalidate, &key);
            }
            (detached, tree.len())
        };

        let Some(subtree) = detached else {
            warn!(path = %key, "Invalidate on missing path");
            crate::metrics::record_operation("invalidate", "noop");
            return Ok(false);
        };

        let removed = subtree.populated_count();
        // Dropping a large subtree happens outside the lock.
        drop(subtree);

        info!(path = %key, removed, "Cache invalidate");
        crate::metrics::record_operation("invalidate", Event::Invalidate.as_str());
        crate::metrics::record_invalidated_entries(removed);
        crate::metrics::set_entries(entries);
        Ok(true)
    }

    /// Consistent copy of every counter.
    pub fn stats(&self) -> CacheStats {
        self.ledger.lock().snapshot()
    }

    /// Zero all counters. The tree is not touched.
    pub fn reset_stats(&self) {
        self.ledger.lock().reset();
        info!("Cache statistics reset");
        crate::metrics::record_stats_reset();
    }

    /// Deep, detached copy of the whole tree.
    pub fn tree_snapshot(&self) -> TreeSnapshot {
        let _timer = time_operation!("snapshot");
        let snapshot = self.tree.read().snapshot();
        crate::metrics::record_operation("snapshot", "ok");
        snapshot
    }

    /// Convert and validate a caller-supplied path.
    ///
    /// Rejections never reach the tree or the ledger.
    fn resolve<'a, P>(&self, operation: &'static str, path: &'a P) -> Result<Cow<'a, CachePath>>
    where
        P: ToCachePath + ?Sized,
    {
        let separator = self.config.separator;
        let resolved = path.to_cache_path().and_then(|resolved| {
            let clash = resolved
                .segments()
                .iter()
                .find(|s| s.contains(separator))
                .cloned();
            match clash {
                Some(segment) => Err(CacheError::invalid_path(format!(
                    "segment '{}' contains the separator '{}'",
                    segment, separator
                ))),
                None => Ok(resolved),
            }
        });

        if let Err(ref e) = resolved {
            warn!(operation, error = %e, "Rejected cache path");
            crate::metrics::record_operation(operation, "rejected");
        }
        resolved
    }

    fn stats_key(&self, path: &CachePath) -> String {
        path.joined(self.config.separator)
    }
}

impl Default for DataCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DataCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataCache")
            .field("config", &self.config)
            .field("entries", &self.tree.read().len())
            .finish()
    }
}
