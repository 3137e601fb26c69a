//! # Dependency Cache
//!
//! An in-memory, hierarchical cache where invalidating a path also
//! invalidates everything stored beneath it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         DataCache                           │
//! │  • get / add / invalidate with integrated statistics       │
//! │  • RwLock over the tree, Mutex over the ledger             │
//! │  • Content fingerprint + timestamp on every write          │
//! └─────────────────────────────────────────────────────────────┘
//!                 │                               │
//!                 ▼                               ▼
//! ┌───────────────────────────────┐ ┌───────────────────────────┐
//! │        DependencyTree         │ │        StatsLedger        │
//! │  • find-or-create by path    │ │  • 5 global counters     │
//! │  • subtree collapse          │ │  • 5 per-path maps       │
//! │  • detached snapshots        │ │  • atomic reset          │
//! └───────────────────────────────┘ └───────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use dependency_cache::{DataCache, PathBuilder};
//! use serde_json::json;
//!
//! let cache = DataCache::new();
//!
//! // Store data for a user and a parameterised query under that user
//! cache.add("users/1", json!({"name": "Al"})).unwrap();
//! let query = PathBuilder::new()
//!     .segment("users")
//!     .segment("1")
//!     .hashed("Recent Posts", &json!({"limit": 10}))
//!     .build()
//!     .unwrap();
//! cache.add(&query, json!([101, 102])).unwrap();
//!
//! // Invalidating the user drops everything derived from it
//! assert!(cache.invalidate("users/1").unwrap());
//! assert!(!cache.get(&query).unwrap().exists());
//!
//! let stats = cache.stats();
//! assert_eq!(stats.adds, 2);
//! assert_eq!(stats.invalidations, 1);
//! ```
//!
//! ## Features
//!
//! - **Cascading Invalidation**: Removing a node removes its whole subtree in one step
//! - **Content Fingerprints**: SHA-256 over canonical JSON, stable across key order
//! - **Statistics**: Global and per-path hit/miss/add/invalidate counters
//! - **Snapshots**: Detached, serializable copies of the tree for dashboards
//! - **Metrics**: `metrics` facade counters, gauges and latency histograms
//!
//! ## Configuration
//!
//! See [`CacheConfig`] for all configuration options.
//!
//! ## Modules
//!
//! - [`cache`]: The [`DataCache`] facade
//! - [`tree`]: Node hierarchy and snapshots
//! - [`path`]: Path validation and parameter-hashed segments
//! - [`stats`]: Statistics ledger
//! - [`hashing`]: Content fingerprints

pub mod cache;
pub mod config;
pub mod error;
pub mod hashing;
pub mod metrics;
pub mod path;
pub mod stats;
pub mod tree;

pub use cache::{DataCache, EntryInfo, GetResult, NodeInfo};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use hashing::{canonical_json, fingerprint, FINGERPRINT_LEN};
pub use path::{hash_params, CachePath, PathBuilder, ToCachePath};
pub use stats::{CacheStats, Event, StatsLedger};
pub use tree::{DependencyNode, DependencyTree, StoredValue, TreeSnapshot};
pub use crate::metrics::LatencyTimer;
