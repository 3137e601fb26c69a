//! Configuration for the dependency cache.
//!
//! # Example
//!
//! ```
//! use dependency_cache::CacheConfig;
//!
//! // Minimal config (uses defaults)
//! let config = CacheConfig::default();
//! assert_eq!(config.root_identifier, "root");
//! assert_eq!(config.separator, '/');
//!
//! // Tuned config
//! let config = CacheConfig {
//!     track_path_stats: false,
//!     ..Default::default()
//! };
//! assert!(config.prune_empty_ancestors);
//! ```

use serde::Deserialize;

/// Configuration for a [`DataCache`](crate::DataCache).
///
/// All fields have sensible defaults, so an empty JSON object deserializes
/// to the same value as [`CacheConfig::default()`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Identifier of the root node as shown in tree snapshots (default: "root")
    #[serde(default = "default_root_identifier")]
    pub root_identifier: String,

    /// Separator used when a path is rendered as a string key (default: '/')
    #[serde(default = "default_separator")]
    pub separator: char,

    /// Remove routing ancestors left empty after an invalidation (default: true)
    #[serde(default = "default_prune_empty_ancestors")]
    pub prune_empty_ancestors: bool,

    /// Keep the five per-path counter maps (default: true).
    /// Global counters are always maintained.
    #[serde(default = "default_track_path_stats")]
    pub track_path_stats: bool,
}

fn default_root_identifier() -> String { "root".to_string() }
fn default_separator() -> char { '/' }
fn default_prune_empty_ancestors() -> bool { true }
fn default_track_path_stats() -> bool { true }

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root_identifier: default_root_identifier(),
            separator: default_separator(),
            prune_empty_ancestors: default_prune_empty_ancestors(),
            track_path_stats: default_track_path_stats(),
        }
    }
}
