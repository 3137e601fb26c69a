//! Fluent construction of cache paths whose segments encode parameters.
//!
//! Computation results are usually keyed by their inputs: the name of a step
//! plus a fingerprint of its parameters. [`PathBuilder::hashed`] produces such
//! segments, so changing any parameter lands the result on a different node
//! while invalidating a shared prefix still cascades over every variant.

use serde_json::Value;
use sha2::{Digest, Sha256};

use super::CachePath;
use crate::error::Result;
use crate::hashing::canonical_json;

/// Stable SHA-256 hex fingerprint of a parameter set.
///
/// `null` and "no parameters" (an empty object or array) each hash to their
/// own fixed value. Object key order does not matter; array order does.
///
/// ```
/// use dependency_cache::hash_params;
/// use serde_json::json;
///
/// assert_eq!(
///     hash_params(&json!({"a": 1, "b": 2})),
///     hash_params(&json!({"b": 2, "a": 1})),
/// );
/// assert_ne!(hash_params(&json!(null)), hash_params(&json!({})));
/// ```
pub fn hash_params(params: &Value) -> String {
    let tagged = match params {
        Value::Null => "params:null".to_string(),
        // An empty object and an empty array both mean "no parameters".
        Value::Object(map) if map.is_empty() => "params:empty".to_string(),
        Value::Array(items) if items.is_empty() => "params:empty".to_string(),
        other => format!("params:{}", canonical_json(other)),
    };
    hex::encode(Sha256::digest(tagged.as_bytes()))
}

/// Builder for multi-segment cache paths.
///
/// ```
/// use dependency_cache::PathBuilder;
/// use serde_json::json;
///
/// let path = PathBuilder::new()
///     .segment("raw_data")
///     .segment("nse")
///     .hashed("Moving Average", &json!({"window": 20}))
///     .build()
///     .unwrap();
///
/// assert_eq!(path.depth(), 3);
/// assert!(path.last().starts_with("moving_average_"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    segments: Vec<String>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing path.
    pub fn from_path(path: &CachePath) -> Self {
        Self {
            segments: path.segments().to_vec(),
        }
    }

    /// Append a literal segment.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Append `"{name}_{hash_params(params)}"`, with runs of whitespace in
    /// `name` collapsed to `_` and the name lower-cased.
    pub fn hashed(mut self, name: &str, params: &Value) -> Self {
        let safe_name = name.split_whitespace().collect::<Vec<_>>().join("_").to_lowercase();
        self.segments.push(format!("{}_{}", safe_name, hash_params(params)));
        self
    }

    /// Validate and produce the path.
    pub fn build(self) -> Result<CachePath> {
        CachePath::new(self.segments)
    }
}
