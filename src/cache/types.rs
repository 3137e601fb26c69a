//! Public result types for the cache facade.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::Result;
use crate::path::CachePath;
use crate::tree::StoredValue;

/// Outcome of [`DataCache::get`](super::DataCache::get).
///
/// Either the full stored value (payload, hash and timestamp together) or
/// nothing; a partially populated result cannot be constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct GetResult {
    path: CachePath,
    entry: Option<StoredValue>,
}

impl GetResult {
    pub(crate) fn new(path: CachePath, entry: Option<StoredValue>) -> Self {
        Self { path, entry }
    }

    #[inline]
    pub fn path(&self) -> &CachePath {
        &self.path
    }

    #[inline]
    pub fn exists(&self) -> bool {
        self.entry.is_some()
    }

    #[inline]
    pub fn entry(&self) -> Option<&StoredValue> {
        self.entry.as_ref()
    }

    #[inline]
    pub fn data(&self) -> Option<&Value> {
        self.entry.as_ref().map(|e| &e.value)
    }

    #[inline]
    pub fn data_hash(&self) -> Option<&str> {
        self.entry.as_ref().map(|e| e.data_hash.as_str())
    }

    #[inline]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.entry.as_ref().map(|e| e.timestamp)
    }

    /// Take ownership of the stored value.
    pub fn into_entry(self) -> Option<StoredValue> {
        self.entry
    }

    /// Decode the stored payload into a concrete type.
    ///
    /// Returns `Ok(None)` on a miss.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        match &self.entry {
            Some(entry) => Ok(Some(serde_json::from_value(entry.value.clone())?)),
            None => Ok(None),
        }
    }
}

#[derive(Serialize)]
struct GetResultWire<'a> {
    path: &'a CachePath,
    node_exists: bool,
    data: Option<&'a Value>,
    data_hash: Option<&'a str>,
    timestamp: Option<DateTime<Utc>>,
}

impl Serialize for GetResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        GetResultWire {
            path: &self.path,
            node_exists: self.exists(),
            data: self.data(),
            data_hash: self.data_hash(),
            timestamp: self.timestamp(),
        }
        .serialize(serializer)
    }
}

/// Metadata for a single node, read without touching statistics.
///
/// Unlike [`GetResult`], this reports routing nodes as existing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeInfo {
    pub path: CachePath,
    pub exists: bool,
    pub has_data: bool,
    pub data: Option<Value>,
    pub data_hash: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    /// Child identifiers in sorted order
    pub children: Vec<String>,
}

/// A populated node found while enumerating a subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryInfo {
    pub path: CachePath,
    pub data_hash: String,
    pub timestamp: DateTime<Utc>,
}
