// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Path addressing for the dependency tree.
//!
//! A [`CachePath`] is an ordered, non-empty list of non-empty segments:
//!
//! ```text
//! users/profile/data
//!
//! Becomes:
//!
//! root
//! └── users
//!     └── profile
//!         └── data
//! ```
//!
//! The root itself has no path; it is never a valid argument to
//! `get`/`add`/`invalidate`.

mod builder;

pub use builder::{hash_params, PathBuilder};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::{CacheError, Result};

/// Separator used by path strings and statistics keys.
pub const SEPARATOR: char = '/';

/// A validated, non-empty sequence of path segments.
///
/// # Example
///
/// ```
/// use dependency_cache::CachePath;
///
/// let path = CachePath::parse("/users//profile/").unwrap();
/// assert_eq!(path.segments(), ["users", "profile"]);
/// assert_eq!(path.key(), "users/profile");
///
/// assert!(CachePath::parse("///").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CachePath {
    segments: Vec<String>,
}

impl CachePath {
    /// Build a path from explicit segments.
    ///
    /// Fails if the list is empty, a segment is empty, or a segment
    /// contains the [`SEPARATOR`].
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(CacheError::invalid_path("path must contain at least one segment"));
        }
        for (i, segment) in segments.iter().enumerate() {
            if segment.is_empty() {
                return Err(CacheError::invalid_path(format!("segment {} is empty", i)));
            }
            if segment.contains(SEPARATOR) {
                return Err(CacheError::invalid_path(format!(
                    "segment '{}' contains the separator '{}'",
                    segment, SEPARATOR
                )));
            }
        }
        Ok(Self { segments })
    }

    /// Parse a slash-delimited path string, ignoring empty segments.
    ///
    /// `"a//b/"` -> `["a", "b"]`
    pub fn parse(path: &str) -> Result<Self> {
        let segments: Vec<&str> = path.split(SEPARATOR).filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return Err(CacheError::invalid_path(format!(
                "'{}' contains no path segments",
                path
            )));
        }
        Ok(Self {
            segments: segments.into_iter().map(str::to_string).collect(),
        })
    }

    #[inline]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments (always >= 1).
    #[inline]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Identifier of the node this path addresses.
    pub fn last(&self) -> &str {
        // Non-empty by construction.
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Statistics key: segments joined by [`SEPARATOR`].
    pub fn key(&self) -> String {
        self.joined(SEPARATOR)
    }

    /// Segments joined by an arbitrary separator.
    pub fn joined(&self, separator: char) -> String {
        let mut out = String::with_capacity(self.segments.iter().map(|s| s.len() + 1).sum());
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push(separator);
            }
            out.push_str(segment);
        }
        out
    }

    /// Parent path, or `None` for a top-level path (whose parent is the root).
    ///
    /// `a/b/c` -> `a/b`, `a` -> `None`
    pub fn parent(&self) -> Option<CachePath> {
        if self.segments.len() <= 1 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// All prefixes of this path, shallowest first, including self.
    ///
    /// `a/b/c` -> `[a, a/b, a/b/c]`
    pub fn ancestors(&self) -> Vec<CachePath> {
        (1..=self.segments.len())
            .map(|len| Self {
                segments: self.segments[..len].to_vec(),
            })
            .collect()
    }

    /// True if `self` is a strict prefix of `other`.
    pub fn is_ancestor_of(&self, other: &CachePath) -> bool {
        self.segments.len() < other.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }

    /// Extend the path by one segment.
    pub fn join(&self, segment: impl Into<String>) -> Result<CachePath> {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self::new(segments)
    }
}

impl fmt::Display for CachePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for CachePath {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for CachePath {
    type Error = CacheError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl TryFrom<Vec<String>> for CachePath {
    type Error = CacheError;

    fn try_from(value: Vec<String>) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&[&str]> for CachePath {
    type Error = CacheError;

    fn try_from(value: &[&str]) -> Result<Self> {
        Self::new(value.iter().copied())
    }
}

impl<const N: usize> TryFrom<[&str; N]> for CachePath {
    type Error = CacheError;

    fn try_from(value: [&str; N]) -> Result<Self> {
        Self::new(value)
    }
}

impl Serialize for CachePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.segments.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CachePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let segments = Vec::<String>::deserialize(deserializer)?;
        Self::new(segments).map_err(serde::de::Error::custom)
    }
}

/// Anything a cache operation accepts as a path.
///
/// Conversion happens at the call, so a malformed path is reported as
/// [`CacheError::InvalidPath`] before any state is touched.
pub trait ToCachePath {
    fn to_cache_path(&self) -> Result<Cow<'_, CachePath>>;
}

impl ToCachePath for CachePath {
    fn to_cache_path(&self) -> Result<Cow<'_, CachePath>> {
        Ok(Cow::Borrowed(self))
    }
}

impl ToCachePath for str {
    fn to_cache_path(&self) -> Result<Cow<'_, CachePath>> {
        CachePath::parse(self).map(Cow::Owned)
    }
}

impl ToCachePath for String {
    fn to_cache_path(&self) -> Result<Cow<'_, CachePath>> {
        self.as_str().to_cache_path()
    }
}

impl ToCachePath for [&str] {
    fn to_cache_path(&self) -> Result<Cow<'_, CachePath>> {
        CachePath::new(self.iter().copied()).map(Cow::Owned)
    }
}

impl<const N: usize> ToCachePath for [&str; N] {
    fn to_cache_path(&self) -> Result<Cow<'_, CachePath>> {
        self.as_slice().to_cache_path()
    }
}

impl ToCachePath for [String] {
    fn to_cache_path(&self) -> Result<Cow<'_, CachePath>> {
        CachePath::new(self.iter().cloned()).map(Cow::Owned)
    }
}

impl ToCachePath for Vec<String> {
    fn to_cache_path(&self) -> Result<Cow<'_, CachePath>> {
        self.as_slice().to_cache_path()
    }
}

impl<T: ToCachePath + ?Sized> ToCachePath for &T {
    fn to_cache_path(&self) -> Result<Cow<'_, CachePath>> {
        (**self).to_cache_path()
    }
}
