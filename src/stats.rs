// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Usage statistics for the cache.
//!
//! The [`StatsLedger`] holds five global counters plus five per-path maps.
//! It has no interior locking: the owning cache updates it under its own lock
//! in the same critical section as the tree operation being counted, and
//! hands out [`CacheStats`] copies.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of a counted operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Hit,
    Miss,
    Add,
    Invalidate,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::Add => "add",
            Self::Invalidate => "invalidate",
        }
    }
}

/// Point-in-time copy of all counters.
///
/// Serializes to the shape the dashboard expects: the five global counters
/// followed by the five per-path maps keyed by `a/b/c` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub gets: u64,
    pub hits: u64,
    pub misses: u64,
    pub adds: u64,
    pub invalidations: u64,
    pub paths_checked: BTreeMap<String, u64>,
    pub paths_hit: BTreeMap<String, u64>,
    pub paths_missed: BTreeMap<String, u64>,
    pub paths_added: BTreeMap<String, u64>,
    pub paths_invalidated: BTreeMap<String, u64>,
}

impl CacheStats {
    /// Hit ratio as a percentage (0.0 - 100.0), `None` before the first get.
    #[must_use]
    pub fn hit_ratio(&self) -> Option<f64> {
        if self.gets == 0 {
            None
        } else {
            Some(self.hits as f64 / self.gets as f64 * 100.0)
        }
    }
}

/// Mutable counter table behind a [`DataCache`](crate::DataCache).
#[derive(Debug)]
pub struct StatsLedger {
    stats: CacheStats,
    track_paths: bool,
}

impl StatsLedger {
    pub fn new(track_paths: bool) -> Self {
        Self {
            stats: CacheStats::default(),
            track_paths,
        }
    }

    /// Count a `get` on `key` and its hit/miss outcome.
    pub fn record_get(&mut self, key: &str, hit: bool) {
        self.stats.gets += 1;
        bump(self.track_paths, &mut self.stats.paths_checked, key);
        if hit {
            self.record(Event::Hit, key);
        } else {
            self.record(Event::Miss, key);
        }
    }

    /// Count a single event on `key`.
    pub fn record(&mut self, event: Event, key: &str) {
        let track = self.track_paths;
        let s = &mut self.stats;
        let (counter, per_path) = match event {
            Event::Hit => (&mut s.hits, &mut s.paths_hit),
            Event::Miss => (&mut s.misses, &mut s.paths_missed),
            Event::Add => (&mut s.adds, &mut s.paths_added),
            Event::Invalidate => (&mut s.invalidations, &mut s.paths_invalidated),
        };
        *counter += 1;
        bump(track, per_path, key);
    }

    pub fn snapshot(&self) -> CacheStats {
        self.stats.clone()
    }

    /// Zero every counter and forget every path.
    pub fn reset(&mut self) {
        self.stats = CacheStats::default();
    }
}

fn bump(enabled: bool, map: &mut BTreeMap<String, u64>, key: &str) {
    if !enabled {
        return;
    }
    match map.get_mut(key) {
        Some(count) => *count += 1,
        None => {
            map.insert(key.to_string(), 1);
        }
    }
}
