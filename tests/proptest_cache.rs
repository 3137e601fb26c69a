//! Property-based tests for cache semantics.
//!
//! Random paths are drawn from a tiny alphabet so that generated paths
//! frequently share prefixes, which is where cascading invalidation and
//! routing nodes matter.
//!
//! Run with: `cargo test --test proptest_cache`

use proptest::prelude::*;
use serde_json::Value;
use std::collections::BTreeMap;

use dependency_cache::{fingerprint, CachePath, CacheStats, DataCache};

// =============================================================================
// Strategies for generating test data
// =============================================================================

/// Short segment lists over a three-letter alphabet
fn segments_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[abc]", 1..4)
}

/// Arbitrary JSON values
fn arbitrary_json_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        ".*".prop_map(Value::String),
    ];

    leaf.prop_recursive(
        3,   // depth
        32,  // max nodes
        8,   // items per collection
        |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
                prop::collection::hash_map("[a-z]{0,6}", inner, 0..8)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        },
    )
}

#[derive(Debug, Clone)]
enum Op {
    Get(Vec<String>),
    Add(Vec<String>, Value),
    Invalidate(Vec<String>),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        segments_strategy().prop_map(Op::Get),
        (segments_strategy(), arbitrary_json_strategy()).prop_map(|(p, v)| Op::Add(p, v)),
        segments_strategy().prop_map(Op::Invalidate),
    ]
}

fn key(segments: &[String]) -> String {
    segments.join("/")
}

fn has_prefix(path: &[String], prefix: &[String]) -> bool {
    path.len() >= prefix.len() && path[..prefix.len()] == *prefix
}

// =============================================================================
// Read-your-writes
// =============================================================================

proptest! {
    /// add(p, v) then get(p) returns exactly v with its fingerprint
    #[test]
    fn prop_add_then_get_returns_value(
        path in segments_strategy(),
        value in arbitrary_json_strategy(),
    ) {
        let cache = DataCache::new();
        cache.add(path.clone(), value.clone()).unwrap();

        let result = cache.get(path).unwrap();
        prop_assert!(result.exists());
        prop_assert_eq!(result.data(), Some(&value));
        let expected_hash = fingerprint(&value);
        prop_assert_eq!(result.data_hash(), Some(expected_hash.as_str()));
    }

    /// A never-written path misses and only moves its own counters
    #[test]
    fn prop_unwritten_get_is_isolated_miss(
        written in segments_strategy(),
        probe in segments_strategy(),
    ) {
        prop_assume!(written != probe);

        let cache = DataCache::new();
        cache.add(written.clone(), Value::Bool(true)).unwrap();
        let before = cache.stats();

        prop_assert!(!cache.get(probe.clone()).unwrap().exists());

        let after = cache.stats();
        let probe_key = key(&probe);
        prop_assert_eq!(after.misses, before.misses + 1);
        prop_assert_eq!(after.hits, before.hits);
        prop_assert_eq!(after.paths_missed.get(&probe_key).copied(), Some(1));
        prop_assert_eq!(after.paths_added, before.paths_added);
        prop_assert!(!after.paths_hit.contains_key(&probe_key));
    }
}

// =============================================================================
// Invalidation
// =============================================================================

proptest! {
    /// Invalidating p removes p and every descendant, and nothing else
    #[test]
    fn prop_invalidate_cascades(
        paths in prop::collection::vec(segments_strategy(), 1..20),
        target in segments_strategy(),
    ) {
        let cache = DataCache::new();
        for p in &paths {
            cache.add(p.clone(), Value::String(key(p))).unwrap();
        }

        let existed = paths.iter().any(|p| has_prefix(p, &target));
        prop_assert_eq!(cache.invalidate(target.clone()).unwrap(), existed);

        for p in &paths {
            let present = cache.get(p.clone()).unwrap().exists();
            prop_assert_eq!(present, !has_prefix(p, &target), "path {}", key(p));
        }
    }

    /// A second invalidate of the same path is a counted no-op
    #[test]
    fn prop_invalidate_idempotent(
        paths in prop::collection::vec(segments_strategy(), 0..10),
        target in segments_strategy(),
    ) {
        let cache = DataCache::new();
        for p in &paths {
            cache.add(p.clone(), Value::Null).unwrap();
        }

        cache.invalidate(target.clone()).unwrap();
        let after_first = cache.stats();

        prop_assert!(!cache.invalidate(target).unwrap());
        prop_assert_eq!(cache.stats(), after_first);
    }
}

// =============================================================================
// Model-based sequences
// =============================================================================

proptest! {
    /// Random operation sequences agree with a flat map model
    #[test]
    fn prop_matches_flat_model(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let cache = DataCache::new();
        let mut model: BTreeMap<Vec<String>, Value> = BTreeMap::new();
        let (mut gets, mut hits, mut adds, mut invalidations) = (0u64, 0u64, 0u64, 0u64);

        for op in ops {
            match op {
                Op::Get(p) => {
                    let result = cache.get(p.clone()).unwrap();
                    gets += 1;
                    match model.get(&p) {
                        Some(v) => {
                            hits += 1;
                            prop_assert_eq!(result.data(), Some(v));
                        }
                        None => prop_assert!(!result.exists()),
                    }
                }
                Op::Add(p, v) => {
                    cache.add(p.clone(), v.clone()).unwrap();
                    model.insert(p, v);
                    adds += 1;
                }
                Op::Invalidate(p) => {
                    // With eager pruning a node exists iff some stored path runs through it
                    let expected = model.keys().any(|k| has_prefix(k, &p));
                    prop_assert_eq!(cache.invalidate(p.clone()).unwrap(), expected);
                    if expected {
                        invalidations += 1;
                    }
                    model.retain(|k, _| !has_prefix(k, &p));
                }
            }
            prop_assert_eq!(cache.len(), model.len());
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.gets, gets);
        prop_assert_eq!(stats.hits, hits);
        prop_assert_eq!(stats.misses, gets - hits);
        prop_assert_eq!(stats.adds, adds);
        prop_assert_eq!(stats.invalidations, invalidations);
    }

    /// Global counters equal the sums of their per-path maps
    #[test]
    fn prop_counter_conservation(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let cache = DataCache::new();
        for op in ops {
            match op {
                Op::Get(p) => { cache.get(p).unwrap(); }
                Op::Add(p, v) => cache.add(p, v).unwrap(),
                Op::Invalidate(p) => { cache.invalidate(p).unwrap(); }
            }
        }

        let stats = cache.stats();
        let sum = |m: &BTreeMap<String, u64>| m.values().sum::<u64>();
        prop_assert_eq!(stats.gets, stats.hits + stats.misses);
        prop_assert_eq!(stats.gets, sum(&stats.paths_checked));
        prop_assert_eq!(stats.hits, sum(&stats.paths_hit));
        prop_assert_eq!(stats.misses, sum(&stats.paths_missed));
        prop_assert_eq!(stats.adds, sum(&stats.paths_added));
        prop_assert_eq!(stats.invalidations, sum(&stats.paths_invalidated));
    }

    /// reset_stats zeroes counters but leaves stored data readable
    #[test]
    fn prop_reset_keeps_data(
        paths in prop::collection::vec(segments_strategy(), 1..10),
    ) {
        let cache = DataCache::new();
        for p in &paths {
            cache.add(p.clone(), Value::String(key(p))).unwrap();
            cache.get(p.clone()).unwrap();
        }

        cache.reset_stats();
        prop_assert_eq!(cache.stats(), CacheStats::default());

        for p in &paths {
            prop_assert!(cache.get(p.clone()).unwrap().exists());
        }
    }
}

// =============================================================================
// Fingerprints and paths
// =============================================================================

proptest! {
    /// Fingerprints survive a serialize/parse cycle of the value
    #[test]
    fn prop_fingerprint_stable_across_reparse(value in arbitrary_json_strategy()) {
        let text = serde_json::to_string(&value).unwrap();
        let reparsed: Value = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(fingerprint(&value), fingerprint(&reparsed));
    }

    /// Path parsing never panics and only accepts strings with a segment
    #[test]
    fn prop_path_parse_never_panics(raw in ".{0,40}") {
        match CachePath::parse(&raw) {
            Ok(path) => {
                prop_assert!(path.depth() >= 1);
                prop_assert!(path.segments().iter().all(|s| !s.is_empty() && !s.contains('/')));
            }
            Err(e) => {
                prop_assert!(e.is_invalid_path());
                prop_assert!(raw.split('/').all(str::is_empty));
            }
        }
    }
}
