//! Concurrency tests for the shared cache.
//!
//! Exercises the cache from many OS threads and from tokio tasks, checking
//! that counters stay consistent and that readers never observe a value
//! without its matching hash.
//!
//! Run with: `cargo test --test concurrency`

use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use dependency_cache::{fingerprint, DataCache};

const THREADS: usize = 8;
const PER_THREAD: usize = 50;

#[test]
fn test_concurrent_adds_to_distinct_paths() {
    let cache = DataCache::new();

    thread::scope(|s| {
        for t in 0..THREADS {
            let cache = &cache;
            s.spawn(move || {
                for i in 0..PER_THREAD {
                    cache
                        .add(format!("threads/{}/items/{}", t, i), json!({"t": t, "i": i}))
                        .unwrap();
                }
            });
        }
    });

    assert_eq!(cache.len(), THREADS * PER_THREAD);
    let stats = cache.stats();
    assert_eq!(stats.adds, (THREADS * PER_THREAD) as u64);
    assert_eq!(stats.paths_added.len(), THREADS * PER_THREAD);

    for t in 0..THREADS {
        let result = cache.get(format!("threads/{}/items/0", t)).unwrap();
        assert_eq!(result.data(), Some(&json!({"t": t, "i": 0})));
    }
}

#[test]
fn test_concurrent_gets_on_one_path_all_counted() {
    let cache = DataCache::new();
    cache.add("hot", json!("value")).unwrap();

    thread::scope(|s| {
        for _ in 0..THREADS {
            let cache = &cache;
            s.spawn(move || {
                for _ in 0..PER_THREAD {
                    assert!(cache.get("hot").unwrap().exists());
                }
            });
        }
    });

    let total = (THREADS * PER_THREAD) as u64;
    let stats = cache.stats();
    assert_eq!(stats.gets, total);
    assert_eq!(stats.hits, total);
    assert_eq!(stats.misses, 0);
    assert_eq!(stats.paths_checked["hot"], total);
    assert_eq!(stats.paths_hit["hot"], total);
}

#[test]
fn test_readers_never_see_torn_values() {
    let cache = DataCache::new();
    let done = AtomicBool::new(false);
    let observed = AtomicUsize::new(0);

    thread::scope(|s| {
        let (cache, done, observed) = (&cache, &done, &observed);

        s.spawn(move || {
            for round in 0..500 {
                cache.add("shared/value", json!({"round": round, "pad": "x".repeat(round % 17)})).unwrap();
                if round % 10 == 0 {
                    cache.invalidate("shared").unwrap();
                }
            }
            done.store(true, Ordering::Release);
        });

        for _ in 0..4 {
            s.spawn(move || {
                while !done.load(Ordering::Acquire) {
                    let result = cache.get("shared/value").unwrap();
                    if let (Some(data), Some(hash)) = (result.data(), result.data_hash()) {
                        assert_eq!(hash, fingerprint(data));
                        assert!(result.timestamp().is_some());
                        observed.fetch_add(1, Ordering::Relaxed);
                    } else {
                        assert!(result.data_hash().is_none());
                        assert!(result.timestamp().is_none());
                    }
                }
            });
        }
    });

    let stats = cache.stats();
    assert_eq!(stats.gets, stats.hits + stats.misses);
    assert_eq!(stats.hits as usize, observed.load(Ordering::Relaxed));
}

#[test]
fn test_racing_invalidations_count_once() {
    for _ in 0..20 {
        let cache = DataCache::new();
        cache.add("a/b/c", json!(1)).unwrap();
        let wins = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..THREADS {
                let (cache, wins) = (&cache, &wins);
                s.spawn(move || {
                    if cache.invalidate("a").unwrap() {
                        wins.fetch_add(1, Ordering::Relaxed);
                    }
                });
            }
        });

        assert_eq!(wins.load(Ordering::Relaxed), 1);
        assert_eq!(cache.stats().invalidations, 1);
        assert!(cache.is_empty());
    }
}

#[test]
fn test_snapshots_during_writes_are_consistent() {
    let cache = DataCache::new();

    thread::scope(|s| {
        let cache = &cache;
        s.spawn(move || {
            for i in 0..200 {
                cache.add(format!("group/{}", i % 10), json!(i)).unwrap();
                if i % 25 == 0 {
                    cache.invalidate("group").unwrap();
                }
            }
        });

        s.spawn(move || {
            for _ in 0..200 {
                let snapshot = cache.tree_snapshot();
                for node in snapshot.children.values() {
                    // Routing nodes never outlive their last populated descendant
                    assert!(node.populated_count() > 0);
                }
            }
        });
    });
}

#[test]
fn test_reset_during_traffic_keeps_counters_balanced() {
    let cache = DataCache::new();
    cache.add("hot", json!("value")).unwrap();

    thread::scope(|s| {
        let cache = &cache;
        for _ in 0..4 {
            s.spawn(move || {
                for i in 0..200 {
                    let path = if i % 2 == 0 { "hot" } else { "cold" };
                    cache.get(path).unwrap();
                }
            });
        }
        s.spawn(move || {
            for _ in 0..20 {
                cache.reset_stats();
                let stats = cache.stats();
                assert_eq!(stats.gets, stats.hits + stats.misses);
            }
        });
    });

    let stats = cache.stats();
    assert_eq!(stats.gets, stats.hits + stats.misses);
    assert_eq!(stats.gets, stats.paths_checked.values().sum::<u64>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_access_from_tasks() {
    let cache = Arc::new(DataCache::new());
    let mut handles = vec![];

    // Spawn 10 tasks that each insert 10 items and read them back
    for batch in 0..10 {
        let cache = cache.clone();
        let handle = tokio::spawn(async move {
            for i in 0..10 {
                let path = format!("batch-{}/item-{}", batch, i);
                cache.add(path.as_str(), json!({"batch": batch, "i": i})).unwrap();
                assert!(cache.get(path.as_str()).unwrap().exists());
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(cache.len(), 100);
    let stats = cache.stats();
    assert_eq!(stats.adds, 100);
    assert_eq!(stats.hits, 100);

    // Drop half the batches concurrently
    let mut handles = vec![];
    for batch in (0..10).step_by(2) {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            cache.invalidate(format!("batch-{}", batch)).unwrap()
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap());
    }

    assert_eq!(cache.len(), 50);
    assert_eq!(cache.stats().invalidations, 5);
}
