// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Basic dependency-cache usage example.
//!
//! Demonstrates:
//! 1. Storing raw data and results derived from it
//! 2. Reading entries back (hits and misses)
//! 3. Cascading invalidation of a whole subtree
//! 4. Inspecting the tree and the statistics ledger
//! 5. Displaying captured metrics
//!
//! # Run
//!
//! ```bash
//! cargo run --example basic_usage
//! ```

use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use serde_json::json;
use std::time::Instant;

use dependency_cache::{CachePath, DataCache, PathBuilder, TreeSnapshot};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install metrics recorder (captures all metrics for display)
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder.install().expect("failed to install metrics recorder");

    // Simple logging (no filter for simplicity)
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║         dependency-cache: Basic Usage Example                 ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    let cache = DataCache::new();

    // ─────────────────────────────────────────────────────────────────────────
    // 1. Raw data plus derived results
    // ─────────────────────────────────────────────────────────────────────────
    println!("📝 Storing raw prices and derived indicators...");

    let nse = CachePath::parse("raw_data/nse")?;
    cache.add(&nse, json!({"close": [101.5, 102.0, 99.8, 100.4]}))?;
    cache.add("raw_data/bse", json!({"close": [55.1, 55.9]}))?;

    for window in [5, 20] {
        let path = PathBuilder::from_path(&nse)
            .hashed("Moving Average", &json!({"window": window}))
            .build()?;
        let start = Instant::now();
        cache.add(&path, json!({"window": window, "values": [100.9]}))?;
        println!("   └─ Stored: {} ({:?})", path, start.elapsed());
    }
    println!("   ✅ {} entries cached", cache.len());

    // ─────────────────────────────────────────────────────────────────────────
    // 2. Reads
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n📖 Reading entries back...");
    for path in ["raw_data/nse", "raw_data/bse", "raw_data/lse", "raw_data"] {
        let start = Instant::now();
        let result = cache.get(path)?;
        match result.data_hash() {
            Some(hash) => println!("   └─ {} → hit, hash {}… ({:?})", path, &hash[..12], start.elapsed()),
            None => println!("   └─ {} → miss ({:?})", path, start.elapsed()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 3. Cascading invalidation
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n🧹 Invalidating raw_data/nse (and everything derived from it)...");
    let removed = cache.invalidate(&nse)?;
    println!("   └─ invalidate(raw_data/nse) → {}", removed);
    println!("   └─ invalidate(raw_data/nse) again → {}", cache.invalidate(&nse)?);
    println!("   ✅ {} entries remain", cache.len());

    // ─────────────────────────────────────────────────────────────────────────
    // 4. Tree and statistics
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n🌳 Tree snapshot:");
    print_tree(&cache.tree_snapshot(), 0);

    let stats = cache.stats();
    println!("\n📊 Cache Statistics:");
    println!("   ┌─ gets: {}  hits: {}  misses: {}", stats.gets, stats.hits, stats.misses);
    println!("   ├─ adds: {}  invalidations: {}", stats.adds, stats.invalidations);
    match stats.hit_ratio() {
        Some(ratio) => println!("   └─ hit ratio: {:.1}%", ratio),
        None => println!("   └─ hit ratio: n/a"),
    }
    println!("\n   As JSON:\n{}", serde_json::to_string_pretty(&stats)?);

    // ─────────────────────────────────────────────────────────────────────────
    // 5. Metrics
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n📈 Raw Metrics:");
    dump_metrics(&snapshotter);

    cache.reset_stats();
    println!("\n♻️  Statistics reset; gets now {}", cache.stats().gets);

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║                    Example complete!                          ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    Ok(())
}

fn print_tree(node: &TreeSnapshot, depth: usize) {
    let marker = if node.has_data { "●" } else { "○" };
    println!("   {}{} {}", "  ".repeat(depth), marker, node.identifier);
    for child in node.children.values() {
        print_tree(child, depth + 1);
    }
}

/// Dump all captured metrics, grouped by kind
fn dump_metrics(snapshotter: &Snapshotter) {
    let mut counters: Vec<_> = vec![];
    let mut gauges: Vec<_> = vec![];
    let mut histograms: Vec<_> = vec![];

    for (composite_key, _, _, value) in snapshotter.snapshot().into_vec() {
        let (_, key) = composite_key.into_parts();
        let labels: Vec<_> = key.labels().map(|l| format!("{}={}", l.key(), l.value())).collect();
        let label_str = if labels.is_empty() { String::new() } else { format!("{{{}}}", labels.join(",")) };
        let name = key.name().to_string();

        match value {
            DebugValue::Counter(v) => counters.push((name, label_str, v)),
            DebugValue::Gauge(v) => gauges.push((name, label_str, v.into_inner())),
            DebugValue::Histogram(samples) => {
                let count = samples.len();
                let sum: f64 = samples.iter().map(|v| v.into_inner()).sum();
                histograms.push((name, label_str, count, sum));
            }
        }
    }

    counters.sort();
    gauges.sort_by(|a, b| a.0.cmp(&b.0));
    histograms.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    if !counters.is_empty() {
        println!("   ┌─ Counters (cumulative)");
        for (name, labels, value) in &counters {
            println!("   │  └─ {}{} = {}", name, labels, value);
        }
    }
    if !gauges.is_empty() {
        println!("   ├─ Gauges (current value)");
        for (name, labels, value) in &gauges {
            println!("   │  └─ {}{} = {:.0}", name, labels, value);
        }
    }
    if !histograms.is_empty() {
        println!("   └─ Histograms (latency)");
        for (name, labels, count, sum) in &histograms {
            let avg_us = if *count > 0 { sum / *count as f64 * 1e6 } else { 0.0 };
            println!("      └─ {}{}: n={} avg={:.1}µs", name, labels, count, avg_us);
        }
    }
}
