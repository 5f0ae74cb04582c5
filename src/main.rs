// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashSet;
use std::env;
use std::time::{Duration, Instant};
use threadblock::config::{load_and_validate_config, BlockConfig};
use threadblock::engine::{ExecuteOptions, ThreadBlock};
use threadblock::transformations::from_fn;
use tracing_subscriber::EnvFilter;

const DEFAULT_ITEM_COUNT: u64 = 20;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Spread `count` distinct delays over 250..2500ms, the same way every time.
fn demo_items(count: u64) -> Vec<u64> {
    let mut seen = HashSet::new();
    (0..count)
        .map(|i| 250 + (i * 977) % 2251)
        .filter(|item| seen.insert(*item))
        .collect()
}

#[tokio::main]
async fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        eprintln!("Usage: {} [config.yaml|config.toml] [item_count]", args[0]);
        eprintln!("Example: {} configs/block.yaml 40", args[0]);
        std::process::exit(1);
    }

    let config = match args.get(1).filter(|arg| arg.parse::<u64>().is_err()) {
        Some(path) => match load_and_validate_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => BlockConfig::default(),
    };
    let count = args
        .iter()
        .skip(1)
        .find_map(|arg| arg.parse::<u64>().ok())
        .unwrap_or(DEFAULT_ITEM_COUNT);

    // Sleep for the item's value in milliseconds, then reject multiples of five.
    let block = ThreadBlock::with_config(
        from_fn(|millis: u64, _cancel| async move {
            tokio::time::sleep(Duration::from_millis(millis)).await;
            if millis % 5 == 0 {
                anyhow::bail!("{} is a multiple of five", millis);
            }
            anyhow::Ok(millis)
        })
        .named("sleep_then_fail_on_fives"),
        config,
    );
    block.set_batch_continuation(|results| {
        println!("📦 Batch continuation saw {} results", results.len());
    });

    let items = demo_items(count);
    if let Err(e) = block.add_range(items.iter().copied()) {
        eprintln!("❌ Failed to queue items: {}", e);
        std::process::exit(1);
    }
    block.lock_list();

    println!("🚀 ThreadBlock Demo");
    println!("═══════════════════════════════════");
    println!("Items: {}", items.len());
    println!("Max degree of parallelism: {}", block.max_degree_of_parallelism());
    println!();

    let started = Instant::now();
    let outcome = block
        .execute_async(ExecuteOptions::new().item_continuation(|completion, item: &u64, _output| {
            println!("  ✅ {} finished {} in {:?}", completion.dispatch_id, item, completion.elapsed);
            Ok(())
        }))
        .await;

    if let Err(e) = outcome {
        eprintln!("❌ Run failed: {}", e);
        std::process::exit(1);
    }

    let results = block.results();
    let exceptions = block.exceptions();
    println!();
    println!("Results:    {}", results.len());
    println!("Exceptions: {}", exceptions.len());
    for failure in exceptions.values() {
        println!("  ❌ {}: {}", failure.item, failure.failure);
    }
    println!("Elapsed:    {:?}", started.elapsed());
    println!("\n🎉 Demo complete!");
}
