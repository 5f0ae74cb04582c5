// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Test transformations shared by the unit and integration tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::traits::Transformation;

/// Parses the item as an integer, yielding 0 for anything unparseable.
pub struct ParseOrZero;

#[async_trait]
impl Transformation<String, i32> for ParseOrZero {
    async fn transform(&self, item: String, _cancel: CancellationToken) -> anyhow::Result<i32> {
        Ok(item.trim().parse().unwrap_or(0))
    }

    fn name(&self) -> &str {
        "parse_or_zero"
    }
}

/// Sleeps for `item` units of `unit`, then fails on multiples of five.
pub struct SleepThenFailOnFives {
    pub unit: Duration,
}

#[async_trait]
impl Transformation<u64, u64> for SleepThenFailOnFives {
    async fn transform(&self, item: u64, _cancel: CancellationToken) -> anyhow::Result<u64> {
        tokio::time::sleep(self.unit * item as u32).await;
        if item % 5 == 0 {
            anyhow::bail!("{} is a multiple of five", item);
        }
        Ok(item)
    }

    fn name(&self) -> &str {
        "sleep_then_fail_on_fives"
    }
}

/// Records the highest number of concurrent `transform` calls it has seen.
#[derive(Default)]
pub struct PeakTracker {
    pub current: AtomicUsize,
    pub peak: AtomicUsize,
}

#[async_trait]
impl Transformation<u32, u32> for Arc<PeakTracker> {
    async fn transform(&self, item: u32, _cancel: CancellationToken) -> anyhow::Result<u32> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.current.fetch_sub(1, Ordering::SeqCst);
        Ok(item)
    }

    fn name(&self) -> &str {
        "peak_tracker"
    }
}

/// Waits for its cancel token, then returns the item.
pub struct WaitForCancel;

#[async_trait]
impl Transformation<u32, u32> for WaitForCancel {
    async fn transform(&self, item: u32, cancel: CancellationToken) -> anyhow::Result<u32> {
        cancel.cancelled().await;
        Ok(item)
    }
}

/// Panics on every item.
pub struct Panicking;

#[async_trait]
impl Transformation<u32, u32> for Panicking {
    async fn transform(&self, item: u32, _cancel: CancellationToken) -> anyhow::Result<u32> {
        panic!("transformation exploded on {}", item)
    }
}
