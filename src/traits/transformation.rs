// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::hash::Hash;
use tokio_util::sync::CancellationToken;

/// Bounds every queued item must satisfy.
///
/// Items double as keys in the result and exception stores, so they need `Eq + Hash`.
/// An item that may legitimately be "absent" is expressed as `Option<T>`.
pub trait BlockItem: Clone + Eq + Hash + Send + Sync + 'static {}

impl<T> BlockItem for T where T: Clone + Eq + Hash + Send + Sync + 'static {}

/// Bounds every transformation output must satisfy.
pub trait BlockOutput: Clone + Send + Sync + 'static {}

impl<R> BlockOutput for R where R: Clone + Send + Sync + 'static {}

/// The work a block applies to each item.
///
/// A transformation runs as its own task. The `cancel` token fires when the run is
/// stopped or the item exceeds its timeout. A stopped run lets the transformation finish;
/// a timed-out one is also aborted at its next await point.
#[async_trait]
pub trait Transformation<T: Send + 'static, R: Send + 'static>: Send + Sync {
    async fn transform(&self, item: T, cancel: CancellationToken) -> anyhow::Result<R>;

    fn name(&self) -> &str {
        "transformation"
    }

    /// Whether aborting the transformation's task actually stops the work.
    ///
    /// Async transformations stop at their next await point. Work running on a blocking
    /// thread cannot be stopped that way and reports `false`.
    fn supports_abort(&self) -> bool {
        true
    }
}
