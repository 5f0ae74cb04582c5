// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Closure types for the lifecycle hooks around each item and each batch.

use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::{ItemCompletion, ThreadBlock, TransformationResult};

/// Runs on the drain loop right before an item is dispatched.
pub type WarmupHook<T> = Arc<dyn Fn(&T) -> anyhow::Result<()> + Send + Sync>;

/// Runs on the item's task after a successful transformation, before the result is recorded.
pub type ItemContinuationHook<T, R> =
    Arc<dyn Fn(&ItemCompletion, &T, &R) -> anyhow::Result<()> + Send + Sync>;

/// Runs once per drain-to-quiescence cycle with a snapshot of the results.
pub type BatchContinuationHook<T, R> =
    Arc<dyn Fn(&HashMap<T, TransformationResult<T, R>>) + Send + Sync>;

/// Continuous mode only: the queue was observed empty and the run has not been stopped.
/// The hook may refill the block or call `stop()`.
pub type QueueEmptiedHook<T, R> = Arc<dyn Fn(&ThreadBlock<T, R>) -> anyhow::Result<()> + Send + Sync>;
