// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Event-style notifications for callers who prefer subscribing over passing closures.
//!
//! Events go out on a `tokio::sync::broadcast` channel. Publishing never blocks the engine:
//! with no subscribers the event is dropped, and slow subscribers see `Lagged`.

use std::fmt;
use std::time::Duration;

use crate::errors::ItemFailure;

/// Per-instance sequence number assigned to each dispatched item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DispatchId(pub u64);

impl fmt::Display for DispatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Completion handle handed to the item continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemCompletion {
    pub dispatch_id: DispatchId,
    /// Wall time from dispatch to the end of the transformation.
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub enum BlockEvent<T, R> {
    ItemWarmup {
        dispatch_id: DispatchId,
        item: T,
    },
    ItemCompleted {
        completion: ItemCompletion,
        item: T,
        output: R,
    },
    ItemFailed {
        dispatch_id: DispatchId,
        item: T,
        failure: ItemFailure,
    },
    /// Continuous mode observed an empty queue.
    QueueEmptied { cycle: u64 },
    /// The run was stopped; outstanding work has drained.
    BatchCancelled { results: usize, exceptions: usize },
    /// A drain-to-quiescence cycle ended, cancelled or not.
    BatchFinished {
        cycle: u64,
        results: usize,
        exceptions: usize,
    },
}

impl<T, R> BlockEvent<T, R> {
    pub fn name(&self) -> &'static str {
        match self {
            BlockEvent::ItemWarmup { .. } => "item_warmup",
            BlockEvent::ItemCompleted { .. } => "item_completed",
            BlockEvent::ItemFailed { .. } => "item_failed",
            BlockEvent::QueueEmptied { .. } => "queue_emptied",
            BlockEvent::BatchCancelled { .. } => "batch_cancelled",
            BlockEvent::BatchFinished { .. } => "batch_finished",
        }
    }
}
