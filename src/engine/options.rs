// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::engine::{ItemCompletion, ThreadBlock};
use crate::traits::{BlockItem, BlockOutput, ItemContinuationHook, QueueEmptiedHook, WarmupHook};

/// Per-call settings for `execute`, `execute_async` and `execute_continuous`.
///
/// Anything left unset falls back to the block's [`BlockConfig`](crate::config::BlockConfig).
///
/// ```rust
/// use threadblock::engine::ExecuteOptions;
///
/// let options: ExecuteOptions<u64, String> = ExecuteOptions::new()
///     .max_degree_of_parallelism(8)
///     .warmup(|item: &u64| {
///         tracing::debug!(item, "warming up");
///         Ok(())
///     });
/// ```
pub struct ExecuteOptions<T, R>
where
    T: BlockItem,
    R: BlockOutput,
{
    pub(crate) max_degree_of_parallelism: Option<usize>,
    pub(crate) warmup: Option<WarmupHook<T>>,
    pub(crate) item_continuation: Option<ItemContinuationHook<T, R>>,
    pub(crate) queue_emptied: Option<QueueEmptiedHook<T, R>>,
    pub(crate) cancel_token: Option<CancellationToken>,
    pub(crate) item_timeout: Option<Duration>,
    pub(crate) poll_interval: Option<Duration>,
}

impl<T, R> Default for ExecuteOptions<T, R>
where
    T: BlockItem,
    R: BlockOutput,
{
    fn default() -> Self {
        Self {
            max_degree_of_parallelism: None,
            warmup: None,
            item_continuation: None,
            queue_emptied: None,
            cancel_token: None,
            item_timeout: None,
            poll_interval: None,
        }
    }
}

impl<T, R> ExecuteOptions<T, R>
where
    T: BlockItem,
    R: BlockOutput,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_degree_of_parallelism(mut self, value: usize) -> Self {
        self.max_degree_of_parallelism = Some(value);
        self
    }

    pub fn warmup<F>(mut self, hook: F) -> Self
    where
        F: Fn(&T) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.warmup = Some(Arc::new(hook));
        self
    }

    pub fn item_continuation<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ItemCompletion, &T, &R) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.item_continuation = Some(Arc::new(hook));
        self
    }

    /// Continuous mode only.
    pub fn queue_emptied<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ThreadBlock<T, R>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.queue_emptied = Some(Arc::new(hook));
        self
    }

    /// External cancellation signal. `ThreadBlock::stop` works with or without one.
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = Some(token);
        self
    }

    pub fn item_timeout(mut self, timeout: Duration) -> Self {
        self.item_timeout = Some(timeout);
        self
    }

    /// How often continuous mode re-announces an empty queue.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }
}
