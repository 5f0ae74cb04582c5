// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The thread block: a bounded-concurrency batch engine.
//!
//! A block owns a FIFO queue of items, a lock gate, and the result/exception stores. A run
//! drains the queue through a single coordinator loop that dispatches each item as its own
//! task, never holding more than `max_degree_of_parallelism` items in flight.
//!
//! ## Run lifecycle
//!
//! ```text
//! Idle -> Draining -> Quiescing -> Finished
//!             \           \
//!              +-----------+---> Cancelled
//! ```
//!
//! - **Draining**: dequeue, warm up, wait for a throttle slot, dispatch. An empty unlocked
//!   queue suspends until a producer adds items or seals the queue.
//! - **Quiescing**: wait for every dispatched item to release its slot.
//! - **Finished / Cancelled**: fire the batch continuation with a results snapshot. In
//!   continuous mode the loop goes back to Draining once the queue-emptied hook refills it.
//!
//! ## Error isolation
//!
//! Every dequeued item ends in exactly one of the two stores. Failures from warmup, the
//! transformation, the item continuation, panics, and timeouts are recorded against the
//! item and never escape the engine. Only structural misuse surfaces as [`BlockError`].

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span};

use crate::config::BlockConfig;
use crate::engine::continuous::ContinuousHandle;
use crate::engine::events::{BlockEvent, DispatchId, ItemCompletion};
use crate::engine::options::ExecuteOptions;
use crate::engine::queue::{QueueWake, WorkQueue};
use crate::engine::store::{OutcomeStore, TransformationFailure, TransformationResult};
use crate::engine::throttle::{Slot, Throttle};
use crate::errors::{BlockError, ItemFailure};
use crate::observability::messages::engine::{
    BatchCancelled, BatchCompleted, QueueEmptied, RunStarted, StateTransition,
};
use crate::observability::messages::item::{HookFailed, ItemFailed};
use crate::observability::messages::StructuredLog;
use crate::traits::{
    BatchContinuationHook, BlockItem, BlockOutput, ItemContinuationHook, QueueEmptiedHook,
    Transformation, WarmupHook,
};

/// Where the engine is in its run lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    Idle,
    Draining,
    Quiescing,
    Finished,
    Cancelled,
}

/// Handle to a thread block. Cloning is cheap and every clone drives the same block.
pub struct ThreadBlock<T, R>
where
    T: BlockItem,
    R: BlockOutput,
{
    shared: Arc<Shared<T, R>>,
}

impl<T, R> Clone for ThreadBlock<T, R>
where
    T: BlockItem,
    R: BlockOutput,
{
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

struct Shared<T, R>
where
    T: BlockItem,
    R: BlockOutput,
{
    transformation: Arc<dyn Transformation<T, R>>,
    batch_continuation: RwLock<Option<BatchContinuationHook<T, R>>>,
    config: BlockConfig,
    queue: WorkQueue<T>,
    store: OutcomeStore<T, R>,
    state: Mutex<BlockState>,
    running: AtomicBool,
    /// Cancel token of the active run; `None` while idle.
    active_run: Mutex<Option<CancellationToken>>,
    dispatch_sequence: AtomicU64,
    in_flight: Arc<AtomicUsize>,
    events: broadcast::Sender<BlockEvent<T, R>>,
}

/// Everything one run needs, resolved from `ExecuteOptions` and the block config.
struct Run<T, R>
where
    T: BlockItem,
    R: BlockOutput,
{
    token: CancellationToken,
    throttle: Throttle,
    warmup: Option<WarmupHook<T>>,
    item_continuation: Option<ItemContinuationHook<T, R>>,
    queue_emptied: Option<QueueEmptiedHook<T, R>>,
    item_timeout: Option<Duration>,
    poll_interval: Duration,
    span: Span,
    _guard: RunGuard<T, R>,
}

/// Marks the block idle again when a run ends, however it ends.
struct RunGuard<T, R>
where
    T: BlockItem,
    R: BlockOutput,
{
    shared: Arc<Shared<T, R>>,
}

impl<T, R> Drop for RunGuard<T, R>
where
    T: BlockItem,
    R: BlockOutput,
{
    fn drop(&mut self) {
        self.shared.queue.set_continuous(false);
        *self.shared.active_run.lock() = None;
        self.shared.running.store(false, Ordering::Release);
    }
}

impl<T, R> ThreadBlock<T, R>
where
    T: BlockItem,
    R: BlockOutput,
{
    pub fn new<X>(transformation: X) -> Self
    where
        X: Transformation<T, R> + 'static,
    {
        Self::with_config(transformation, BlockConfig::default())
    }

    pub fn with_config<X>(transformation: X, config: BlockConfig) -> Self
    where
        X: Transformation<T, R> + 'static,
    {
        Self::from_shared_transformation(Arc::new(transformation), config)
    }

    /// Build a block around a transformation that is already shared elsewhere.
    pub fn from_shared_transformation(
        transformation: Arc<dyn Transformation<T, R>>,
        config: BlockConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(config.events.get_capacity().max(1));
        Self {
            shared: Arc::new(Shared {
                transformation,
                batch_continuation: RwLock::new(None),
                config,
                queue: WorkQueue::new(),
                store: OutcomeStore::new(),
                state: Mutex::new(BlockState::Idle),
                running: AtomicBool::new(false),
                active_run: Mutex::new(None),
                dispatch_sequence: AtomicU64::new(0),
                in_flight: Arc::new(AtomicUsize::new(0)),
                events,
            }),
        }
    }

    /// Fired once per drain-to-quiescence cycle, never while that cycle still has work
    /// in flight. Replaces any previous batch continuation.
    pub fn set_batch_continuation<F>(&self, continuation: F)
    where
        F: Fn(&HashMap<T, TransformationResult<T, R>>) + Send + Sync + 'static,
    {
        *self.shared.batch_continuation.write() = Some(Arc::new(continuation));
    }

    // ---- queue and gate ----

    /// Enqueue one item. Fails with [`BlockError::Sealed`] once the block is locked,
    /// unless a continuous run is accepting refills.
    pub fn add(&self, item: T) -> Result<(), BlockError> {
        self.shared.queue.push(item)
    }

    /// Enqueue many items one at a time; concurrent `add_range` calls may interleave.
    pub fn add_range<I>(&self, items: I) -> Result<(), BlockError>
    where
        I: IntoIterator<Item = T>,
    {
        self.shared.queue.extend_unordered(items)
    }

    /// Enqueue many items as one contiguous run that keeps their order.
    pub fn ordered_add_range<I>(&self, items: I) -> Result<(), BlockError>
    where
        I: IntoIterator<Item = T>,
    {
        self.shared.queue.extend_ordered(items)
    }

    /// Remove the first queued occurrence of `item`. Only legal before `lock_list`.
    pub fn remove(&self, item: &T) -> Result<bool, BlockError> {
        self.shared.queue.remove(item)
    }

    /// Seal the queue against further mutation. Idempotent; returns `true` for the call
    /// that actually sealed it.
    pub fn lock_list(&self) -> bool {
        self.shared.queue.lock()
    }

    pub fn is_locked(&self) -> bool {
        self.shared.queue.is_locked()
    }

    /// Items waiting to be dequeued.
    pub fn pending(&self) -> usize {
        self.shared.queue.len()
    }

    // ---- observation ----

    pub fn state(&self) -> BlockState {
        *self.shared.state.lock()
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Transformations currently holding a throttle slot.
    pub fn in_flight(&self) -> usize {
        self.shared.in_flight.load(Ordering::Acquire)
    }

    /// Default parallelism used when a call does not pass one.
    pub fn max_degree_of_parallelism(&self) -> usize {
        self.shared.config.max_degree_of_parallelism
    }

    /// Point-in-time copy of the successful outcomes.
    pub fn results(&self) -> HashMap<T, TransformationResult<T, R>> {
        self.shared.store.results()
    }

    /// Point-in-time copy of the failed outcomes.
    pub fn exceptions(&self) -> HashMap<T, TransformationFailure<T>> {
        self.shared.store.exceptions()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BlockEvent<T, R>> {
        self.shared.events.subscribe()
    }

    /// Request cooperative cancellation of the active run. No new items are dispatched;
    /// items already running finish on their own. A no-op while idle.
    pub fn stop(&self) {
        if let Some(token) = self.shared.active_run.lock().as_ref() {
            token.cancel();
        }
    }

    // ---- execution ----

    /// Run the block to completion, blocking the calling thread.
    ///
    /// Requires a locked block. Drives the run on a private multi-thread runtime, so inside
    /// an async context it fails with [`BlockError::NestedRuntime`]; use
    /// [`Self::execute_async`] there.
    pub fn execute(&self, options: ExecuteOptions<T, R>) -> Result<(), BlockError> {
        if !self.is_locked() {
            return Err(BlockError::NotLocked);
        }
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(BlockError::NestedRuntime);
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("threadblock-worker")
            .build()?;
        let outcome = runtime.block_on(self.execute_async(options));
        // Detached blocking transformations (timed out, not abortable) must not hold us up.
        runtime.shutdown_background();
        outcome.map(|_| ())
    }

    /// Run the block until the queue is drained and every dispatched item has finished.
    ///
    /// On an unlocked block the run keeps waiting for producers until `lock_list` is
    /// called or the run is cancelled. Returns every output in the result store.
    pub async fn execute_async(&self, options: ExecuteOptions<T, R>) -> Result<Vec<R>, BlockError> {
        let run = self.begin_run(options, "batch")?;
        let started = Instant::now();

        self.drain(&run, true).instrument(run.span.clone()).await?;
        self.finish_cycle(&run, 1, started);

        Ok(self.shared.store.outputs())
    }

    /// Launch a continuous run on the current tokio runtime and return immediately.
    ///
    /// The run drains the queue, fires the batch continuation, then calls the
    /// queue-emptied hook until the hook (or anyone else) refills the queue or stops the
    /// run. While it is active the locked queue still accepts `add`.
    pub fn execute_continuous(
        &self,
        options: ExecuteOptions<T, R>,
    ) -> Result<ContinuousHandle, BlockError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| BlockError::Internal {
            message: format!("execute_continuous requires a tokio runtime: {}", e),
        })?;

        let run = self.begin_run(options, "continuous")?;
        self.shared.queue.set_continuous(true);

        let token = run.token.clone();
        let span = run.span.clone();
        let block = self.clone();
        let task = runtime.spawn(async move { block.run_continuous(run).await }.instrument(span));

        Ok(ContinuousHandle::new(token, task))
    }

    fn begin_run(
        &self,
        options: ExecuteOptions<T, R>,
        mode: &'static str,
    ) -> Result<Run<T, R>, BlockError> {
        let shared = &self.shared;
        let degree = options
            .max_degree_of_parallelism
            .unwrap_or(shared.config.max_degree_of_parallelism);
        let throttle = Throttle::new(degree, Arc::clone(&shared.in_flight))?;
        let poll_interval = options
            .poll_interval
            .unwrap_or_else(|| shared.config.timeouts.empty_queue_poll());
        if poll_interval.is_zero() {
            return Err(BlockError::InvalidConfiguration {
                message: "poll_interval must be greater than zero".to_string(),
            });
        }

        if shared
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(BlockError::AlreadyRunning);
        }
        let guard = RunGuard {
            shared: Arc::clone(shared),
        };

        let token = match options.cancel_token {
            Some(parent) => parent.child_token(),
            None => CancellationToken::new(),
        };
        *shared.active_run.lock() = Some(token.clone());

        let started = RunStarted {
            mode,
            queued: shared.queue.len(),
            max_degree_of_parallelism: throttle.capacity(),
        };
        started.log();

        Ok(Run {
            token,
            throttle,
            warmup: options.warmup,
            item_continuation: options.item_continuation,
            queue_emptied: options.queue_emptied,
            item_timeout: options
                .item_timeout
                .or_else(|| shared.config.timeouts.item_timeout()),
            poll_interval,
            span: started.span(mode),
            _guard: guard,
        })
    }

    /// Draining then Quiescing for one cycle.
    ///
    /// With `wait_for_producers` an empty unlocked queue suspends the loop; otherwise an
    /// empty queue ends the cycle.
    async fn drain(&self, run: &Run<T, R>, wait_for_producers: bool) -> Result<(), BlockError> {
        let shared = &self.shared;
        shared.transition(BlockState::Draining);

        loop {
            if run.token.is_cancelled() {
                break;
            }

            let item = match shared.queue.pop() {
                Some(item) => item,
                None if !wait_for_producers => break,
                None => match shared.queue.wait_for_items(&run.token, None, true).await {
                    QueueWake::Ready => continue,
                    QueueWake::Sealed | QueueWake::Cancelled | QueueWake::Elapsed => break,
                },
            };

            let dispatch_id = shared.next_dispatch_id();
            if let Err(failure) = shared.warm_up(run, dispatch_id, &item) {
                shared.record_failure(dispatch_id, item, failure);
                continue;
            }

            let Some(slot) = run.throttle.acquire(&run.token).await? else {
                // Cancelled before dispatch: the item goes back as if never dequeued.
                shared.queue.push_front(item);
                break;
            };
            self.dispatch(run, dispatch_id, item, slot);
        }

        shared.transition(BlockState::Quiescing);
        run.throttle.quiesce().await
    }

    fn dispatch(&self, run: &Run<T, R>, dispatch_id: DispatchId, item: T, slot: Slot) {
        let shared = Arc::clone(&self.shared);
        let continuation = run.item_continuation.clone();
        let cancel = run.token.child_token();
        let timeout = run.item_timeout;
        let span = tracing::debug_span!(
            "item",
            dispatch_id = dispatch_id.0,
            transformation = self.shared.transformation.name(),
        );

        tokio::spawn(
            async move {
                let _slot = slot;
                let started = Instant::now();
                let outcome = shared.transform(item.clone(), cancel, timeout).await;
                let completion = ItemCompletion {
                    dispatch_id,
                    elapsed: started.elapsed(),
                };

                match outcome {
                    Ok(output) => shared.complete(completion, item, output, continuation.as_ref()),
                    Err(failure) => shared.record_failure(dispatch_id, item, failure),
                }
            }
            .instrument(span),
        );
    }

    /// Finished or Cancelled: log, fire the batch continuation, publish.
    fn finish_cycle(&self, run: &Run<T, R>, cycle: u64, started: Instant) {
        let shared = &self.shared;
        let results = shared.store.results();
        let exceptions = shared.store.exception_count();

        if run.token.is_cancelled() {
            shared.transition(BlockState::Cancelled);
            BatchCancelled {
                cycle,
                results: results.len(),
                exceptions,
                pending: shared.queue.len(),
            }
            .log();
            shared.publish(|| BlockEvent::BatchCancelled {
                results: results.len(),
                exceptions,
            });
        } else {
            shared.transition(BlockState::Finished);
            BatchCompleted {
                cycle,
                results: results.len(),
                exceptions,
                duration: started.elapsed(),
            }
            .log();
        }

        // Clone out of the lock so the hook may replace itself.
        let continuation = shared.batch_continuation.read().clone();
        if let Some(hook) = continuation {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| hook(&results))) {
                let error = ItemFailure::panicked(payload).to_string();
                HookFailed {
                    hook: "batch_continuation",
                    error: &error,
                }
                .log();
            }
        }

        shared.publish(|| BlockEvent::BatchFinished {
            cycle,
            results: results.len(),
            exceptions,
        });
    }

    async fn run_continuous(&self, run: Run<T, R>) -> Result<(), BlockError> {
        let mut cycle = 0;
        loop {
            cycle += 1;
            let started = Instant::now();
            self.drain(&run, false).await?;
            self.finish_cycle(&run, cycle, started);

            if !self.await_refill(&run, cycle).await {
                // Stopped while idle between cycles.
                self.shared.transition(BlockState::Cancelled);
                return Ok(());
            }
        }
    }

    /// Announce the empty queue until something arrives. Returns `false` once stopped.
    async fn await_refill(&self, run: &Run<T, R>, cycle: u64) -> bool {
        let shared = &self.shared;
        loop {
            if run.token.is_cancelled() {
                return false;
            }
            if !shared.queue.is_empty() {
                return true;
            }

            QueueEmptied { cycle }.log();
            shared.publish(|| BlockEvent::QueueEmptied { cycle });
            if let Some(hook) = &run.queue_emptied {
                let error = match catch_unwind(AssertUnwindSafe(|| hook(self))) {
                    Ok(Ok(())) => None,
                    Ok(Err(error)) => Some(error.to_string()),
                    Err(payload) => Some(ItemFailure::panicked(payload).to_string()),
                };
                if let Some(error) = error {
                    HookFailed {
                        hook: "queue_emptied",
                        error: &error,
                    }
                    .log();
                }
            }

            match shared
                .queue
                .wait_for_items(&run.token, Some(run.poll_interval), false)
                .await
            {
                QueueWake::Ready => return true,
                QueueWake::Cancelled => return false,
                QueueWake::Elapsed | QueueWake::Sealed => continue,
            }
        }
    }
}

impl<T, R> Shared<T, R>
where
    T: BlockItem,
    R: BlockOutput,
{
    fn next_dispatch_id(&self) -> DispatchId {
        DispatchId(self.dispatch_sequence.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn transition(&self, to: BlockState) {
        let mut state = self.state.lock();
        let from = *state;
        if from != to {
            *state = to;
            StateTransition { from, to }.log();
        }
    }

    /// Send an event only when someone is listening, so idle blocks skip the clones.
    fn publish<F>(&self, event: F)
    where
        F: FnOnce() -> BlockEvent<T, R>,
    {
        if self.events.receiver_count() > 0 {
            let _ = self.events.send(event());
        }
    }

    fn warm_up(&self, run: &Run<T, R>, dispatch_id: DispatchId, item: &T) -> Result<(), ItemFailure> {
        self.publish(|| BlockEvent::ItemWarmup {
            dispatch_id,
            item: item.clone(),
        });

        let Some(hook) = &run.warmup else {
            return Ok(());
        };
        match catch_unwind(AssertUnwindSafe(|| hook(item))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(error)) => Err(ItemFailure::warmup(error)),
            Err(payload) => Err(ItemFailure::panicked(payload)),
        }
    }

    /// Run the transformation as its own task so panics and aborts stay contained.
    async fn transform(
        &self,
        item: T,
        cancel: CancellationToken,
        timeout: Option<Duration>,
    ) -> Result<R, ItemFailure> {
        let transformation = Arc::clone(&self.transformation);
        let abortable = transformation.supports_abort();
        let item_cancel = cancel.clone();
        let mut task =
            tokio::spawn(async move { transformation.transform(item, item_cancel).await });

        let joined = match timeout {
            None => task.await,
            Some(limit) => match tokio::time::timeout(limit, &mut task).await {
                Ok(joined) => joined,
                Err(_) => {
                    cancel.cancel();
                    task.abort();
                    return Err(if abortable {
                        ItemFailure::TimedOut { elapsed: limit }
                    } else {
                        ItemFailure::AbortUnsupported { elapsed: limit }
                    });
                }
            },
        };

        match joined {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(error)) => Err(ItemFailure::transformation(error)),
            Err(join_error) if join_error.is_panic() => {
                Err(ItemFailure::panicked(join_error.into_panic()))
            }
            Err(join_error) => Err(ItemFailure::transformation(anyhow::Error::new(join_error))),
        }
    }

    /// Success path: item continuation first, then the result is recorded.
    fn complete(
        &self,
        completion: ItemCompletion,
        item: T,
        output: R,
        continuation: Option<&ItemContinuationHook<T, R>>,
    ) {
        if let Some(hook) = continuation {
            let failure = match catch_unwind(AssertUnwindSafe(|| hook(&completion, &item, &output))) {
                Ok(Ok(())) => None,
                Ok(Err(error)) => Some(ItemFailure::continuation(error)),
                Err(payload) => Some(ItemFailure::panicked(payload)),
            };
            if let Some(failure) = failure {
                self.record_failure(completion.dispatch_id, item, failure);
                return;
            }
        }

        let event = (self.events.receiver_count() > 0).then(|| BlockEvent::ItemCompleted {
            completion,
            item: item.clone(),
            output: output.clone(),
        });
        self.store.record_result(item, output);
        if let Some(event) = event {
            let _ = self.events.send(event);
        }
    }

    fn record_failure(&self, dispatch_id: DispatchId, item: T, failure: ItemFailure) {
        ItemFailed {
            dispatch_id,
            transformation: self.transformation.name(),
            failure: &failure,
        }
        .log();

        let event = (self.events.receiver_count() > 0).then(|| BlockEvent::ItemFailed {
            dispatch_id,
            item: item.clone(),
            failure: failure.clone(),
        });
        self.store.record_failure(item, failure);
        if let Some(event) = event {
            let _ = self.events.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformations::from_fn;

    fn doubling_block() -> ThreadBlock<u32, u32> {
        ThreadBlock::new(from_fn(|item: u32, _cancel| async move { anyhow::Ok(item * 2) }))
    }

    #[test]
    fn test_new_block_is_idle_and_unlocked() {
        let block = doubling_block();
        assert_eq!(block.state(), BlockState::Idle);
        assert!(!block.is_locked());
        assert!(!block.is_running());
        assert_eq!(block.pending(), 0);
        assert_eq!(block.max_degree_of_parallelism(), 1);
    }

    #[test]
    fn test_stop_while_idle_is_noop() {
        let block = doubling_block();
        block.stop();
        assert_eq!(block.state(), BlockState::Idle);
    }

    #[test]
    fn test_clones_share_state() {
        let block = doubling_block();
        let other = block.clone();
        other.add(1).unwrap();
        assert_eq!(block.pending(), 1);
        assert!(block.lock_list());
        assert!(other.is_locked());
    }

    #[test]
    fn test_dispatch_ids_are_per_instance() {
        let first = doubling_block();
        let second = doubling_block();
        assert_eq!(first.shared.next_dispatch_id(), DispatchId(1));
        assert_eq!(first.shared.next_dispatch_id(), DispatchId(2));
        assert_eq!(second.shared.next_dispatch_id(), DispatchId(1));
    }

    #[tokio::test]
    async fn test_zero_parallelism_fails_before_touching_items() {
        let block = doubling_block();
        block.add_range(vec![1, 2, 3]).unwrap();
        block.lock_list();

        let result = block
            .execute_async(ExecuteOptions::new().max_degree_of_parallelism(0))
            .await;

        assert!(matches!(
            result,
            Err(BlockError::InvalidConfiguration { .. })
        ));
        assert_eq!(block.pending(), 3);
        assert!(!block.is_running());
        assert_eq!(block.state(), BlockState::Idle);
    }

    #[tokio::test]
    async fn test_execute_async_returns_outputs() {
        let block = doubling_block();
        block.ordered_add_range(vec![1, 2, 3]).unwrap();
        block.lock_list();

        let mut outputs = block
            .execute_async(ExecuteOptions::new().max_degree_of_parallelism(2))
            .await
            .unwrap();
        outputs.sort_unstable();

        assert_eq!(outputs, vec![2, 4, 6]);
        assert_eq!(block.state(), BlockState::Finished);
        assert!(!block.is_running());
        assert_eq!(block.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_execute_continuous_rejects_second_run() {
        let block = doubling_block();
        block.lock_list();
        let handle = block
            .execute_continuous(ExecuteOptions::new().poll_interval(Duration::from_millis(5)))
            .unwrap();

        assert!(matches!(
            block.execute_continuous(ExecuteOptions::new()),
            Err(BlockError::AlreadyRunning)
        ));

        handle.stop();
        handle.join().await.unwrap();
        assert!(!block.is_running());
    }

    #[tokio::test]
    async fn test_blocking_execute_inside_runtime_is_rejected() {
        let block = doubling_block();
        block.add_range(vec![1, 2]).unwrap();
        block.lock_list();

        let result = block.execute(ExecuteOptions::new());

        assert!(matches!(result, Err(BlockError::NestedRuntime)));
        assert_eq!(block.pending(), 2);
        assert!(!block.is_running());
        assert!(block.results().is_empty());
    }

    #[tokio::test]
    async fn test_zero_poll_interval_is_rejected() {
        let block = doubling_block();
        block.lock_list();

        let result = block.execute_continuous(ExecuteOptions::new().poll_interval(Duration::ZERO));
        assert!(matches!(
            result,
            Err(BlockError::InvalidConfiguration { .. })
        ));
        assert!(!block.is_running());
    }

    #[tokio::test]
    async fn test_zero_configured_poll_interval_is_rejected() {
        let mut config = BlockConfig::default();
        config.timeouts.empty_queue_poll_ms = Some(0);
        let block: ThreadBlock<u32, u32> = ThreadBlock::with_config(
            from_fn(|item: u32, _cancel| async move { anyhow::Ok(item) }),
            config,
        );
        block.add(1).unwrap();
        block.lock_list();

        let result = block.execute_async(ExecuteOptions::new()).await;
        assert!(matches!(
            result,
            Err(BlockError::InvalidConfiguration { .. })
        ));
        assert_eq!(block.pending(), 1);
        assert_eq!(block.state(), BlockState::Idle);
    }

    #[test]
    fn test_execute_continuous_outside_runtime_fails() {
        let block = doubling_block();
        let result = block.execute_continuous(ExecuteOptions::new());
        assert!(matches!(result, Err(BlockError::Internal { .. })));
        assert!(!block.is_running());
    }
}
