// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! FIFO staging queue with a one-way lock gate.
//!
//! The gate separates a building phase, where callers add and remove items freely, from a
//! running phase where the queue is sealed. A continuous run reopens the queue for
//! enqueue only (never for removal) so that a queue-emptied hook can refill it.
//!
//! The gate flag is flipped while holding the queue mutex, so an `add` racing `lock_list`
//! either lands before the seal or is rejected without touching the queue.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::errors::BlockError;

/// Why a wait on the queue returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QueueWake {
    /// Items are available.
    Ready,
    /// The queue is empty and the gate is locked; nothing more will arrive.
    Sealed,
    /// The poll interval elapsed without anything arriving.
    Elapsed,
    Cancelled,
}

pub(crate) struct WorkQueue<T> {
    items: Mutex<VecDeque<T>>,
    locked: AtomicBool,
    continuous: AtomicBool,
    changed: Notify,
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            locked: AtomicBool::new(false),
            continuous: AtomicBool::new(false),
            changed: Notify::new(),
        }
    }

    fn accepts_items(&self) -> bool {
        !self.locked.load(Ordering::Acquire) || self.continuous.load(Ordering::Acquire)
    }

    pub fn push(&self, item: T) -> Result<(), BlockError> {
        {
            let mut items = self.items.lock();
            if !self.accepts_items() {
                return Err(BlockError::Sealed);
            }
            items.push_back(item);
        }
        self.changed.notify_waiters();
        Ok(())
    }

    /// Enqueue one item at a time; concurrent callers may interleave.
    pub fn extend_unordered<I>(&self, items: I) -> Result<(), BlockError>
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.push(item)?;
        }
        Ok(())
    }

    /// Append the whole batch contiguously in iteration order.
    pub fn extend_ordered<I>(&self, items: I) -> Result<(), BlockError>
    where
        I: IntoIterator<Item = T>,
    {
        let batch: Vec<T> = items.into_iter().collect();
        {
            let mut queue = self.items.lock();
            if !self.accepts_items() {
                return Err(BlockError::Sealed);
            }
            queue.extend(batch);
        }
        self.changed.notify_waiters();
        Ok(())
    }

    /// Remove the first occurrence of `item`. Only legal before the gate is locked.
    pub fn remove(&self, item: &T) -> Result<bool, BlockError>
    where
        T: PartialEq,
    {
        let mut items = self.items.lock();
        if self.locked.load(Ordering::Acquire) {
            return Err(BlockError::Sealed);
        }
        match items.iter().position(|queued| queued == item) {
            Some(index) => {
                items.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn pop(&self) -> Option<T> {
        self.items.lock().pop_front()
    }

    /// Return an item that was dequeued but never dispatched.
    pub fn push_front(&self, item: T) {
        self.items.lock().push_front(item);
        self.changed.notify_waiters();
    }

    /// Flip the gate. Returns `true` only for the call that actually sealed the queue.
    pub fn lock(&self) -> bool {
        let sealed_now = {
            let _items = self.items.lock();
            !self.locked.swap(true, Ordering::AcqRel)
        };
        if sealed_now {
            self.changed.notify_waiters();
        }
        sealed_now
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    pub fn set_continuous(&self, continuous: bool) {
        self.continuous.store(continuous, Ordering::Release);
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Suspend until items are available, the cancel token fires, or `poll` elapses.
    ///
    /// With `stop_when_sealed` an empty, locked queue returns [`QueueWake::Sealed`]
    /// instead of waiting for producers that can no longer add anything.
    pub async fn wait_for_items(
        &self,
        cancel: &CancellationToken,
        poll: Option<Duration>,
        stop_when_sealed: bool,
    ) -> QueueWake {
        loop {
            let notified = self.changed.notified();
            tokio::pin!(notified);
            // Register before checking so a push between the check and the await is not lost.
            notified.as_mut().enable();

            if cancel.is_cancelled() {
                return QueueWake::Cancelled;
            }
            if !self.is_empty() {
                return QueueWake::Ready;
            }
            if stop_when_sealed && self.is_locked() {
                return QueueWake::Sealed;
            }

            match poll {
                Some(interval) => {
                    tokio::select! {
                        _ = cancel.cancelled() => return QueueWake::Cancelled,
                        _ = &mut notified => continue,
                        _ = tokio::time::sleep(interval) => return QueueWake::Elapsed,
                    }
                }
                None => {
                    tokio::select! {
                        _ = cancel.cancelled() => return QueueWake::Cancelled,
                        _ = &mut notified => continue,
                    }
                }
            }
        }
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.lock().iter().cloned().collect()
    }
}
