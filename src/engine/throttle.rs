// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Concurrency throttle bounding in-flight transformations.
//!
//! Backed by a `tokio::sync::Semaphore`: the drain loop suspends on a permit instead of
//! spinning on a counter, and quiescence is simply "every permit is back". The permit
//! travels with the dispatched task inside a [`Slot`] and is released when the slot drops,
//! whatever the outcome of the item.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

use crate::errors::BlockError;

pub(crate) struct Throttle {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    in_flight: Arc<AtomicUsize>,
}

/// One unit of the concurrency budget, held for the lifetime of a dispatched item.
pub(crate) struct Slot {
    _permit: OwnedSemaphorePermit,
    in_flight: Arc<AtomicUsize>,
}

impl Drop for Slot {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

impl Throttle {
    /// Create a throttle for `capacity` concurrent items, reporting into `in_flight`.
    pub fn new(capacity: usize, in_flight: Arc<AtomicUsize>) -> Result<Self, BlockError> {
        if capacity == 0 || capacity > Semaphore::MAX_PERMITS || capacity > u32::MAX as usize {
            return Err(BlockError::invalid_parallelism(capacity));
        }
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            in_flight,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Wait for a free slot. Returns `None` if `cancel` fires first.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<Option<Slot>, BlockError> {
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(None),
            permit = Arc::clone(&self.semaphore).acquire_owned() => permit,
        };
        let permit = permit.map_err(|e| BlockError::Internal {
            message: format!("throttle semaphore closed while acquiring a slot: {}", e),
        })?;

        self.in_flight.fetch_add(1, Ordering::AcqRel);
        Ok(Some(Slot {
            _permit: permit,
            in_flight: Arc::clone(&self.in_flight),
        }))
    }

    /// Wait until every dispatched item has released its slot.
    pub async fn quiesce(&self) -> Result<(), BlockError> {
        // capacity <= u32::MAX is checked in new()
        let all = self
            .semaphore
            .acquire_many(self.capacity as u32)
            .await
            .map_err(|e| BlockError::Internal {
                message: format!("throttle semaphore closed while quiescing: {}", e),
            })?;
        drop(all);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn throttle(capacity: usize) -> Throttle {
        Throttle::new(capacity, Arc::new(AtomicUsize::new(0))).unwrap()
    }

    #[test]
    fn test_zero_capacity_is_invalid() {
        let result = Throttle::new(0, Arc::new(AtomicUsize::new(0)));
        assert!(matches!(
            result,
            Err(BlockError::InvalidConfiguration { .. })
        ));
    }

    #[tokio::test]
    async fn test_slots_track_in_flight() {
        let throttle = throttle(2);
        let cancel = CancellationToken::new();

        let first = throttle.acquire(&cancel).await.unwrap().unwrap();
        let second = throttle.acquire(&cancel).await.unwrap().unwrap();
        assert_eq!(throttle.in_flight.load(Ordering::Acquire), 2);

        drop(first);
        assert_eq!(throttle.in_flight.load(Ordering::Acquire), 1);
        drop(second);
        assert_eq!(throttle.in_flight.load(Ordering::Acquire), 0);
    }

    #[tokio::test]
    async fn test_acquire_suspends_at_capacity_until_release() {
        let throttle = Arc::new(throttle(1));
        let cancel = CancellationToken::new();
        let held = throttle.acquire(&cancel).await.unwrap().unwrap();

        let waiter = {
            let throttle = Arc::clone(&throttle);
            let cancel = cancel.clone();
            tokio::spawn(async move { throttle.acquire(&cancel).await.unwrap().is_some() })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(held);
        assert!(waiter.await.unwrap());
    }

    #[tokio::test]
    async fn test_acquire_returns_none_when_cancelled() {
        let throttle = throttle(1);
        let cancel = CancellationToken::new();
        let _held = throttle.acquire(&cancel).await.unwrap().unwrap();

        cancel.cancel();
        assert!(throttle.acquire(&cancel).await.unwrap().is_none());
        assert_eq!(throttle.in_flight.load(Ordering::Acquire), 1);
    }

    #[tokio::test]
    async fn test_quiesce_waits_for_outstanding_slots() {
        let throttle = throttle(3);
        let cancel = CancellationToken::new();
        let slot = throttle.acquire(&cancel).await.unwrap().unwrap();

        let release = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            drop(slot);
        });

        throttle.quiesce().await.unwrap();
        assert_eq!(throttle.in_flight.load(Ordering::Acquire), 0);
        release.await.unwrap();

        // Quiescing hands every permit back
        assert!(throttle.acquire(&cancel).await.unwrap().is_some());
    }
}
