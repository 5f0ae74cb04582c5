// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-item outcome store.
//!
//! Two concurrent maps keyed by the original item: one for successful outputs, one for
//! failures. An item lives in at most one of them; recording an outcome for a key evicts
//! it from the other map, and reprocessing a key overwrites the earlier entry. Readers only
//! ever get fully materialized copies.
//!
//! Writers take a store-wide mutex so that the evict and the insert happen as one step;
//! two duplicates of an item finishing together can never leave the key in both maps.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::errors::ItemFailure;
use crate::traits::{BlockItem, BlockOutput};

/// An item together with the output its transformation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformationResult<T, R> {
    pub item: T,
    pub output: R,
}

/// An item together with the reason it failed.
#[derive(Debug, Clone)]
pub struct TransformationFailure<T> {
    pub item: T,
    pub failure: ItemFailure,
}

pub(crate) struct OutcomeStore<T, R>
where
    T: BlockItem,
{
    results: DashMap<T, TransformationResult<T, R>>,
    exceptions: DashMap<T, TransformationFailure<T>>,
    writes: Mutex<()>,
}

impl<T, R> OutcomeStore<T, R>
where
    T: BlockItem,
    R: BlockOutput,
{
    pub fn new() -> Self {
        Self {
            results: DashMap::new(),
            exceptions: DashMap::new(),
            writes: Mutex::new(()),
        }
    }

    pub fn record_result(&self, item: T, output: R) {
        let _writes = self.writes.lock();
        self.exceptions.remove(&item);
        self.results
            .insert(item.clone(), TransformationResult { item, output });
    }

    pub fn record_failure(&self, item: T, failure: ItemFailure) {
        let _writes = self.writes.lock();
        self.results.remove(&item);
        self.exceptions
            .insert(item.clone(), TransformationFailure { item, failure });
    }

    pub fn results(&self) -> HashMap<T, TransformationResult<T, R>> {
        self.results
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn exceptions(&self) -> HashMap<T, TransformationFailure<T>> {
        self.exceptions
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Every output currently recorded, in no particular order.
    pub fn outputs(&self) -> Vec<R> {
        self.results
            .iter()
            .map(|entry| entry.value().output.clone())
            .collect()
    }

    #[cfg(test)]
    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    pub fn exception_count(&self) -> usize {
        self.exceptions.len()
    }
}
