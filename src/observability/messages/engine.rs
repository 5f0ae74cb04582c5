// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the drain loop lifecycle.
//!
//! This module contains message types for logging events related to:
//! * Run start and batch completion or cancellation
//! * Engine state transitions
//! * Continuous-mode empty-queue cycles

use crate::engine::BlockState;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A run was accepted and its drain loop is starting.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use threadblock::observability::messages::engine::RunStarted;
///
/// let msg = RunStarted {
///     mode: "continuous",
///     queued: 50,
///     max_degree_of_parallelism: 16,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RunStarted<'a> {
    pub mode: &'a str,
    pub queued: usize,
    pub max_degree_of_parallelism: usize,
}

impl Display for RunStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting {} run: {} items queued, max_degree_of_parallelism={}",
            self.mode, self.queued, self.max_degree_of_parallelism
        )
    }
}

impl StructuredLog for RunStarted<'_> {
    fn log(&self) {
        tracing::info!(
            mode = self.mode,
            queued = self.queued,
            max_degree_of_parallelism = self.max_degree_of_parallelism,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run",
            span_name = name,
            mode = self.mode,
            max_degree_of_parallelism = self.max_degree_of_parallelism,
        )
    }
}

/// A drain-to-quiescence cycle ended without cancellation.
///
/// # Log Level
/// `info!` - Important operational event
pub struct BatchCompleted {
    pub cycle: u64,
    pub results: usize,
    pub exceptions: usize,
    pub duration: Duration,
}

impl Display for BatchCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Batch {} completed: {} results, {} exceptions in {:?}",
            self.cycle, self.results, self.exceptions, self.duration
        )
    }
}

impl StructuredLog for BatchCompleted {
    fn log(&self) {
        tracing::info!(
            cycle = self.cycle,
            results = self.results,
            exceptions = self.exceptions,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "batch_completed",
            span_name = name,
            cycle = self.cycle,
            results = self.results,
            exceptions = self.exceptions,
        )
    }
}

/// A run was stopped; outstanding items drained before this was logged.
///
/// # Log Level
/// `info!` - Cancellation is a clean stop, not an error
pub struct BatchCancelled {
    pub cycle: u64,
    pub results: usize,
    pub exceptions: usize,
    pub pending: usize,
}

impl Display for BatchCancelled {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Batch {} cancelled: {} results, {} exceptions, {} items left undispatched",
            self.cycle, self.results, self.exceptions, self.pending
        )
    }
}

impl StructuredLog for BatchCancelled {
    fn log(&self) {
        tracing::info!(
            cycle = self.cycle,
            results = self.results,
            exceptions = self.exceptions,
            pending = self.pending,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "batch_cancelled",
            span_name = name,
            cycle = self.cycle,
            pending = self.pending,
        )
    }
}

/// # Log Level
/// `debug!` - Diagnostic detail
pub struct StateTransition {
    pub from: BlockState,
    pub to: BlockState,
}

impl Display for StateTransition {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Thread block state {:?} -> {:?}", self.from, self.to)
    }
}

impl StructuredLog for StateTransition {
    fn log(&self) {
        tracing::debug!(from = ?self.from, to = ?self.to, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "state_transition",
            span_name = name,
            from = ?self.from,
            to = ?self.to,
        )
    }
}

/// Continuous mode found the queue empty and is asking the caller for more work.
///
/// # Log Level
/// `debug!` - Fires once per poll interval while idle
pub struct QueueEmptied {
    pub cycle: u64,
}

impl Display for QueueEmptied {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Queue emptied after batch {}", self.cycle)
    }
}

impl StructuredLog for QueueEmptied {
    fn log(&self) {
        tracing::debug!(cycle = self.cycle, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("queue_emptied", span_name = name, cycle = self.cycle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_render() {
        let started = RunStarted {
            mode: "batch",
            queued: 10,
            max_degree_of_parallelism: 5,
        };
        assert_eq!(
            started.to_string(),
            "Starting batch run: 10 items queued, max_degree_of_parallelism=5"
        );

        let cancelled = BatchCancelled {
            cycle: 1,
            results: 3,
            exceptions: 1,
            pending: 6,
        };
        assert!(cancelled.to_string().contains("6 items left undispatched"));

        let transition = StateTransition {
            from: BlockState::Draining,
            to: BlockState::Quiescing,
        };
        assert_eq!(
            transition.to_string(),
            "Thread block state Draining -> Quiescing"
        );
    }
}
