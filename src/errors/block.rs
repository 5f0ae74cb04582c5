// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Structural errors raised at the point of misuse.
#[derive(Debug, Error)]
pub enum BlockError {
    /// The queue was sealed by `lock_list` and no continuous run is accepting items.
    #[error("thread block is locked; items can no longer be added or removed")]
    Sealed,

    /// The entry point requires a sealed queue.
    #[error("thread block is not locked; call lock_list() before executing")]
    NotLocked,

    /// A drain loop is already active on this block.
    #[error("thread block is already running")]
    AlreadyRunning,

    /// Configuration that cannot drive a run, e.g. zero degree of parallelism.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// The blocking entry point could not build its private runtime.
    #[error("failed to build runtime for blocking execution: {0}")]
    Runtime(#[from] std::io::Error),

    /// The blocking entry point was called from inside a tokio runtime.
    #[error("execute() cannot block inside a tokio runtime; use execute_async()")]
    NestedRuntime,

    /// The continuous drain task panicked or was aborted.
    #[error("drain loop terminated abnormally: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl BlockError {
    pub(crate) fn invalid_parallelism(value: usize) -> Self {
        BlockError::InvalidConfiguration {
            message: format!(
                "max_degree_of_parallelism must be a positive integer, got {}",
                value
            ),
        }
    }
}
